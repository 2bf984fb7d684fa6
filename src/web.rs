use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::error::TutorError;
use crate::models::{ErrorBody, ImageInput, ImageMime, Question, SolveResponse};
use crate::tutor::AnswerGenerator;

const INDEX_HTML: &str = include_str!("page.html");
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Tutor(#[from] TutorError),
    #[error("Unsupported image type {0}; upload a jpg, jpeg or png file")]
    UnsupportedImage(String),
    #[error("Upload is larger than the {} MiB limit", MAX_UPLOAD_BYTES / (1024 * 1024))]
    PayloadTooLarge,
    #[error("{0}")]
    BadRequest(String),
}

impl From<MultipartError> for WebError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            WebError::PayloadTooLarge
        } else {
            WebError::BadRequest(e.body_text())
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            WebError::Tutor(e @ TutorError::NoInputProvided) => {
                (StatusCode::BAD_REQUEST, e.kind())
            }
            WebError::Tutor(e @ TutorError::RemoteGenerationFailed(_)) => {
                (StatusCode::BAD_GATEWAY, e.kind())
            }
            WebError::Tutor(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.kind()),
            WebError::UnsupportedImage(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_image")
            }
            WebError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            WebError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        };
        let body = ErrorBody {
            detail: self.to_string(),
            kind,
        };
        (status, Json(body)).into_response()
    }
}

// ── Router ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub generator: AnswerGenerator,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/solve", post(solve_endpoint))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn solve_endpoint(State(state): State<AppState>, multipart: Multipart) -> Response {
    match solve(&state, multipart).await {
        Ok(answer) => {
            let response = SolveResponse {
                answer,
                model: state.generator.model_name().to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            match &e {
                WebError::Tutor(TutorError::RemoteGenerationFailed(_)) => {
                    tracing::error!(error = %e, "solve failed")
                }
                _ => tracing::warn!(error = %e, "solve rejected"),
            }
            e.into_response()
        }
    }
}

async fn solve(state: &AppState, multipart: Multipart) -> Result<String, WebError> {
    let form = read_form(multipart).await?;
    let answer = state.generator.generate(form.image, &form.question).await?;
    Ok(answer)
}

// ── Form parsing ─────────────────────────────────────────────────────────────

struct SolveForm {
    image: Option<ImageInput>,
    question: Question,
}

/// Reads the `image` file and `question` text fields; other fields are ignored.
/// A file field with no bytes is what browsers send when nothing was chosen.
async fn read_form(mut multipart: Multipart) -> Result<SolveForm, WebError> {
    let mut image = None;
    let mut question = Question::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    continue;
                }
                let mime = ImageMime::detect(content_type.as_deref(), file_name.as_deref())
                    .ok_or_else(|| {
                        WebError::UnsupportedImage(
                            content_type
                                .or(file_name)
                                .unwrap_or_else(|| "unknown".to_string()),
                        )
                    })?;
                image = Some(ImageInput::new(bytes.to_vec(), mime));
            }
            Some("question") => {
                question = Question::new(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(SolveForm { image, question })
}
