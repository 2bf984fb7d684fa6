use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::TutorError;
use crate::gemini::{Content, GenerateContentRequest, GenerativeModel, InlineData, Part};
use crate::models::{ImageInput, Question};

pub const BASE_PROMPT: &str = "Analyze the mathematical content in this image. \
Provide a detailed explanation of the problem, the solution steps, and the final answer. \
Make sure all mathematical expressions are properly formatted using LaTeX \
within $...$ for inline math and $$...$$ for block math.";

/// Instruction text, with the user's question appended when there is one.
pub fn compose_prompt(question: &Question) -> String {
    match question.as_deref() {
        Some(q) => format!("{} Answer the following question: {}", BASE_PROMPT, q),
        None => BASE_PROMPT.to_string(),
    }
}

/// Image part first, then the prompt text.
pub fn build_request(image: &ImageInput, question: &Question) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime.as_str().to_string(),
                        data: STANDARD.encode(&image.bytes),
                    },
                },
                Part::Text {
                    text: compose_prompt(question),
                },
            ],
        }],
    }
}

#[derive(Clone)]
pub struct AnswerGenerator {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn GenerativeModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Sends one image and optional question to the model and returns its
    /// explanation. Every call reaches the remote service.
    pub async fn generate(
        &self,
        image: Option<ImageInput>,
        question: &Question,
    ) -> Result<String, TutorError> {
        let image = image.ok_or(TutorError::NoInputProvided)?;
        let request = build_request(&image, question);

        tracing::info!(
            model = %self.model_name,
            mime = %image.mime,
            bytes = image.bytes.len(),
            has_question = question.as_deref().is_some(),
            "generating answer"
        );

        let answer = self
            .model
            .generate_content(&self.model_name, &request)
            .await
            .and_then(|response| response.text())
            .map_err(|e| {
                tracing::error!(error = %e, "generation failed");
                TutorError::RemoteGenerationFailed(e.to_string())
            })?;

        tracing::info!(chars = answer.len(), "answer generated");
        Ok(answer)
    }
}
