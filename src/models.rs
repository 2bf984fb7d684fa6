use serde::Serialize;

// ── Image input ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }

    /// Parses a `Content-Type` value, ignoring case and parameters.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageMime::Jpeg),
            "image/png" => Some(ImageMime::Png),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "png" => Some(ImageMime::Png),
            _ => None,
        }
    }

    /// Resolves the upload's type from its declared content type, falling back
    /// to the file extension when the browser sent nothing useful.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        match content_type {
            Some(ct) if !is_generic_content_type(ct) => Self::from_content_type(ct),
            _ => file_name.and_then(Self::from_file_name),
        }
    }
}

fn is_generic_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or("").trim();
    essence.is_empty() || essence.eq_ignore_ascii_case("application/octet-stream")
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One uploaded image, consumed by a single generation request.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime: ImageMime,
}

impl ImageInput {
    pub fn new(bytes: impl Into<Vec<u8>>, mime: ImageMime) -> Self {
        Self {
            bytes: bytes.into(),
            mime,
        }
    }
}

// ── Question ─────────────────────────────────────────────────────────────────

/// Optional user question. Only the empty string means "no question".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_deref(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }
}

// ── HTTP responses ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub answer: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub kind: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parsing() {
        assert_eq!(ImageMime::from_content_type("image/jpeg"), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::from_content_type("IMAGE/JPG"), Some(ImageMime::Jpeg));
        assert_eq!(
            ImageMime::from_content_type("image/png; charset=binary"),
            Some(ImageMime::Png)
        );
        assert_eq!(ImageMime::from_content_type("image/gif"), None);
    }

    #[test]
    fn detect_falls_back_to_extension() {
        assert_eq!(
            ImageMime::detect(Some("application/octet-stream"), Some("task.PNG")),
            Some(ImageMime::Png)
        );
        assert_eq!(ImageMime::detect(None, Some("scan.jpeg")), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::detect(None, Some("notes.txt")), None);
        assert_eq!(ImageMime::detect(None, Some("noextension")), None);
    }

    #[test]
    fn declared_type_wins_over_extension() {
        assert_eq!(ImageMime::detect(Some("image/gif"), Some("photo.png")), None);
    }

    #[test]
    fn empty_question_is_absent() {
        assert_eq!(Question::default().as_deref(), None);
        assert_eq!(Question::new("").as_deref(), None);
        assert_eq!(Question::new("What is x?").as_deref(), Some("What is x?"));
    }
}
