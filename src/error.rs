// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error("{0} is not set; define it in a .env file or the environment")]
    ConfigurationMissing(&'static str),
    #[error("{var} is invalid: {reason}")]
    ConfigurationInvalid { var: &'static str, reason: String },
    #[error("Gemini API request failed: {0}")]
    RemoteGenerationFailed(String),
    #[error("Please upload an image first")]
    NoInputProvided,
}

impl TutorError {
    /// Stable identifier the page uses to pick the warning or error banner.
    pub fn kind(&self) -> &'static str {
        match self {
            TutorError::ConfigurationMissing(_) => "configuration_missing",
            TutorError::ConfigurationInvalid { .. } => "configuration_invalid",
            TutorError::RemoteGenerationFailed(_) => "remote_generation_failed",
            TutorError::NoInputProvided => "no_input",
        }
    }
}
