use kb_core::KbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no usable choice: {0}")]
    NoChoice(String),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

impl From<GeneratorError> for KbError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::ModelUnavailable(slot) => KbError::ModelUnavailable(slot),
            other => KbError::ModelInvocation(other.to_string()),
        }
    }
}
