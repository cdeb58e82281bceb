use thiserror::Error;

/// Common errors for every stage of closure handling
#[derive(Error, Debug)]
pub enum KbError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Repository lookup failed: {0}")]
    RepositoryLookup(String),

    #[error("Discussion creation failed: {0}")]
    DiscussionCreate(String),

    #[error("Publish failed ({status}): {body}")]
    Publish { status: u16, body: String },

    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    #[error("GitHub token required for write operations")]
    MissingToken,
}

pub type Result<T> = std::result::Result<T, KbError>;
