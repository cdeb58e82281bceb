use kb_core::KbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Repository lookup failed: {0}")]
    RepositoryLookup(String),

    #[error("Discussion creation failed: {0}")]
    DiscussionCreate(String),

    #[error("Comment post failed ({status}): {body}")]
    Publish { status: u16, body: String },

    #[error("GitHub token required for write operations")]
    MissingToken,
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for KbError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => KbError::Network(e.to_string()),
            GitHubError::Parse(e) => KbError::Decode(e.to_string()),
            GitHubError::UnexpectedStatus { status, body } => {
                KbError::UnexpectedStatus { status, body }
            }
            GitHubError::RepositoryLookup(msg) => KbError::RepositoryLookup(msg),
            GitHubError::DiscussionCreate(msg) => KbError::DiscussionCreate(msg),
            GitHubError::Publish { status, body } => KbError::Publish { status, body },
            GitHubError::MissingToken => KbError::MissingToken,
        }
    }
}
