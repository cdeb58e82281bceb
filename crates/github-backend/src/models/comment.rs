use serde::{Deserialize, Serialize};

/// Request body for creating a comment
#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubComment {
    pub body: String,
}

/// The parts of a freshly created comment we report back
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedGitHubComment {
    pub id: u64,
    pub html_url: Option<String>,
}
