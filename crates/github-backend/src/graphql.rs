//! Minimal GraphQL request encoding for the GitHub v4 API.
//!
//! Documents are constants; anything user-supplied travels in `variables`
//! and is serialised by serde_json, never spliced into the query text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const REPOSITORY_ID_QUERY: &str = r#"
query RepositoryId($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    id
  }
}
"#;

pub const CREATE_DISCUSSION_MUTATION: &str = r#"
mutation CreateDiscussion($repositoryId: ID!, $categoryId: ID!, $title: String!, $body: String!) {
  createDiscussion(input: {repositoryId: $repositoryId, categoryId: $categoryId, title: $title, body: $body}) {
    discussion {
      id
      url
    }
  }
}
"#;

/// JSON body of a GraphQL POST
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Map<String, Value>,
}

impl<'a> GraphQlRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            variables: Map::new(),
        }
    }

    pub fn variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }
}

/// Standard GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// All error messages joined, if the server reported any
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
