pub mod client;
pub mod error;
pub mod graphql;
pub mod models;
mod trait_impl;


pub use client::GitHubClient;
pub use error::{GitHubError, Result};
pub use models::*;
pub use trait_impl::{CommentPublisher, DiscussionPublisher, discussion_title};

// Re-export kb-core types for convenience
pub use kb_core::{IssueSource, KbError};
