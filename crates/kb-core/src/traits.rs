use crate::error::Result;
use crate::models::*;

/// Read side of the issue host (GitHub REST in production)
pub trait IssueSource: Send + Sync {
    /// Fetch a single issue by number
    fn fetch_issue(&self, repo: &RepoSlug, number: u64) -> Result<Issue>;

    /// Fetch the comments behind an issue's own `comments_url`
    fn fetch_comments(&self, comments_url: &str) -> Result<Vec<Comment>>;
}

/// Turns an issue and its discussion into a markdown KB article
pub trait ArticleWriter: Send + Sync {
    fn write_article(&self, issue: &Issue, comments: &[Comment]) -> Result<String>;
}

/// Delivers a generated article somewhere
///
/// Each deployment uses exactly one publisher; they are never chained.
pub trait ArticlePublisher: Send + Sync {
    fn publish(&self, repo: &RepoSlug, issue: &Issue, article: &str) -> Result<Publication>;
}
