use kb_core::{
    ArticlePublisher, Comment, Issue, IssueSource, Publication, RepoSlug, Result,
};

use crate::client::GitHubClient;

impl IssueSource for GitHubClient {
    fn fetch_issue(&self, repo: &RepoSlug, number: u64) -> Result<Issue> {
        self.fetch_issue_details(repo, number).map_err(Into::into)
    }

    fn fetch_comments(&self, comments_url: &str) -> Result<Vec<Comment>> {
        self.fetch_issue_comments(comments_url).map_err(Into::into)
    }
}

/// Publishes the article as a comment on the closed issue
pub struct CommentPublisher<'a> {
    client: &'a GitHubClient,
}

impl<'a> CommentPublisher<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }
}

impl ArticlePublisher for CommentPublisher<'_> {
    fn publish(&self, repo: &RepoSlug, issue: &Issue, article: &str) -> Result<Publication> {
        let url = self
            .client
            .post_comment_to_issue(repo, issue.number, article)?;
        Ok(Publication::Comment { url })
    }
}

/// Publishes the article as a new discussion in a fixed category
pub struct DiscussionPublisher<'a> {
    client: &'a GitHubClient,
    category_id: String,
}

impl<'a> DiscussionPublisher<'a> {
    pub fn new(client: &'a GitHubClient, category_id: &str) -> Self {
        Self {
            client,
            category_id: category_id.to_string(),
        }
    }
}

impl ArticlePublisher for DiscussionPublisher<'_> {
    fn publish(&self, repo: &RepoSlug, issue: &Issue, article: &str) -> Result<Publication> {
        let url = self.client.post_discussion_to_repo(
            repo,
            &self.category_id,
            &discussion_title(issue),
            article,
        )?;
        Ok(Publication::Discussion { url })
    }
}

/// Title used for the discussion generated from `issue`
pub fn discussion_title(issue: &Issue) -> String {
    format!("{} (#{})", issue.title.trim(), issue.number)
}
