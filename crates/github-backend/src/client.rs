use kb_core::{Comment, Issue, RepoSlug};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use ureq::{Agent, RequestBuilder};

use crate::error::{GitHubError, Result};
use crate::graphql::{
    CREATE_DISCUSSION_MUTATION, GraphQlRequest, GraphQlResponse, REPOSITORY_ID_QUERY,
};
use crate::models::*;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub's maximum page size
pub const COMMENTS_PER_PAGE: usize = 100;
pub const MAX_COMMENT_PAGES: usize = 50;

const USER_AGENT: &str = concat!("issue-kb/", env!("CARGO_PKG_VERSION"));

/// GitHub REST + GraphQL client
///
/// Reads work anonymously when no token is configured; writes require one.
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(token: Option<&str>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    pub fn with_base_url(base_url: &str, token: Option<&str>) -> Self {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, token: Option<&str>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, repo: &RepoSlug, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name),
            path
        )
    }

    fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base_url)
    }

    fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(GitHubError::MissingToken)
    }

    /// Attach the standard GitHub headers, plus bearer auth when a token is set
    fn prepare<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let request = with_github_headers(request);

        match &self.token {
            Some(token) => request.header("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Whether `url` points at the configured API host
    fn is_api_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
    }

    /// GET a JSON document, requiring HTTP 200.
    ///
    /// The token is only sent when `url` is on the configured API host.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let request = self.agent.get(url);
        let request = if self.is_api_url(url) {
            self.prepare(request)
        } else {
            debug!(%url, "foreign host, sending request without credentials");
            with_github_headers(request)
        };

        let (status, body) = read_response(request.call()?)?;
        if status != 200 {
            return Err(GitHubError::UnexpectedStatus {
                status,
                body: body_text(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// POST a GraphQL request, requiring HTTP 200, and return the raw body
    fn post_graphql(&self, request: &GraphQlRequest<'_>) -> Result<Vec<u8>> {
        self.require_token()?;
        let url = self.graphql_url();
        debug!(%url, "POST graphql");

        let response = self
            .prepare(self.agent.post(&url))
            .header("Content-Type", "application/json")
            .send_json(request)?;

        let (status, body) = read_response(response)?;
        if status != 200 {
            return Err(GitHubError::UnexpectedStatus {
                status,
                body: body_text(&body),
            });
        }
        Ok(body)
    }

    // ==================== Read Operations ====================

    /// Fetch an issue by number
    pub fn fetch_issue_details(&self, repo: &RepoSlug, number: u64) -> Result<Issue> {
        self.get_json(&self.repo_url(repo, &format!("/issues/{}", number)))
    }

    /// Fetch every comment at `comments_url`, which must be the value GitHub
    /// returned in the issue itself.
    ///
    /// Pages of [`COMMENTS_PER_PAGE`] are requested until a short page comes
    /// back, up to [`MAX_COMMENT_PAGES`] pages.
    pub fn fetch_issue_comments(&self, comments_url: &str) -> Result<Vec<Comment>> {
        let mut comments = Vec::new();

        for page in 1..=MAX_COMMENT_PAGES {
            let batch: Vec<Comment> = self.get_json(&paged_url(comments_url, page))?;
            let last_page = batch.len() < COMMENTS_PER_PAGE;
            comments.extend(batch);
            if last_page {
                return Ok(comments);
            }
        }

        warn!(
            %comments_url,
            fetched = comments.len(),
            "comment page limit reached, later comments are not included"
        );
        Ok(comments)
    }

    // ==================== Write Operations ====================

    /// Add a comment to an issue. Anything but 201 Created is a failure.
    pub fn post_comment_to_issue(
        &self,
        repo: &RepoSlug,
        number: u64,
        body: &str,
    ) -> Result<Option<String>> {
        self.require_token()?;
        let url = self.repo_url(repo, &format!("/issues/{}/comments", number));
        debug!(%url, "POST comment");

        let comment = CreateGitHubComment {
            body: body.to_string(),
        };

        let response = self
            .prepare(self.agent.post(&url))
            .header("Content-Type", "application/json")
            .send_json(&comment)?;

        let (status, body) = read_response(response)?;
        if status != 201 {
            return Err(GitHubError::Publish {
                status,
                body: body_text(&body),
            });
        }

        let created = serde_json::from_slice::<CreatedGitHubComment>(&body).ok();
        if let Some(c) = &created {
            info!(comment_id = c.id, "comment posted");
        }
        Ok(created.and_then(|c| c.html_url))
    }

    /// Look up the GraphQL node id of a repository
    pub fn fetch_repository_id(&self, repo: &RepoSlug) -> Result<String> {
        let request = GraphQlRequest::new(REPOSITORY_ID_QUERY)
            .variable("owner", repo.owner.as_str())
            .variable("name", repo.name.as_str());

        let body = self.post_graphql(&request)?;
        let response: GraphQlResponse<RepositoryIdData> = serde_json::from_slice(&body)?;

        let id = response
            .data
            .as_ref()
            .and_then(|d| d.repository.as_ref())
            .and_then(|r| r.id.clone())
            .unwrap_or_default();

        if id.is_empty() {
            let reason = response
                .error_summary()
                .unwrap_or_else(|| format!("no repository id returned for {}", repo));
            return Err(GitHubError::RepositoryLookup(reason));
        }
        Ok(id)
    }

    /// Create a discussion in `category_id` and return its URL.
    ///
    /// Looks up the repository id first; if that yields nothing the mutation
    /// is never sent.
    pub fn post_discussion_to_repo(
        &self,
        repo: &RepoSlug,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<String> {
        let repository_id = self.fetch_repository_id(repo)?;

        let request = GraphQlRequest::new(CREATE_DISCUSSION_MUTATION)
            .variable("repositoryId", repository_id)
            .variable("categoryId", category_id)
            .variable("title", title)
            .variable("body", body);

        let raw = self.post_graphql(&request)?;
        let response: GraphQlResponse<CreateDiscussionData> = serde_json::from_slice(&raw)
            .map_err(|e| GitHubError::DiscussionCreate(format!("unparseable response: {}", e)))?;

        let url = response
            .data
            .as_ref()
            .and_then(|d| d.create_discussion.as_ref())
            .and_then(|p| p.discussion.as_ref())
            .and_then(|d| d.url.clone())
            .filter(|u| !u.is_empty());

        match url {
            Some(url) => {
                info!(%url, "discussion created");
                Ok(url)
            }
            None => Err(GitHubError::DiscussionCreate(
                response
                    .error_summary()
                    .unwrap_or_else(|| {
                        format!("no discussion URL in response: {}", body_text(&raw))
                    }),
            )),
        }
    }
}

fn with_github_headers<B>(request: RequestBuilder<B>) -> RequestBuilder<B> {
    request
        .header("Accept", "application/vnd.github+json")
        .header("X-GitHub-Api-Version", "2022-11-28")
        .header("User-Agent", USER_AGENT)
}

/// `url` with GitHub paging parameters appended
fn paged_url(url: &str, page: usize) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}per_page={}&page={}",
        url, separator, COMMENTS_PER_PAGE, page
    )
}

/// Status and raw bytes of a response; bodies are decoded by the caller
fn read_response(mut response: ureq::http::Response<ureq::Body>) -> Result<(u16, Vec<u8>)> {
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_vec()?;
    Ok((status, body))
}

fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}
