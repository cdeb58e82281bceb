use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KbError, Result};

/// GitHub user or bot, as embedded in issues and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
    /// Account type ("User", "Bot", "Organization")
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub site_admin: bool,
}

/// Issue label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Color hex string WITHOUT `#` prefix (e.g., "fc2929")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reaction tally on an issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(rename = "+1", default)]
    pub plus_one: u64,
    #[serde(rename = "-1", default)]
    pub minus_one: u64,
    #[serde(default)]
    pub laugh: u64,
    #[serde(default)]
    pub hooray: u64,
    #[serde(default)]
    pub confused: u64,
    #[serde(default)]
    pub heart: u64,
    #[serde(default)]
    pub rocket: u64,
    #[serde(default)]
    pub eyes: u64,
}

/// Snapshot of a GitHub issue, fetched once per closure event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Number of comments on the issue
    #[serde(default)]
    pub comments: u64,
    /// Canonical comments endpoint supplied by GitHub
    #[serde(default)]
    pub comments_url: Option<String>,
    #[serde(default)]
    pub reactions: Reactions,
}

impl Issue {
    /// Login of the issue author, or "ghost" for deleted accounts
    pub fn author_login(&self) -> &str {
        self.user.as_ref().map_or("ghost", |u| u.login.as_str())
    }

    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    /// The comments endpoint embedded in this issue.
    ///
    /// Comments must always be fetched from here rather than from a URL
    /// rebuilt on the client side.
    pub fn comments_url(&self) -> Result<&str> {
        self.comments_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| KbError::Decode(format!("issue #{} has no comments_url", self.number)))
    }
}

/// Issue comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl Comment {
    pub fn author_login(&self) -> &str {
        self.user.as_ref().map_or("ghost", |u| u.login.as_str())
    }
}

/// Repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

impl FromStr for RepoSlug {
    type Err = KbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(KbError::InvalidRepository(format!(
                "expected 'owner/name', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Serialize for RepoSlug {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where a generated article ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Publication {
    /// Printed only; nothing was written to GitHub
    Stdout,
    Comment { url: Option<String> },
    Discussion { url: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_json() -> serde_json::Value {
        json!({
            "number": 42,
            "title": "Crash on startup",
            "body": "It \"crashes\"\nevery time",
            "state": "closed",
            "html_url": "https://github.com/org/repo/issues/42",
            "created_at": "2024-01-15T10:30:00Z",
            "updated_at": "2024-01-16T09:00:00Z",
            "closed_at": "2024-01-16T09:00:00Z",
            "user": {
                "login": "reporter",
                "html_url": "https://github.com/reporter",
                "type": "User",
                "site_admin": false
            },
            "labels": [{"name": "bug"}, {"name": "crash"}],
            "comments": 1,
            "comments_url": "https://api.github.com/repos/org/repo/issues/42/comments",
            "reactions": {
                "url": "https://api.github.com/repos/org/repo/issues/42/reactions",
                "total_count": 11,
                "+1": 3,
                "-1": 0,
                "laugh": 0,
                "hooray": 0,
                "confused": 0,
                "heart": 1,
                "rocket": 2,
                "eyes": 5
            }
        })
    }

    #[test]
    fn test_issue_round_trip_preserves_named_fields() {
        let original = issue_json();
        let issue: Issue = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(issue.reactions.plus_one, 3);
        assert_eq!(issue.user.as_ref().unwrap().account_type.as_deref(), Some("User"));

        let encoded = serde_json::to_value(&issue).unwrap();
        assert_eq!(encoded, original);
    }

    #[test]
    fn test_issue_decodes_sparse_payload() {
        let issue: Issue = serde_json::from_value(json!({
            "number": 7,
            "title": "Minimal",
            "body": null,
            "user": null
        }))
        .unwrap();

        assert_eq!(issue.author_login(), "ghost");
        assert!(issue.labels.is_empty());
        assert_eq!(issue.reactions, Reactions::default());
        assert!(issue.comments_url().is_err());
    }

    #[test]
    fn test_comments_url_comes_from_payload() {
        let issue: Issue = serde_json::from_value(issue_json()).unwrap();
        assert_eq!(
            issue.comments_url().unwrap(),
            "https://api.github.com/repos/org/repo/issues/42/comments"
        );
    }

    #[test]
    fn test_repo_slug_parse() {
        let slug: RepoSlug = "org/repo".parse().unwrap();
        assert_eq!(slug.owner, "org");
        assert_eq!(slug.name, "repo");
        assert_eq!(slug.to_string(), "org/repo");
    }

    #[test]
    fn test_repo_slug_rejects_malformed() {
        for bad in ["org", "/repo", "org/", "a/b/c", ""] {
            let err = bad.parse::<RepoSlug>().unwrap_err();
            assert!(matches!(err, KbError::InvalidRepository(_)), "{bad}");
        }
    }

    #[test]
    fn test_publication_serializes_with_kind_tag() {
        let value = serde_json::to_value(Publication::Discussion {
            url: "https://github.com/org/repo/discussions/1".into(),
        })
        .unwrap();
        assert_eq!(value["kind"], "discussion");
        assert_eq!(value["url"], "https://github.com/org/repo/discussions/1");
    }
}
