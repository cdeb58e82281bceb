use crate::cli::OutputFormat;
use colored::Colorize;
use kb_core::{ClosureReport, Comment, Issue, Publication};
use serde::Serialize;

/// Text rendering for CLI output
pub trait Displayable {
    fn display(&self) -> String;
}

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: error_code(err).to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

/// Stable machine-readable code for the error kinds of a closure run
fn error_code(err: &anyhow::Error) -> &'static str {
    use kb_core::KbError;

    let kb_error = err
        .downcast_ref::<kb_core::ClosureFailure>()
        .map(|f| &f.source)
        .or_else(|| err.downcast_ref::<KbError>());

    match kb_error {
        Some(KbError::Network(_)) => "network_error",
        Some(KbError::UnexpectedStatus { .. }) => "unexpected_status",
        Some(KbError::Decode(_)) => "decode_error",
        Some(KbError::ModelUnavailable(_)) => "model_unavailable",
        Some(KbError::ModelInvocation(_)) => "model_invocation_error",
        Some(KbError::RepositoryLookup(_)) => "repository_lookup_error",
        Some(KbError::DiscussionCreate(_)) => "discussion_create_error",
        Some(KbError::Publish { .. }) => "publish_error",
        Some(KbError::InvalidRepository(_)) => "invalid_repository",
        Some(KbError::MissingToken) => "missing_token",
        None => "error",
    }
}

/// An issue together with its comments, as printed by `show`
#[derive(Serialize)]
pub struct IssueWithComments<'a> {
    pub issue: &'a Issue,
    pub comments: &'a [Comment],
}

impl Displayable for IssueWithComments<'_> {
    fn display(&self) -> String {
        let issue = self.issue;
        let mut lines = vec![
            format!("{} {}", format!("#{}", issue.number).cyan().bold(), issue.title.bold()),
            format!("  State: {}", issue.state),
            format!("  Author: {}", issue.author_login()),
        ];
        if let Some(url) = &issue.html_url {
            lines.push(format!("  URL: {}", url.dimmed()));
        }
        if let Some(created) = &issue.created_at {
            lines.push(format!("  Created: {}", created));
        }
        if let Some(closed) = &issue.closed_at {
            lines.push(format!("  Closed: {}", closed));
        }
        let labels = issue.label_names();
        if !labels.is_empty() {
            lines.push(format!("  Labels: {}", labels.join(", ")));
        }
        lines.push(format!(
            "  Reactions: {}",
            article_generator::format_reactions(&issue.reactions)
        ));

        if let Some(body) = issue.body.as_deref().filter(|b| !b.trim().is_empty()) {
            lines.push(String::new());
            lines.push(body.trim_end().to_string());
        }

        lines.push(String::new());
        lines.push(format!("Comments ({}):", self.comments.len()).bold().to_string());
        if self.comments.is_empty() {
            lines.push("  (none)".dimmed().to_string());
        } else {
            lines.push(article_generator::format_comments(self.comments));
        }

        lines.join("\n")
    }
}

/// Prompt text, printed raw in text mode
#[derive(Serialize)]
pub struct PromptPreview {
    pub system: String,
    pub user: String,
}

impl Displayable for PromptPreview {
    fn display(&self) -> String {
        self.user.clone()
    }
}

impl Displayable for ClosureReport {
    /// The article itself; the publication line goes to stderr
    fn display(&self) -> String {
        self.article.clone()
    }
}

/// One-line summary of where the article went
pub fn publication_summary(publication: &Publication) -> String {
    match publication {
        Publication::Stdout => "Article printed (not published)".to_string(),
        Publication::Comment { url: Some(url) } => {
            format!("{} {}", "Posted comment:".green(), url)
        }
        Publication::Comment { url: None } => "Posted comment".green().to_string(),
        Publication::Discussion { url } => {
            format!("{} {}", "Created discussion:".green(), url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::{ClosureFailure, KbError, RepoSlug, Stage};

    #[test]
    fn test_error_code_sees_through_closure_failure() {
        let failure = ClosureFailure {
            repo: RepoSlug::new("org", "repo"),
            issue_number: 42,
            stage: Stage::ArticleGenerated,
            stages: vec![Stage::Start, Stage::Failed],
            source: KbError::Publish {
                status: 403,
                body: "forbidden".into(),
            },
        };
        let err = anyhow::Error::new(failure);
        assert_eq!(error_code(&err), "publish_error");
        assert_eq!(error_code(&anyhow::anyhow!("plain")), "error");
    }

    #[test]
    fn test_publication_summary_mentions_url() {
        colored::control::set_override(false);
        let summary = publication_summary(&Publication::Discussion {
            url: "https://github.com/org/repo/discussions/3".into(),
        });
        assert_eq!(
            summary,
            "Created discussion: https://github.com/org/repo/discussions/3"
        );
    }
}
