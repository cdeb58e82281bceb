use crate::cli::OutputFormat;
use crate::output::{output_result, IssueWithComments, PromptPreview};
use anyhow::{Context, Result};
use article_generator::{build_prompt, SYSTEM_PROMPT};
use kb_core::{Comment, Issue, IssueSource, RepoSlug};

/// Fetch an issue and its comments the same way a closure run does
fn fetch(source: &dyn IssueSource, repo: &RepoSlug, number: u64) -> Result<(Issue, Vec<Comment>)> {
    let issue = source
        .fetch_issue(repo, number)
        .with_context(|| format!("Failed to fetch {}#{}", repo, number))?;
    let comments = source
        .fetch_comments(issue.comments_url()?)
        .with_context(|| format!("Failed to fetch comments of {}#{}", repo, number))?;
    Ok((issue, comments))
}

pub fn handle_show(
    source: &dyn IssueSource,
    repo: &RepoSlug,
    number: u64,
    format: OutputFormat,
) -> Result<()> {
    let (issue, comments) = fetch(source, repo, number)?;
    output_result(
        &IssueWithComments {
            issue: &issue,
            comments: &comments,
        },
        format,
    );
    Ok(())
}

pub fn handle_prompt(
    source: &dyn IssueSource,
    repo: &RepoSlug,
    number: u64,
    format: OutputFormat,
) -> Result<()> {
    let (issue, comments) = fetch(source, repo, number)?;
    output_result(
        &PromptPreview {
            system: SYSTEM_PROMPT.to_string(),
            user: build_prompt(&issue, &comments),
        },
        format,
    );
    Ok(())
}
