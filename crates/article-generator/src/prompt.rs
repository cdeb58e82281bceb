use kb_core::{Comment, Issue, Reactions};

pub const SYSTEM_PROMPT: &str = "You are a technical writer for a software project's knowledge base. \
Generate clear, well-structured markdown documentation from GitHub issues and their discussions. \
Respond with the markdown article only.";

/// One bullet per comment, in the order given: `- **{author}** ({created_at}): {body}`
pub fn format_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| {
            format!(
                "- **{}** ({}): {}",
                c.author_login(),
                c.created_at.as_deref().unwrap_or("unknown time"),
                c.body.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The six reaction counters the article prompt reports, in fixed order
pub fn format_reactions(reactions: &Reactions) -> String {
    format!(
        "+1: {}, -1: {}, heart: {}, hooray: {}, rocket: {}, eyes: {}",
        reactions.plus_one,
        reactions.minus_one,
        reactions.heart,
        reactions.hooray,
        reactions.rocket,
        reactions.eyes
    )
}

/// User message sent to the model for `issue`
pub fn build_prompt(issue: &Issue, comments: &[Comment]) -> String {
    let body = issue
        .body
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or("(no description)");

    let labels = issue.label_names();
    let labels = if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    };

    let comments = if comments.is_empty() {
        "(no comments)".to_string()
    } else {
        format_comments(comments)
    };

    format!(
        "Write a knowledge base article in markdown for the following GitHub issue.\n\
         Summarize the problem, the root cause if it is known, and how it was resolved.\n\
         \n\
         Title: {title}\n\
         State: {state}\n\
         Author: {author}\n\
         Created at: {created}\n\
         Labels: {labels}\n\
         Reactions: {reactions}\n\
         \n\
         Description:\n\
         {body}\n\
         \n\
         Comments:\n\
         {comments}\n",
        title = issue.title,
        state = issue.state,
        author = issue.author_login(),
        created = issue.created_at.as_deref().unwrap_or("unknown"),
        labels = labels,
        reactions = format_reactions(&issue.reactions),
        body = body,
        comments = comments,
    )
}
