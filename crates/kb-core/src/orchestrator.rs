//! Closure handling: fetch issue, fetch comments, generate, publish.
//!
//! Every stage either advances the run or moves it to [`Stage::Failed`],
//! after which nothing else is attempted. There is no retry and nothing is
//! rolled back; publishing is always the last stage.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, info_span};

use crate::error::{KbError, Result};
use crate::models::{Publication, RepoSlug};
use crate::traits::{ArticlePublisher, ArticleWriter, IssueSource};

/// Position of a closure run in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    Fetched,
    CommentsFetched,
    ArticleGenerated,
    Published,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Fetched => "fetched",
            Stage::CommentsFetched => "comments_fetched",
            Stage::ArticleGenerated => "article_generated",
            Stage::Published => "published",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful closure run
#[derive(Debug, Clone, Serialize)]
pub struct ClosureReport {
    pub repo: RepoSlug,
    pub issue_number: u64,
    pub issue_title: String,
    pub comment_count: usize,
    /// Every stage visited, ending with [`Stage::Done`]
    pub stages: Vec<Stage>,
    pub article: String,
    pub publication: Publication,
}

/// A closure run that stopped at `stage`
#[derive(Debug, Error)]
#[error("closure of {repo}#{issue_number} failed after stage '{stage}': {source}")]
pub struct ClosureFailure {
    pub repo: RepoSlug,
    pub issue_number: u64,
    /// Last stage reached before the failure
    pub stage: Stage,
    /// Every stage visited, ending with [`Stage::Failed`]
    pub stages: Vec<Stage>,
    #[source]
    pub source: KbError,
}

/// Sequences read → generate → write for one closed issue
pub struct ClosureOrchestrator<'a> {
    source: &'a dyn IssueSource,
    writer: &'a dyn ArticleWriter,
    publisher: &'a dyn ArticlePublisher,
}

impl<'a> ClosureOrchestrator<'a> {
    pub fn new(
        source: &'a dyn IssueSource,
        writer: &'a dyn ArticleWriter,
        publisher: &'a dyn ArticlePublisher,
    ) -> Self {
        Self {
            source,
            writer,
            publisher,
        }
    }

    /// Handle a single "issue closed" event
    pub fn handle_closure(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> std::result::Result<ClosureReport, ClosureFailure> {
        let span = info_span!("closure", repo = %repo, issue = number);
        let _enter = span.enter();

        let mut run = Run::new(repo, number);
        info!("handling closed issue");

        let issue = run.step(Stage::Fetched, || self.source.fetch_issue(repo, number))?;
        let comments = run.step(Stage::CommentsFetched, || {
            self.source.fetch_comments(issue.comments_url()?)
        })?;
        let article = run.step(Stage::ArticleGenerated, || {
            self.writer.write_article(&issue, &comments)
        })?;
        let publication = run.step(Stage::Published, || {
            self.publisher.publish(repo, &issue, &article)
        })?;

        run.stages.push(Stage::Done);
        info!(comments = comments.len(), "closure handled");

        Ok(ClosureReport {
            repo: repo.clone(),
            issue_number: number,
            issue_title: issue.title,
            comment_count: comments.len(),
            stages: run.stages,
            article,
            publication,
        })
    }
}

struct Run<'r> {
    repo: &'r RepoSlug,
    number: u64,
    stages: Vec<Stage>,
}

impl<'r> Run<'r> {
    fn new(repo: &'r RepoSlug, number: u64) -> Self {
        Self {
            repo,
            number,
            stages: vec![Stage::Start],
        }
    }

    fn current(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Start)
    }

    /// Run one stage, advancing to `next` on success or to `Failed` otherwise
    fn step<T>(
        &mut self,
        next: Stage,
        f: impl FnOnce() -> Result<T>,
    ) -> std::result::Result<T, ClosureFailure> {
        let current = self.current();
        match f() {
            Ok(value) => {
                info!(from = %current, to = %next, "stage complete");
                self.stages.push(next);
                Ok(value)
            }
            Err(err) => {
                error!(stage = %current, attempted = %next, error = %err, "closure stage failed");
                self.stages.push(Stage::Failed);
                Err(ClosureFailure {
                    repo: self.repo.clone(),
                    issue_number: self.number,
                    stage: current,
                    stages: std::mem::take(&mut self.stages),
                    source: err,
                })
            }
        }
    }
}
