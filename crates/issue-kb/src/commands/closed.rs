use crate::cli::OutputFormat;
use crate::config::{Config, PublishTarget};
use crate::output::{output_result, publication_summary, Displayable};
use anyhow::{anyhow, Result};
use article_generator::{ModelRegistry, SlotGenerator};
use chrono::{DateTime, Utc};
use github_backend::{CommentPublisher, DiscussionPublisher, GitHubClient};
use kb_core::{
    ArticlePublisher, ClosureOrchestrator, ClosureReport, Issue, Publication, RepoSlug,
};
use serde::Serialize;
use tracing::info;

/// Leaves the article on stdout only
struct StdoutPublisher;

impl ArticlePublisher for StdoutPublisher {
    fn publish(&self, _repo: &RepoSlug, issue: &Issue, _article: &str) -> kb_core::Result<Publication> {
        info!(issue = issue.number, "publishing to stdout only");
        Ok(Publication::Stdout)
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    #[serde(flatten)]
    report: &'a ClosureReport,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl Displayable for RunReport<'_> {
    fn display(&self) -> String {
        self.report.display()
    }
}

pub fn handle_closed(
    client: &GitHubClient,
    config: &Config,
    repo: &RepoSlug,
    number: u64,
    format: OutputFormat,
) -> Result<()> {
    let registry = ModelRegistry::new(config.models.clone(), config.timeout());
    let writer = SlotGenerator::new(registry, &config.article.model_slot);

    let publisher: Box<dyn ArticlePublisher + '_> = match config.publish.target {
        PublishTarget::Stdout => Box::new(StdoutPublisher),
        PublishTarget::Comment => Box::new(CommentPublisher::new(client)),
        PublishTarget::Discussion => {
            let category_id = config
                .publish
                .category_id
                .as_deref()
                .ok_or_else(|| anyhow!("Discussion category not configured"))?;
            Box::new(DiscussionPublisher::new(client, category_id))
        }
    };

    let started_at = Utc::now();
    let report = ClosureOrchestrator::new(client, &writer, publisher.as_ref())
        .handle_closure(repo, number)?;
    let finished_at = Utc::now();

    output_result(
        &RunReport {
            report: &report,
            started_at,
            finished_at,
        },
        format,
    );

    if format == OutputFormat::Text && report.publication != Publication::Stdout {
        eprintln!("{}", publication_summary(&report.publication));
    }

    Ok(())
}
