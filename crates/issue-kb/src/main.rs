mod cli;
mod color;
mod commands;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::{CliOverrides, Config};
use github_backend::GitHubClient;
use kb_core::RepoSlug;
use output::output_error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = cli.format;

    let colors = color::init(cli.color);
    let result =
        logging::init(&cli.log_level, cli.log_format, colors.stderr).and_then(|()| run(cli));

    if let Err(e) = result {
        output_error(&e, format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        Cli::generate_completions(*shell);
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    let mut overrides = CliOverrides {
        api_url: cli.api_url.clone(),
        token: cli.token.clone(),
        ..Default::default()
    };
    if let Commands::Closed {
        publish,
        category_id,
        model_slot,
        ..
    } = &cli.command
    {
        overrides.publish = *publish;
        overrides.category_id = category_id.clone();
        overrides.model_slot = model_slot.clone();
    }
    config.merge_with_cli(overrides);

    let client = || {
        GitHubClient::with_timeout(
            &config.github.api_url,
            config.github.token.as_deref(),
            config.timeout(),
        )
    };

    match &cli.command {
        Commands::Closed { repo, number, .. } => {
            config.validate()?;
            let repo: RepoSlug = repo.parse()?;
            commands::closed::handle_closed(&client(), &config, &repo, *number, cli.format)
        }
        Commands::Show { repo, number } => {
            let repo: RepoSlug = repo.parse()?;
            commands::show::handle_show(&client(), &repo, *number, cli.format)
        }
        Commands::Prompt { repo, number } => {
            let repo: RepoSlug = repo.parse()?;
            commands::show::handle_prompt(&client(), &repo, *number, cli.format)
        }
        Commands::Config { action } => {
            commands::config::handle_config(action, cli.config.as_deref(), &config, cli.format)
        }
        Commands::Completions { .. } => Ok(()),
    }
}
