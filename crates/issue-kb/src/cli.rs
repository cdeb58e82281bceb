use crate::config::PublishTarget;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "issue-kb",
    version,
    about = "Turn closed GitHub issues into knowledge base articles"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "ISSUE_KB_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub API base URL (overrides config file)
    #[arg(long, env = "ISSUE_KB_API_URL", global = true)]
    pub api_url: Option<String>,

    /// GitHub token (overrides config file)
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log line format (logs go to stderr)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Handle a closed issue: fetch it, generate a KB article and publish it
    Closed {
        /// Repository in owner/name form
        repo: String,
        /// Issue number
        number: u64,
        /// Where to publish the article (overrides config file)
        #[arg(long, value_enum)]
        publish: Option<PublishTarget>,
        /// Discussion category node id (required for --publish discussion)
        #[arg(long)]
        category_id: Option<String>,
        /// Model slot used for generation (overrides config file)
        #[arg(long)]
        model_slot: Option<String>,
    },
    /// Fetch and print an issue with its comments
    #[command(visible_alias = "s")]
    Show {
        /// Repository in owner/name form
        repo: String,
        /// Issue number
        number: u64,
    },
    /// Print the prompt that would be sent to the model, without calling it
    Prompt {
        /// Repository in owner/name form
        repo: String,
        /// Issue number
        number: u64,
    },
    /// Configuration operations
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (secrets redacted)
    Show,
    /// Show the config file locations that are searched
    Path,
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "issue-kb", &mut std::io::stdout());
    }
}
