use anyhow::{anyhow, Result};
use article_generator::{ModelConfig, DEFAULT_MODEL_SLOT};
use clap::ValueEnum;
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const REDACTED: &str = "********";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub article: ArticleConfig,
    /// Named model slots
    #[serde(default = "default_models")]
    pub models: BTreeMap<String, ModelConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Upper bound for any single HTTP request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub target: PublishTarget,
    /// Discussion category node id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleConfig {
    #[serde(default = "default_model_slot")]
    pub model_slot: String,
}

/// Where generated articles go
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishTarget {
    /// Print the article only
    Stdout,
    /// Post the article as a comment on the closed issue
    #[default]
    Comment,
    /// Create a discussion holding the article
    Discussion,
}

/// Values given on the command line, applied over everything else
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub publish: Option<PublishTarget>,
    pub category_id: Option<String>,
    pub model_slot: Option<String>,
}

fn default_api_url() -> String {
    github_backend::client::DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_model_slot() -> String {
    DEFAULT_MODEL_SLOT.to_string()
}

fn default_models() -> BTreeMap<String, ModelConfig> {
    let mut models = BTreeMap::new();
    models.insert(DEFAULT_MODEL_SLOT.to_string(), ModelConfig::openai("gpt-4o-mini"));
    models
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            model_slot: default_model_slot(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            http: HttpConfig::default(),
            publish: PublishConfig::default(),
            article: ArticleConfig::default(),
            models: default_models(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(config_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // ISSUE_KB_GITHUB__TOKEN -> github.token, ISSUE_KB_PUBLISH__TARGET -> publish.target
        figment = figment.merge(Env::prefixed("ISSUE_KB_").split("__"));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, cli: CliOverrides) {
        if let Some(url) = cli.api_url {
            self.github.api_url = url;
        }
        if let Some(token) = cli.token {
            self.github.token = Some(token);
        }
        if let Some(target) = cli.publish {
            self.publish.target = target;
        }
        if let Some(category_id) = cli.category_id {
            self.publish.category_id = Some(category_id);
        }
        if let Some(slot) = cli.model_slot {
            self.article.model_slot = slot;
        }
    }

    /// Check that the configured publish target can actually run
    pub fn validate(&self) -> Result<()> {
        let has_token = self.github.token.as_deref().is_some_and(|t| !t.is_empty());

        match self.publish.target {
            PublishTarget::Stdout => {}
            PublishTarget::Comment | PublishTarget::Discussion if !has_token => {
                return Err(anyhow!(
                    "GitHub token not configured. Set via --token, GITHUB_TOKEN env var, or config file"
                ));
            }
            PublishTarget::Comment => {}
            PublishTarget::Discussion => {
                if self.publish.category_id.as_deref().map_or(true, str::is_empty) {
                    return Err(anyhow!(
                        "Discussion category not configured. Set via --category-id or publish.category_id in the config file"
                    ));
                }
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(anyhow!("http.timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Copy of this configuration with every secret masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.github.token.is_some() {
            config.github.token = Some(REDACTED.to_string());
        }
        for model in config.models.values_mut() {
            if model.api_key.is_some() {
                model.api_key = Some(REDACTED.to_string());
            }
        }
        config
    }
}

pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "issue-kb").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("issue-kb").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("issue-kb")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("issue-kb.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.publish.target, PublishTarget::Comment);
        assert_eq!(config.article.model_slot, "generate-article");
        assert!(config.models.contains_key("generate-article"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_file_keeps_default_slot() {
        let file = write_config(
            r#"
[github]
token = "ghp_file"

[publish]
target = "discussion"
category_id = "DIC_kwDOAbc"

[models.summarize]
base_url = "http://localhost:11434/v1"
model = "llama3"
"#,
        );

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.github.token.as_deref(), Some("ghp_file"));
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.publish.target, PublishTarget::Discussion);
        assert_eq!(config.publish.category_id.as_deref(), Some("DIC_kwDOAbc"));
        assert_eq!(config.models["summarize"].model, "llama3");
        assert!(config.models.contains_key("generate-article"));
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/issue-kb.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = Config::default();
        config.merge_with_cli(CliOverrides {
            api_url: Some("http://localhost:9000".into()),
            token: Some("ghp_cli".into()),
            publish: Some(PublishTarget::Stdout),
            category_id: None,
            model_slot: Some("summarize".into()),
        });

        assert_eq!(config.github.api_url, "http://localhost:9000");
        assert_eq!(config.github.token.as_deref(), Some("ghp_cli"));
        assert_eq!(config.publish.target, PublishTarget::Stdout);
        assert_eq!(config.article.model_slot, "summarize");
    }

    #[test]
    fn test_validate_requires_token_for_writes() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GitHub token not configured"));

        let mut stdout_only = Config::default();
        stdout_only.publish.target = PublishTarget::Stdout;
        stdout_only.validate().unwrap();
    }

    #[test]
    fn test_validate_requires_category_for_discussions() {
        let mut config = Config::default();
        config.github.token = Some("ghp_x".into());
        config.publish.target = PublishTarget::Discussion;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Discussion category not configured"));
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let mut config = Config::default();
        config.github.token = Some("ghp_secret".into());
        config
            .models
            .get_mut("generate-article")
            .unwrap()
            .api_key = Some("sk-secret".into());

        let rendered = toml::to_string(&config.redacted()).unwrap();
        assert!(!rendered.contains("ghp_secret"));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains(REDACTED));
    }
}
