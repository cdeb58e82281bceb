use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::chat::ChatClient;
use crate::error::{GeneratorError, Result};

pub const DEFAULT_MODEL_SLOT: &str = "generate-article";

/// Endpoint and model behind a named slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API (e.g., "https://api.openai.com/v1")
    pub base_url: String,
    pub model: String,
    /// Literal API key; takes precedence over `api_key_env`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Name of the environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl ModelConfig {
    pub fn openai(model: &str) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.to_string(),
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
        }
    }

    /// Resolve the API key. `Ok(None)` means the endpoint needs no key.
    fn api_key(&self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Option<String>> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(Some(key.to_string()));
        }
        match &self.api_key_env {
            Some(var) => lookup(var)
                .filter(|k| !k.is_empty())
                .map(Some)
                .ok_or_else(|| {
                    GeneratorError::ModelUnavailable(format!(
                        "API key variable {} is not set",
                        var
                    ))
                }),
            None => Ok(None),
        }
    }
}

/// Named model slots, resolved to clients on demand
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    slots: BTreeMap<String, ModelConfig>,
    timeout: Duration,
}

impl ModelRegistry {
    pub fn new(slots: BTreeMap<String, ModelConfig>, timeout: Duration) -> Self {
        Self { slots, timeout }
    }

    pub fn slot(&self, name: &str) -> Option<&ModelConfig> {
        self.slots.get(name)
    }

    /// Resolve `name` using the process environment for API keys
    pub fn resolve(&self, name: &str) -> Result<ChatClient> {
        self.resolve_with(name, &|var: &str| std::env::var(var).ok())
    }

    pub fn resolve_with(
        &self,
        name: &str,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<ChatClient> {
        let config = self.slots.get(name).ok_or_else(|| {
            GeneratorError::ModelUnavailable(format!("model slot '{}' is not configured", name))
        })?;

        if config.base_url.is_empty() || config.model.is_empty() {
            return Err(GeneratorError::ModelUnavailable(format!(
                "model slot '{}' needs both base_url and model",
                name
            )));
        }

        let api_key = config.api_key(lookup)?;
        Ok(ChatClient::new(
            &config.base_url,
            &config.model,
            api_key.as_deref(),
            self.timeout,
        ))
    }
}
