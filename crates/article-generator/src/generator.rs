use kb_core::{ArticleWriter, Comment, Issue};
use tracing::{debug, info};

use crate::chat::ChatModel;
use crate::error::{GeneratorError, Result};
use crate::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::slots::ModelRegistry;

/// Sampling temperature for article generation
pub const ARTICLE_TEMPERATURE: f64 = 0.7;

/// Generates KB articles with a fixed chat model
pub struct ArticleGenerator<M: ChatModel> {
    model: M,
}

impl<M: ChatModel> ArticleGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Ask the model for a markdown article and return it trimmed
    pub fn generate_kb_article(&self, issue: &Issue, comments: &[Comment]) -> Result<String> {
        let prompt = build_prompt(issue, comments);
        let input = self
            .model
            .create_input(SYSTEM_PROMPT, &prompt)
            .with_temperature(ARTICLE_TEMPERATURE);

        debug!(
            model = %input.model,
            prompt_chars = prompt.len(),
            "invoking model"
        );
        let response = self.model.invoke(&input)?;

        if let Some(usage) = &response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "article generated"
            );
        }

        let article = response
            .first_content()
            .map(str::trim)
            .ok_or_else(|| {
                GeneratorError::NoChoice(format!(
                    "{} choices, first has no content",
                    response.choices.len()
                ))
            })?;

        if article.is_empty() {
            return Err(GeneratorError::NoChoice("article is blank".to_string()));
        }
        Ok(article.to_string())
    }
}

impl<M: ChatModel> ArticleWriter for ArticleGenerator<M> {
    fn write_article(&self, issue: &Issue, comments: &[Comment]) -> kb_core::Result<String> {
        self.generate_kb_article(issue, comments)
            .map_err(Into::into)
    }
}

/// Resolves a named model slot at generation time
///
/// An unresolvable slot surfaces as `ModelUnavailable` from the generation
/// stage rather than at startup.
pub struct SlotGenerator {
    registry: ModelRegistry,
    slot: String,
}

impl SlotGenerator {
    pub fn new(registry: ModelRegistry, slot: &str) -> Self {
        Self {
            registry,
            slot: slot.to_string(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }
}

impl ArticleWriter for SlotGenerator {
    fn write_article(&self, issue: &Issue, comments: &[Comment]) -> kb_core::Result<String> {
        let client = self.registry.resolve(&self.slot)?;
        ArticleGenerator::new(client).write_article(issue, comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatRequest, ChatResponse, Role};
    use kb_core::KbError;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: serde_json::Value,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedModel {
        fn replying(reply: serde_json::Value) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatModel for &ScriptedModel {
        fn model(&self) -> &str {
            "test-model"
        }

        fn invoke(&self, request: &ChatRequest) -> Result<ChatResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(serde_json::from_value(self.reply.clone())?)
        }
    }

    fn issue() -> Issue {
        serde_json::from_value(serde_json::json!({
            "number": 42,
            "title": "Crash on startup",
            "state": "closed",
            "body": "It crashes"
        }))
        .unwrap()
    }

    fn reply_with(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        })
    }

    #[test]
    fn test_returns_trimmed_first_choice() {
        let model = ScriptedModel::replying(reply_with("\n\n## Summary\nFixed.\n  ".into()));
        let article = ArticleGenerator::new(&model)
            .generate_kb_article(&issue(), &[])
            .unwrap();

        assert_eq!(article, "## Summary\nFixed.");
    }

    #[test]
    fn test_sends_system_then_user_at_fixed_temperature() {
        let model = ScriptedModel::replying(reply_with("ok".into()));
        ArticleGenerator::new(&model)
            .generate_kb_article(&issue(), &[])
            .unwrap();

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.model, "test-model");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, Role::User);
        assert!(request.messages[1].content.contains("Title: Crash on startup"));
    }

    #[test]
    fn test_no_choices_is_invocation_error() {
        let model = ScriptedModel::replying(serde_json::json!({"choices": []}));
        let err = ArticleGenerator::new(&model)
            .write_article(&issue(), &[])
            .unwrap_err();

        assert!(matches!(err, KbError::ModelInvocation(_)));
    }

    #[test]
    fn test_null_or_blank_content_is_invocation_error() {
        for content in [serde_json::Value::Null, "   \n".into()] {
            let model = ScriptedModel::replying(reply_with(content));
            let err = ArticleGenerator::new(&model)
                .generate_kb_article(&issue(), &[])
                .unwrap_err();
            assert!(matches!(err, GeneratorError::NoChoice(_)));
        }
    }

    #[test]
    fn test_unconfigured_slot_is_model_unavailable() {
        let generator = SlotGenerator::new(
            ModelRegistry::new(Default::default(), std::time::Duration::from_secs(1)),
            "generate-article",
        );
        let err = generator.write_article(&issue(), &[]).unwrap_err();

        assert!(matches!(err, KbError::ModelUnavailable(msg) if msg.contains("generate-article")));
    }
}
