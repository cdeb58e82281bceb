//! KB article generation from closed GitHub issues.
//!
//! Talks to any OpenAI-compatible chat completions endpoint. Which endpoint
//! and model is used is decided by a named model slot (see [`ModelRegistry`]).

pub mod chat;
pub mod error;
pub mod generator;
pub mod prompt;
pub mod slots;

#[cfg(test)]
mod chat_tests;

pub use chat::{ChatClient, ChatMessage, ChatModel, ChatRequest, ChatResponse, Role};
pub use error::{GeneratorError, Result};
pub use generator::{ARTICLE_TEMPERATURE, ArticleGenerator, SlotGenerator};
pub use prompt::{SYSTEM_PROMPT, build_prompt, format_comments, format_reactions};
pub use slots::{DEFAULT_MODEL_SLOT, ModelConfig, ModelRegistry};
