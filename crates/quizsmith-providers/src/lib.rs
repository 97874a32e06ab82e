//! quizsmith-providers: LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for Anthropic, OpenAI and Ollama so
//! quizzes can be generated from hosted or local models, and loads the
//! `quizsmith.toml` configuration that selects between them.

pub mod anthropic;
pub mod config;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, QuizsmithConfig};
pub use quizsmith_core::error::ProviderError;
