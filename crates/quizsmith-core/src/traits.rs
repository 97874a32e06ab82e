//! Core trait definitions for LLM providers and quiz persistence.
//!
//! Providers are implemented by the `quizsmith-providers` crate. The
//! repositories are implemented in [`crate::store`] and injected into
//! [`crate::service::QuizService`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Quiz, QuizAttempt, StoredQuestion};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that write quiz completions from prompts.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Generate a completion for a prompt.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to generate a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Response from a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw completion text.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    /// Estimated cost in USD.
    pub estimated_cost_usd: f64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    /// Cost per 1K input tokens in USD.
    pub cost_per_1k_input: f64,
    /// Cost per 1K output tokens in USD.
    pub cost_per_1k_output: f64,
}

/// Default system prompt for quiz generation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You write multiple-select quiz questions. Follow the requested output format exactly: numbered questions, one option per line prefixed with its letter, and a **Correct Answers:** line after each question. Do not add explanations.";

// ---------------------------------------------------------------------------
// Repository traits
// ---------------------------------------------------------------------------

/// Storage for quizzes and their questions.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert_quiz(&self, quiz: &Quiz) -> anyhow::Result<()>;

    async fn fetch_quiz(&self, quiz_id: &str) -> anyhow::Result<Option<Quiz>>;

    /// All quizzes, newest first.
    async fn list_quizzes(&self) -> anyhow::Result<Vec<Quiz>>;

    /// Store questions for an already inserted quiz.
    async fn insert_questions(&self, quiz_id: &str, questions: &[StoredQuestion])
        -> anyhow::Result<()>;

    /// Questions of a quiz sorted by `order`; empty if the quiz is unknown.
    async fn fetch_questions_by_quiz(&self, quiz_id: &str) -> anyhow::Result<Vec<StoredQuestion>>;
}

/// Storage for scored attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> anyhow::Result<()>;

    /// The stored attempt (submission and its scorecard) with this id.
    async fn fetch_submission(&self, attempt_id: &str) -> anyhow::Result<Option<QuizAttempt>>;

    /// Attempts by a user, newest first.
    async fn list_attempts_by_user(&self, user_id: &str) -> anyhow::Result<Vec<QuizAttempt>>;

    /// Returns `false` if no attempt had this id.
    async fn delete_attempt(&self, attempt_id: &str) -> anyhow::Result<bool>;
}
