//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizsmith_core::model::Difficulty;
use quizsmith_core::prompt::DEFAULT_NUM_QUESTIONS;
use quizsmith_core::service::QuizServiceConfig;
use quizsmith_core::traits::LlmProvider;

use crate::anthropic::AnthropicProvider;
use crate::mock::MockProvider;
use crate::ollama::{self, OllamaProvider};
use crate::openai::OpenAiProvider;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "quizsmith.toml";

/// Configuration for a single LLM provider.
///
/// `Debug` masks API keys so configs can be logged.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
    /// Offline provider replaying a completion file, or a built-in sample.
    Mock {
        #[serde(default)]
        response_file: Option<PathBuf>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock { response_file } => f
                .debug_struct("Mock")
                .field("response_file", response_file)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    ollama::DEFAULT_BASE_URL.to_string()
}

/// Top-level quizsmith configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizsmithConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default = "default_provider")]
    pub default_provider: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Max retries on transient provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Directory of the JSON quiz and attempt store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_num_questions")]
    pub default_num_questions: u32,
    #[serde(default)]
    pub default_difficulty: Difficulty,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./quizsmith-data")
}
fn default_num_questions() -> u32 {
    DEFAULT_NUM_QUESTIONS
}

impl Default for QuizsmithConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            data_dir: default_data_dir(),
            default_num_questions: default_num_questions(),
            default_difficulty: Difficulty::default(),
        }
    }
}

impl QuizsmithConfig {
    /// Service settings for generating with `model`.
    pub fn service_config(&self, model: &str) -> QuizServiceConfig {
        QuizServiceConfig {
            model: model.to_string(),
            temperature: self.default_temperature,
            max_tokens: self.max_tokens,
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            system_prompt_override: None,
        }
    }
}

/// Expand `${VAR}` references from the environment. Unset variables expand
/// to the empty string; an unterminated `${` is kept literally.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + 2 + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_provider_config(config: ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(&api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            org_id: org_id.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(&api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(&base_url),
        },
        mock @ ProviderConfig::Mock { .. } => mock,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizsmith.toml` in the current directory
/// 2. `~/.config/quizsmith/config.toml`
///
/// Environment variable overrides: `QUIZSMITH_OPENAI_KEY`, `QUIZSMITH_ANTHROPIC_KEY`.
pub fn load_config() -> Result<QuizsmithConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizsmithConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => [Some(PathBuf::from(LOCAL_CONFIG_FILE)), global_config_path()]
            .into_iter()
            .flatten()
            .find(|p| p.exists()),
    };

    let mut config = match &config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizsmithConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizsmithConfig::default(),
    };

    apply_env_overrides(&mut config);

    config.providers = config
        .providers
        .into_iter()
        .map(|(name, provider)| (name, resolve_provider_config(provider)))
        .collect();

    Ok(config)
}

fn apply_env_overrides(config: &mut QuizsmithConfig) {
    if let Ok(key) = std::env::var("QUIZSMITH_ANTHROPIC_KEY") {
        match config.providers.get_mut("anthropic") {
            Some(ProviderConfig::Anthropic { api_key, .. }) => *api_key = key,
            _ => {
                config.providers.insert(
                    "anthropic".into(),
                    ProviderConfig::Anthropic {
                        api_key: key,
                        base_url: None,
                    },
                );
            }
        }
    }

    if let Ok(key) = std::env::var("QUIZSMITH_OPENAI_KEY") {
        match config.providers.get_mut("openai") {
            Some(ProviderConfig::OpenAI { api_key, .. }) => *api_key = key,
            _ => {
                config.providers.insert(
                    "openai".into(),
                    ProviderConfig::OpenAI {
                        api_key: key,
                        base_url: None,
                        org_id: None,
                    },
                );
            }
        }
    }
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("quizsmith")
            .join("config.toml")
    })
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match config {
        ProviderConfig::Anthropic { api_key, base_url } => {
            Arc::new(AnthropicProvider::new(api_key, base_url.clone()))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Arc::new(OpenAiProvider::new(api_key, base_url.clone(), org_id.clone())),
        ProviderConfig::Ollama { base_url } => Arc::new(OllamaProvider::new(base_url)),
        ProviderConfig::Mock { response_file } => match response_file {
            Some(path) => {
                let response = std::fs::read_to_string(path).with_context(|| {
                    format!("failed to read mock response: {}", path.display())
                })?;
                Arc::new(MockProvider::with_fixed_response(&response))
            }
            None => Arc::new(MockProvider::default()),
        },
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZSMITH_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZSMITH_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZSMITH_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_QUIZSMITH_UNSET_VAR}x"), "x");
        assert_eq!(resolve_env_vars("broken ${VAR"), "broken ${VAR");
        std::env::remove_var("_QUIZSMITH_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizsmithConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_num_questions, 5);
        assert_eq!(config.default_difficulty, Difficulty::Medium);
        assert_eq!(config.max_retries, 3);

        let service = config.service_config("gpt-4o");
        assert_eq!(service.model, "gpt-4o");
        assert_eq!(service.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "anthropic"
default_model = "claude-sonnet-4-20250514"
default_difficulty = "hard"
data_dir = "/var/lib/quizsmith"

[providers.anthropic]
type = "anthropic"
api_key = "sk-test"

[providers.openai]
type = "openai"
api_key = "sk-openai"

[providers.ollama]
type = "ollama"

[providers.offline]
type = "mock"
"#;
        let config: QuizsmithConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 4);
        assert_eq!(config.default_difficulty, Difficulty::Hard);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/quizsmith"));
        assert!(matches!(
            config.providers.get("ollama"),
            Some(ProviderConfig::Ollama { base_url }) if base_url == "http://localhost:11434"
        ));
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::OpenAI {
            api_key: "sk-secret".into(),
            base_url: None,
            org_id: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizsmith.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizsmith.toml");
        std::fs::write(
            &path,
            "default_model = \"llama3.1:8b\"\nmax_tokens = 1000\n\n[providers.local]\ntype = \"ollama\"\nbase_url = \"http://gpu:11434\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_model, "llama3.1:8b");
        assert_eq!(config.max_tokens, 1000);
        assert!(config.providers.contains_key("local"));
    }

    #[test]
    fn mock_provider_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("completion.txt");
        std::fs::write(&path, "1. Q?\nA. a\n**Correct Answers:** A").unwrap();

        let provider = create_provider(&ProviderConfig::Mock {
            response_file: Some(path),
        })
        .unwrap();
        assert_eq!(provider.name(), "mock");

        assert!(create_provider(&ProviderConfig::Mock {
            response_file: Some(dir.path().join("missing.txt")),
        })
        .is_err());
    }
}
