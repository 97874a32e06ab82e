//! HTTP plumbing shared by the provider clients.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use quizsmith_core::error::ProviderError;
use quizsmith_core::traits::ModelInfo;

/// Retry hint used when a 429 carries no usable `retry-after` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("failed to build HTTP client")
}

pub(crate) fn send_error(e: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// `{"error": {"message": "..."}}`, the error envelope of both hosted APIs.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_message(body: String) -> String {
    serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Pass a successful response through, or map the failure onto a
/// [`ProviderError`].
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    match status {
        429 => {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            Err(ProviderError::RateLimited {
                retry_after_ms: retry_after_secs * 1000,
            })
        }
        401 | 403 => {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::AuthenticationFailed(error_message(body)))
        }
        404 => Err(ProviderError::ModelNotFound(model.to_string())),
        400.. => {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::ApiError {
                status,
                message: error_message(body),
            })
        }
        _ => Ok(response),
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    response.json().await.map_err(|e| ProviderError::ApiError {
        status: 0,
        message: format!("failed to parse response: {e}"),
    })
}

/// Estimated USD cost of a request from the per-1K prices of a known model.
/// Unknown models cost nothing.
pub(crate) fn estimate_cost(
    models: &[ModelInfo],
    model: &str,
    prompt_tokens: u32,
    completion_tokens: u32,
) -> f64 {
    models
        .iter()
        .filter(|m| model.starts_with(&m.id))
        .max_by_key(|m| m.id.len())
        .map(|m| {
            (prompt_tokens as f64 * m.cost_per_1k_input
                + completion_tokens as f64 * m.cost_per_1k_output)
                / 1000.0
        })
        .unwrap_or(0.0)
}
