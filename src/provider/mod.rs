//! Provider abstraction: one contract, many interchangeable AI backends.
//!
//! Each backend implements [`Provider::send`] and nothing else; selection
//! happens purely through [`ProviderConfig`]. Adding a backend means writing
//! one adapter module and registering it in [`from_config`].

pub mod anthropic;
pub mod gemini;
pub mod openai;

use crate::core::config::ProviderConfig;
use crate::core::error::{ProviderError, Result, ShellwrightError};
use async_trait::async_trait;
use std::time::Duration;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiCompatibleProvider;

/// Sampling and transport parameters for a single provider call.
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Whole-request timeout; expiry maps to [`ProviderError::Network`].
    pub timeout: Duration,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.2,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Uniform contract over AI text-completion backends.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Send a prompt and return the raw text response.
    async fn send(&self, prompt: &str, opts: &SendOptions) -> std::result::Result<String, ProviderError>;
}

/// Build the configured backend.
pub fn from_config(cfg: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match cfg.provider.as_str() {
        "anthropic" => Ok(Box::new(AnthropicProvider::new(
            cfg.api_key.clone(),
            cfg.model.clone(),
        ))),
        "openai" => Ok(Box::new(OpenAiCompatibleProvider::new(
            "openai",
            "https://api.openai.com/v1/chat/completions",
            cfg.api_key.clone(),
            cfg.model.clone(),
        ))),
        "deepseek" => Ok(Box::new(OpenAiCompatibleProvider::new(
            "deepseek",
            "https://api.deepseek.com/chat/completions",
            cfg.api_key.clone(),
            cfg.model.clone(),
        ))),
        "mistral" => Ok(Box::new(OpenAiCompatibleProvider::new(
            "mistral",
            "https://api.mistral.ai/v1/chat/completions",
            cfg.api_key.clone(),
            cfg.model.clone(),
        ))),
        "together" => Ok(Box::new(OpenAiCompatibleProvider::new(
            "together",
            "https://api.together.xyz/v1/chat/completions",
            cfg.api_key.clone(),
            cfg.model.clone(),
        ))),
        "gemini" | "google" => Ok(Box::new(GeminiProvider::new(
            cfg.api_key.clone(),
            cfg.model.clone(),
        ))),
        other => Err(ShellwrightError::Config(format!(
            "unknown provider: {other}"
        ))),
    }
}

/// Map a transport failure to a provider error kind.
pub(crate) fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() || err.is_connect() {
        ProviderError::Network(err.to_string())
    } else if err.is_decode() {
        ProviderError::MalformedResponse(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Map a non-success HTTP status to a provider error kind.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());
    match status.as_u16() {
        401 | 403 => ProviderError::Auth(detail),
        402 | 429 => ProviderError::Quota(detail),
        _ => ProviderError::Network(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(provider: &str) -> ProviderConfig {
        ProviderConfig {
            provider: provider.into(),
            model: "test-model".into(),
            api_key: "test-key".into(),
        }
    }

    #[test]
    fn test_factory_knows_all_catalog_providers() {
        for (name, _) in crate::core::config::PROVIDERS {
            assert!(from_config(&cfg(name)).is_ok(), "factory missing {name}");
        }
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        assert!(from_config(&cfg("carrier-pigeon")).is_err());
    }

    #[test]
    fn test_status_mapping() {
        use reqwest::StatusCode;
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key"),
            ProviderError::Auth(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            ProviderError::Quota(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "oops"),
            ProviderError::Network(_)
        ));
    }
}
