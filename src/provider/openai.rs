//! OpenAI-compatible chat completions backend.
//!
//! Covers OpenAI itself plus DeepSeek, Mistral, and Together, which all
//! speak the same wire format behind different base URLs.

use crate::core::error::ProviderError;
use crate::provider::{status_error, transport_error, Provider, SendOptions};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct OpenAiCompatibleProvider {
    client: Client,
    label: &'static str,
    api_url: &'static str,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        label: &'static str,
        api_url: &'static str,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            client: Client::new(),
            label,
            api_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        self.label
    }

    async fn send(&self, prompt: &str, opts: &SendOptions) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: opts.max_tokens,
            temperature: opts.temperature,
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt.into(),
            }],
        };

        let response = self
            .client
            .post(self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .timeout(opts.timeout)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let completion: ChatResponse = response.json().await.map_err(transport_error)?;

        completion
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("empty response body".into()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}
