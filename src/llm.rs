//! Chat completion adapter
//!
//! Sends the ordered turn sequence (persona system turn first) to an
//! OpenAI-compatible chat-completions endpoint and returns the first
//! candidate's text. Non-streaming; completion sits on the critical path,
//! so every failure propagates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::session::ChatTurn;
use crate::turn::Completer;
use crate::{Error, Result};

/// Chat-completion client with fixed sampling parameters
pub struct ChatCompletions {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletions {
    /// Create a new completion client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        config: &LlmConfig,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "API key required for completions".to_string(),
            ));
        }

        Ok(Self {
            client,
            base_url,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl Completer for ChatCompletions {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: turns,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "completion request failed");
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "completion API error");
            return Err(Error::Completion(format!(
                "completion error {status}: {body}"
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("failed to parse response: {e}")))?;

        // First candidate only; the request doesn't ask for more
        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::Completion("empty completion response".to_string()))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
