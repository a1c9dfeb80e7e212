//! AI Client: the single point of entry for chat-completion calls.
//!
//! One synchronous attempt per call: no retries, no backoff, no streaming.
//! Every failure is surfaced to the caller as either `Unavailable` (transport,
//! timeout or non-2xx status) or `MalformedResponse` (body without a usable choice).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed upper bound for one completion call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI service unavailable: {0}")]
    Unavailable(String),

    #[error("AI service returned a response without a usable choice")]
    MalformedResponse { body: String },
}

/// Anything that can answer a system + user prompt pair with raw assistant text.
///
/// The pipeline holds an `Arc<dyn ChatCompletion>` so tests can substitute a recorder.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

/// Bearer-authenticated client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl AiClient {
    pub fn new(endpoint: String, api_key: String, model: String) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, api_key, model, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            api_key,
            model,
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn transport_error(&self, e: reqwest::Error) -> AiError {
        if e.is_timeout() {
            AiError::Unavailable(format!("request timed out after {:?}", self.timeout))
        } else {
            AiError::Unavailable(e.to_string())
        }
    }
}

#[async_trait]
impl ChatCompletion for AiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!("AI endpoint returned {status}: {body}");
            return Err(AiError::Unavailable(format!(
                "endpoint returned status {}",
                status.as_u16()
            )));
        }

        extract_first_choice(body)
    }
}

/// Takes the first choice's message content out of a chat-completions body.
fn extract_first_choice(body: String) -> Result<String, AiError> {
    let parsed: ChatResponse = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(_) => return Err(AiError::MalformedResponse { body }),
    };

    if let Some(usage) = &parsed.usage {
        debug!(
            "AI call succeeded: prompt_tokens={:?}, completion_tokens={:?}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    match parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
    {
        Some(content) => Ok(content),
        None => Err(AiError::MalformedResponse { body }),
    }
}
