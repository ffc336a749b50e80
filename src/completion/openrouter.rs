//! OpenRouter (OpenAI-compatible) chat-completions adapter.
//!
//! Requests and responses use the `async-openai` wire types; the HTTP
//! exchange itself is a single `reqwest` POST so the status code is always
//! available and nothing is retried behind the caller's back.

use std::fmt;
use std::sync::Arc;

use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{CompletionConfig, CompletionService};
use crate::config::CredentialProvider;
use crate::core::{Message, Role};
use crate::error::CompletionError;

/// Chat-completions client that reads its API key on every call.
pub struct OpenRouterClient {
    config: CompletionConfig,
    credentials: Arc<dyn CredentialProvider>,
    http: reqwest::Client,
}

impl fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("config", &self.config)
            .field("credentials", &"<redacted>")
            .field("http", &"<reqwest::Client>")
            .finish()
    }
}

impl OpenRouterClient {
    /// Creates a client.
    #[must_use]
    pub fn new(config: CompletionConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            config,
            credentials,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn build_request(
        &self,
        messages: &[Message],
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature)
            .build()
    }

    /// One POST, one response body. Any non-success status is final.
    async fn send(
        &self,
        api_key: &str,
        request: &CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse, CompletionError> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%status, "chat completion rejected");
            return Err(classify_failure(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| CompletionError::Service(format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl CompletionService for OpenRouterClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let api_key = self
            .credentials
            .api_key()
            .ok_or(CompletionError::MissingCredential)?;

        let request = self
            .build_request(messages)
            .map_err(|e| CompletionError::Service(e.to_string()))?;
        tracing::debug!(
            model = %self.config.model,
            api_base = %self.config.api_base,
            messages = messages.len(),
            "sending chat completion"
        );

        let response = tokio::time::timeout(self.config.timeout, self.send(&api_key, &request))
            .await
            .map_err(|_| CompletionError::Timeout {
                seconds: self.config.timeout.as_secs(),
            })??;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref());
        usable_text(content)
    }
}

fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    Ok(match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content.clone())
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()?
            .into(),
    })
}

/// Trims the response text; blank or missing text is an error.
fn usable_text(content: Option<&str>) -> Result<String, CompletionError> {
    match content.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(CompletionError::EmptyResponse { stage: None }),
    }
}

/// `{"error": {...}}` envelope. OpenRouter sends `code` as a number,
/// OpenAI as a string.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<serde_json::Value>,
}

impl ErrorBody {
    fn code(&self) -> Option<String> {
        match self.code.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn is_auth_failure(kind: Option<&str>, code: Option<&str>) -> bool {
    let auth = |v: Option<&str>| {
        matches!(
            v,
            Some("invalid_api_key" | "authentication_error" | "401")
        )
    };
    auth(kind) || auth(code)
}

fn classify_failure(status: StatusCode, body: &str) -> CompletionError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| format!("HTTP {status}: {}", body.trim()));

    let auth = status == StatusCode::UNAUTHORIZED
        || parsed.as_ref().is_some_and(|e| {
            is_auth_failure(e.error.kind.as_deref(), e.error.code().as_deref())
        });

    if auth {
        CompletionError::Auth(message)
    } else {
        CompletionError::Service(message)
    }
}
