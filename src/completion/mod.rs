//! Completion service abstraction.
//!
//! The pipeline only needs "conversation in, text out". [`CompletionService`]
//! is that seam; [`OpenRouterClient`] implements it against an
//! OpenAI-compatible chat-completions endpoint and [`FnCompletion`] adapts a
//! plain async closure, which is how tests plug in fakes.

pub mod openrouter;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::Message;
use crate::error::CompletionError;

pub use openrouter::OpenRouterClient;

/// Default chat-completions base URL.
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Turns an ordered conversation into text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends `messages` and returns the assistant text.
    ///
    /// # Errors
    ///
    /// Returns a [`CompletionError`] on transport, authentication or
    /// service failure, on timeout, or when no text came back.
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;
}

/// Adapts an async closure into a [`CompletionService`].
///
/// # Examples
///
/// ```
/// use aireadme::completion::{CompletionService, FnCompletion};
/// use aireadme::core::Message;
/// use aireadme::error::CompletionError;
///
/// let echo = FnCompletion(|messages: Vec<Message>| async move {
///     Ok::<_, CompletionError>(messages.last().map(|m| m.content.clone()).unwrap_or_default())
/// });
/// let _service: &dyn CompletionService = &echo;
/// ```
pub struct FnCompletion<F>(pub F);

#[async_trait]
impl<F, Fut> CompletionService for FnCompletion<F>
where
    F: Fn(Vec<Message>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, CompletionError>> + Send,
{
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        (self.0)(messages.to_vec()).await
    }
}

/// Settings for the chat-completions adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Base URL; `/chat/completions` is appended.
    pub api_base: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Deadline for a single call.
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CompletionConfig {
    /// Sets the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL, dropping trailing slashes.
    #[must_use]
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        let mut base = api_base.into();
        while base.ends_with('/') {
            base.pop();
        }
        self.api_base = base;
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
