//! Error types for aireadme operations.
//!
//! Every fallible operation returns [`Result`]. The top-level [`Error`]
//! wraps one enum per area (chunking, completion, pipeline, configuration,
//! prompts, I/O and CLI commands) so callers can match on the failure
//! class while still getting a readable message from `Display`.

use thiserror::Error;

use crate::pipeline::Stage;

/// Result type alias for aireadme operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for aireadme operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Chunking-related errors (invalid sizes).
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// Completion service errors (transport, auth, empty output).
    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Orchestration errors that happen before any completion call.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Credential store errors.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Prompt template errors.
    #[error("prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

impl Error {
    /// Short machine-readable name of the error class, used by JSON output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Chunking(_) => "chunking",
            Self::Completion(e) => e.kind(),
            Self::Pipeline(PipelineError::EmptyInput) => "empty_input",
            Self::Config(_) => "config",
            Self::Prompt(_) => "prompt",
            Self::Io(_) => "io",
            Self::Command(_) => "command",
        }
    }
}

/// Chunking-specific errors.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// Invalid chunk configuration.
    #[error("invalid chunk configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },
}

/// Failures of a single completion call.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// No API key is configured.
    #[error("OpenRouter API key not configured. Run: aireadme config set-key <your_key>")]
    MissingCredential,

    /// Transport failure (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// The service rejected the credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Non-success response or an undecodable body.
    #[error("service error: {0}")]
    Service(String),

    /// The call did not resolve within the adapter's deadline.
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout in seconds.
        seconds: u64,
    },

    /// The service answered without usable text.
    #[error("empty response{}", stage_suffix(.stage))]
    EmptyResponse {
        /// Pipeline stage that received the empty response, once known.
        stage: Option<Stage>,
    },
}

fn stage_suffix(stage: &Option<Stage>) -> String {
    stage.map_or_else(String::new, |s| format!(" during {s}"))
}

impl CompletionError {
    /// Attributes an untagged empty response to `stage`.
    #[must_use]
    pub fn at_stage(self, stage: Stage) -> Self {
        match self {
            Self::EmptyResponse { stage: None } => Self::EmptyResponse { stage: Some(stage) },
            other => other,
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Service(_) => "service",
            Self::Timeout { .. } => "timeout",
            Self::EmptyResponse { .. } => "empty_response",
        }
    }
}

/// Orchestration errors raised before any completion call is issued.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// There is nothing to summarize.
    #[error("no files found to summarize")]
    EmptyInput,
}

/// Credential store errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Rejected API key (empty or whitespace).
    #[error("invalid API key")]
    InvalidApiKey,

    /// The home directory could not be resolved.
    #[error("cannot determine home directory")]
    NoHomeDirectory,

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Prompt template errors.
#[derive(Error, Debug)]
pub enum PromptError {
    /// A template uses a placeholder that is not recognized.
    #[error("template '{template}' uses unknown placeholder '{{{{{placeholder}}}}}'")]
    UnknownPlaceholder {
        /// Template name.
        template: String,
        /// Offending placeholder name.
        placeholder: String,
    },

    /// A user template would drop the stage input.
    #[error("template '{template}' must contain '{{{{input}}}}'")]
    MissingInputPlaceholder {
        /// Template name.
        template: String,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File or directory not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Failed to read a file or directory.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
