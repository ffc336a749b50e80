//! # aireadme
//!
//! Generates a project README with an LLM.
//!
//! The project's source files are packed into size-bounded text chunks,
//! each chunk is summarized, the summaries are merged, and one final call
//! turns the merged summary into the README.
//!
//! ## Features
//!
//! - **Chunking**: whole-file packing with fixed-size slicing of oversized files
//! - **Map-reduce pipeline**: strictly sequential summarize, merge, synthesize
//! - **Pluggable completion service**: OpenRouter adapter or any async closure
//! - **Editable prompts**: per-stage templates loaded from a prompt directory

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chunking;
pub mod cli;
pub mod completion;
pub mod config;
pub mod core;
pub mod error;
pub mod generate;
pub mod io;
pub mod pipeline;
pub mod prompt;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use crate::core::{Message, Role, SourceFile};

// Re-export chunking types
pub use chunking::{DEFAULT_CHUNK_SIZE, PackingChunker, chunk};

// Re-export pipeline types
pub use pipeline::{Orchestrator, Progress, Stage};

// Re-export collaborator seams
pub use completion::{CompletionConfig, CompletionService, FnCompletion, OpenRouterClient};
pub use config::{ConfigStore, CredentialProvider, StaticCredential};
pub use prompt::{PromptSet, PromptTemplate};

// Re-export end-to-end entry points
pub use generate::{ChunkPlan, GenerateOptions, GenerateReport, generate_readme, plan};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
