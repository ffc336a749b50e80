//! CLI layer for aireadme.
//!
//! Provides the command-line interface using clap, with commands for
//! generating a README and managing the API key and prompt templates.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, ConfigCommands, PromptCommands};
