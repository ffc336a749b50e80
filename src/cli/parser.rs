//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::chunking::DEFAULT_CHUNK_SIZE;
use crate::completion::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS};

/// aireadme: generate a README for a project with an LLM.
///
/// Reads the project's source files, summarizes them chunk by chunk,
/// merges the summaries and writes a README.
#[derive(Parser, Debug)]
#[command(name = "aireadme")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the credential file.
    ///
    /// Defaults to `~/.aireadme.json`.
    #[arg(short, long, env = "AIREADME_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a README for a project directory.
    Generate {
        /// Project directory to document.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Output file (default: `<dir>/README.md`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chunk size limit in characters.
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        max_chunk_size: usize,

        /// Model identifier.
        #[arg(long, env = "AIREADME_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// Chat-completions base URL.
        #[arg(long, env = "AIREADME_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,

        /// Sampling temperature.
        #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f32,

        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Directory with prompt template overrides.
        #[arg(long, env = "AIREADME_PROMPT_DIR")]
        prompt_dir: Option<PathBuf>,

        /// Print the chunk plan without calling the model.
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage the stored API key.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Manage prompt templates.
    #[command(subcommand)]
    Prompts(PromptCommands),
}

/// Credential subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Store the OpenRouter API key.
    SetKey {
        /// The API key.
        key: String,
    },

    /// Delete the stored API key.
    Delete,

    /// Show whether a key is configured.
    Doctor,
}

/// Prompt template subcommands.
#[derive(Subcommand, Debug)]
pub enum PromptCommands {
    /// Write the default templates for editing.
    ///
    /// Existing files are left untouched.
    Init {
        /// Target directory (default: `~/.config/aireadme/prompts`).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}
