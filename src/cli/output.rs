//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::error::Error;
use crate::generate::{ChunkPlan, GenerateReport};
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a dry-run chunk plan.
#[must_use]
pub fn format_chunk_plan(plan: &ChunkPlan, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "{} files -> {} chunks (max {} chars, {} completion calls)",
                plan.files,
                plan.chunks(),
                plan.max_chunk_size,
                plan.completion_calls()
            );
            for (i, size) in plan.chunk_sizes.iter().enumerate() {
                let _ = writeln!(output, "  [{i}] {size} chars");
            }
            output
        }
        OutputFormat::Json => format_json(plan),
    }
}

/// Formats the result of a successful generation.
#[must_use]
pub fn format_generate_result(report: &GenerateReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "README generated: {} ({} files, {} chunks)\n",
            report.output.display(),
            report.files,
            report.chunks
        ),
        OutputFormat::Json => format_json(report),
    }
}

/// Credential status reported by `config doctor`.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    /// Credential file location.
    pub config_path: PathBuf,
    /// Whether the file exists.
    pub config_exists: bool,
    /// Whether a key resolves from the environment or the file.
    pub key_configured: bool,
    /// Where the key came from (`env`, `file`), if any.
    pub key_source: Option<&'static str>,
    /// First characters of the key.
    pub key_preview: Option<String>,
}

/// Formats a `config doctor` report.
#[must_use]
pub fn format_doctor(report: &DoctorReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str("aireadme config\n");
            output.push_str("===============\n\n");
            let _ = writeln!(output, "  Config file:  {}", report.config_path.display());
            let _ = writeln!(
                output,
                "  File exists:  {}",
                if report.config_exists { "yes" } else { "no" }
            );
            match (report.key_source, report.key_preview.as_deref()) {
                (Some(source), Some(preview)) => {
                    let _ = writeln!(output, "  API key:      {preview} (from {source})");
                }
                (Some(source), None) => {
                    let _ = writeln!(output, "  API key:      set (from {source})");
                }
                _ => {
                    output.push_str("  API key:      not configured\n");
                    output.push_str("\nRun: aireadme config set-key <your_key>\n");
                }
            }
            output
        }
        OutputFormat::Json => format_json(report),
    }
}

/// Formats the result of `config set-key` / `config delete`.
#[must_use]
pub fn format_config_change(action: &str, path: &Path, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{action}: {}\n", path.display()),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ConfigChange<'a> {
                action: &'a str,
                path: &'a Path,
            }
            format_json(&ConfigChange { action, path })
        }
    }
}

/// Formats the result of `prompts init`.
#[must_use]
pub fn format_prompts_init(dir: &Path, written: &[PathBuf], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            if written.is_empty() {
                let _ = writeln!(
                    output,
                    "All templates already present in {}",
                    dir.display()
                );
            } else {
                let _ = writeln!(output, "Wrote {} templates:", written.len());
                for path in written {
                    let _ = writeln!(output, "  {}", path.display());
                }
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct PromptsInit<'a> {
                dir: &'a Path,
                written: &'a [PathBuf],
            }
            format_json(&PromptsInit { dir, written })
        }
    }
}

/// Formats an error for display.
///
/// Text output is the error message; JSON output is an object with the
/// message and its [`Error::kind`].
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput<'a> {
                error: String,
                kind: &'a str,
            }
            format_json(&ErrorOutput {
                error: error.to_string(),
                kind: error.kind(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
