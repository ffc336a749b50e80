//! End-to-end README generation.
//!
//! Reads the project, packs it into chunks, runs the summarization
//! pipeline and writes the result. The document is written only after
//! every stage has succeeded.

use std::path::PathBuf;

use serde::Serialize;

use crate::chunking::{DEFAULT_CHUNK_SIZE, PackingChunker};
use crate::completion::CompletionService;
use crate::config::CredentialProvider;
use crate::error::{CompletionError, PipelineError, Result};
use crate::io::{DEFAULT_OUTPUT_FILE, WalkOptions, read_project_files, write_document};
use crate::pipeline::{Orchestrator, Progress};
use crate::prompt::PromptSet;

/// Inputs for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Project root to document.
    pub project_dir: PathBuf,
    /// Output path; defaults to `<project_dir>/README.md`.
    pub output: Option<PathBuf>,
    /// Chunk size limit in characters.
    pub max_chunk_size: usize,
    /// File filtering rules.
    pub walk: WalkOptions,
}

impl GenerateOptions {
    /// Options with defaults for `project_dir`.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            output: None,
            max_chunk_size: DEFAULT_CHUNK_SIZE,
            walk: WalkOptions::default(),
        }
    }

    /// Resolved output path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.project_dir.join(DEFAULT_OUTPUT_FILE))
    }

    /// Chunker configured with [`GenerateOptions::max_chunk_size`].
    #[must_use]
    pub const fn chunker(&self) -> PackingChunker {
        PackingChunker::with_size(self.max_chunk_size)
    }
}

/// Chunk layout computed without calling the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkPlan {
    /// Number of files read.
    pub files: usize,
    /// Size limit used.
    pub max_chunk_size: usize,
    /// Length of each chunk in characters.
    pub chunk_sizes: Vec<usize>,
}

impl ChunkPlan {
    /// Number of chunks, i.e. stage-1 calls.
    #[must_use]
    pub fn chunks(&self) -> usize {
        self.chunk_sizes.len()
    }

    /// Total completion calls a full run would make.
    #[must_use]
    pub fn completion_calls(&self) -> usize {
        if self.chunk_sizes.is_empty() {
            0
        } else {
            self.chunk_sizes.len() + 2
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    /// Number of files read.
    pub files: usize,
    /// Number of chunks summarized.
    pub chunks: usize,
    /// Where the document was written.
    pub output: PathBuf,
    /// Document length in bytes.
    pub document_len: usize,
}

/// Reads and chunks the project without any network access.
///
/// # Errors
///
/// Returns an error if the project cannot be read or the chunk size is invalid.
pub fn plan(options: &GenerateOptions) -> Result<ChunkPlan> {
    let files = read_project_files(&options.project_dir, &options.walk)?;
    let chunker = options.chunker();
    Ok(ChunkPlan {
        files: files.len(),
        max_chunk_size: chunker.max_size(),
        chunk_sizes: chunker.plan(&files)?,
    })
}

/// Generates the README and writes it to [`GenerateOptions::output_path`].
///
/// The credential is checked before the project is read. On any failure
/// nothing is written.
///
/// # Errors
///
/// - [`CompletionError::MissingCredential`] if no key is configured.
/// - [`PipelineError::EmptyInput`] if no chunks were produced.
/// - Read, chunking, completion and write errors.
pub async fn generate_readme<F>(
    options: &GenerateOptions,
    service: &dyn CompletionService,
    credentials: &dyn CredentialProvider,
    prompts: &PromptSet,
    mut on_progress: F,
) -> Result<GenerateReport>
where
    F: FnMut(Progress),
{
    if credentials.api_key().is_none() {
        return Err(CompletionError::MissingCredential.into());
    }

    on_progress(Progress::ReadingFiles);
    let files = read_project_files(&options.project_dir, &options.walk)?;

    on_progress(Progress::Chunking { files: files.len() });
    let chunker = options.chunker();
    let chunks = chunker.chunk(&files)?;
    if chunks.is_empty() {
        return Err(PipelineError::EmptyInput.into());
    }
    let file_count = files.len();
    tracing::info!(
        strategy = chunker.name(),
        max_size = chunker.max_size(),
        files = file_count,
        chunks = chunks.len(),
        "project chunked"
    );
    drop(files);

    let document = Orchestrator::new(service, credentials, prompts)
        .run_with_progress(&chunks, &mut on_progress)
        .await?;

    let output = options.output_path();
    write_document(&output, &document)?;

    Ok(GenerateReport {
        files: file_count,
        chunks: chunks.len(),
        output,
        document_len: document.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_default() {
        let options = GenerateOptions::new("/p");
        assert_eq!(options.output_path(), PathBuf::from("/p/README.md"));

        let options = GenerateOptions {
            output: Some(PathBuf::from("/out/DOC.md")),
            ..GenerateOptions::new("/p")
        };
        assert_eq!(options.output_path(), PathBuf::from("/out/DOC.md"));
    }

    #[test]
    fn test_plan_uses_configured_chunk_size() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.js"), "x".repeat(40)).unwrap();

        let options = GenerateOptions {
            max_chunk_size: 20,
            ..GenerateOptions::new(dir.path())
        };
        assert_eq!(options.chunker().max_size(), 20);

        // "FILE: /a.js\n" + 40 chars + "\n\n" = 54 chars.
        let plan = plan(&options).unwrap();
        assert_eq!(plan.files, 1);
        assert_eq!(plan.max_chunk_size, 20);
        assert_eq!(plan.chunk_sizes, vec![20, 20, 14]);
        assert_eq!(plan.completion_calls(), 5);
    }

    #[test]
    fn test_plan_call_count() {
        let plan = ChunkPlan {
            files: 3,
            max_chunk_size: 10,
            chunk_sizes: vec![10, 4],
        };
        assert_eq!(plan.chunks(), 2);
        assert_eq!(plan.completion_calls(), 4);

        let empty = ChunkPlan {
            files: 0,
            max_chunk_size: 10,
            chunk_sizes: vec![],
        };
        assert_eq!(empty.completion_calls(), 0);
    }
}
