//! Map-reduce summarization.
//!
//! Turns an ordered chunk sequence into one document with three kinds of
//! completion call:
//!
//! 1. **Summarize**: one call per chunk, strictly in order.
//! 2. **Merge**: one call over all summaries joined by a blank line.
//! 3. **Synthesize**: one call over the merged summary.
//!
//! Calls are awaited one at a time, so at most one request is outstanding
//! and summaries keep chunk order. The first failure aborts the run and
//! nothing later is issued.

use std::fmt;

use serde::Serialize;

use crate::completion::CompletionService;
use crate::config::CredentialProvider;
use crate::error::{CompletionError, PipelineError, Result};
use crate::prompt::PromptSet;

/// Separator between stage-1 summaries in the merge input.
pub const SUMMARY_SEPARATOR: &str = "\n\n";

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Per-chunk summary (map).
    Summarize,
    /// Summary merge (reduce).
    Merge,
    /// Final document synthesis.
    Synthesize,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Self; 3] = [Self::Summarize, Self::Merge, Self::Synthesize];

    /// Stable lowercase name, also used for prompt file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Merge => "merge",
            Self::Synthesize => "synthesize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress notifications for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Walking the project directory.
    ReadingFiles,
    /// Packing the files that were read.
    Chunking {
        /// Number of files read.
        files: usize,
    },
    /// About to summarize chunk `index` (1-based) of `total`.
    Summarizing {
        /// 1-based chunk position.
        index: usize,
        /// Number of chunks.
        total: usize,
    },
    /// About to merge the summaries.
    Merging,
    /// About to synthesize the final document.
    Synthesizing,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadingFiles => write!(f, "Reading files..."),
            Self::Chunking { files } => write!(f, "Chunking {files} files..."),
            Self::Summarizing { index, total } => write!(f, "Summarizing chunk {index}/{total}"),
            Self::Merging => write!(f, "Merging summaries..."),
            Self::Synthesizing => write!(f, "Generating README..."),
        }
    }
}

/// Drives the three stages against a completion service.
///
/// # Examples
///
/// ```no_run
/// use aireadme::completion::{CompletionConfig, OpenRouterClient};
/// use aireadme::config::ConfigStore;
/// use aireadme::pipeline::Orchestrator;
/// use aireadme::prompt::PromptSet;
/// use std::sync::Arc;
///
/// # async fn demo() -> aireadme::Result<()> {
/// let store = Arc::new(ConfigStore::resolve(None)?);
/// let client = OpenRouterClient::new(CompletionConfig::default(), store.clone());
/// let prompts = PromptSet::defaults();
/// let orchestrator = Orchestrator::new(&client, store.as_ref(), &prompts);
/// let readme = orchestrator.run(&["FILE: /a.js\nx\n\n".to_string()]).await?;
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<'a> {
    service: &'a dyn CompletionService,
    credentials: &'a dyn CredentialProvider,
    prompts: &'a PromptSet,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator over borrowed collaborators.
    #[must_use]
    pub fn new(
        service: &'a dyn CompletionService,
        credentials: &'a dyn CredentialProvider,
        prompts: &'a PromptSet,
    ) -> Self {
        Self {
            service,
            credentials,
            prompts,
        }
    }

    /// Runs all stages and returns the trimmed final document.
    ///
    /// # Errors
    ///
    /// - [`CompletionError::MissingCredential`] if no key is configured (no call issued).
    /// - [`PipelineError::EmptyInput`] if `chunks` is empty (no call issued).
    /// - Any [`CompletionError`] from the service, or
    ///   [`CompletionError::EmptyResponse`] for blank output.
    pub async fn run(&self, chunks: &[String]) -> Result<String> {
        self.run_with_progress(chunks, |_| {}).await
    }

    /// Like [`Orchestrator::run`], reporting each stage to `on_progress`
    /// right before its call is issued.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::run`].
    pub async fn run_with_progress<F>(&self, chunks: &[String], mut on_progress: F) -> Result<String>
    where
        F: FnMut(Progress),
    {
        if self.credentials.api_key().is_none() {
            return Err(CompletionError::MissingCredential.into());
        }
        if chunks.is_empty() {
            return Err(PipelineError::EmptyInput.into());
        }

        let total = chunks.len();
        let mut summaries = Vec::with_capacity(total);
        for (i, chunk) in chunks.iter().enumerate() {
            tracing::info!(chunk = i + 1, total, "summarizing chunk");
            on_progress(Progress::Summarizing {
                index: i + 1,
                total,
            });
            summaries.push(self.call(Stage::Summarize, chunk).await?);
        }

        tracing::info!(summaries = summaries.len(), "merging summaries");
        on_progress(Progress::Merging);
        let merged = self
            .call(Stage::Merge, &summaries.join(SUMMARY_SEPARATOR))
            .await?;
        drop(summaries);

        tracing::info!(merged_len = merged.len(), "synthesizing document");
        on_progress(Progress::Synthesizing);
        self.call(Stage::Synthesize, &merged).await
    }

    /// Issues one completion call and returns its trimmed, non-empty text.
    async fn call(&self, stage: Stage, input: &str) -> Result<String> {
        let messages = self.prompts.template(stage).render(input);
        tracing::debug!(%stage, input_len = input.len(), "completion request");

        let text = self
            .service
            .complete(&messages)
            .await
            .map_err(|e| e.at_stage(stage))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(CompletionError::EmptyResponse { stage: Some(stage) }.into());
        }
        Ok(text.to_string())
    }
}
