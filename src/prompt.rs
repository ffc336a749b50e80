//! Prompt templates for the three pipeline stages.
//!
//! Each stage has a system prompt and a user template. The user template
//! may reference the stage input with the `{{input}}` placeholder; no
//! other placeholder is recognized. Templates load from a prompt
//! directory when present and fall back to compiled-in defaults.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::Message;
use crate::error::{PromptError, Result};
use crate::pipeline::Stage;

/// System prompt for stage 1: summarize one chunk.
pub const SUMMARIZE_SYSTEM_PROMPT: &str = "You are a senior software engineer.
Summarize this code chunk.

Extract:
- Purpose
- Core modules
- Important logic
- Routes (if present)
- Technologies used

Be concise.
Do not hallucinate.";

/// System prompt for stage 2: merge the partial summaries.
pub const MERGE_SYSTEM_PROMPT: &str = "You are a software architect.

Merge these partial project summaries into a single structured technical summary.
Remove repetition.
Be clear and concise.";

/// System prompt for stage 3: write the final README.
pub const SYNTHESIZE_SYSTEM_PROMPT: &str = r"You are a senior software engineer and technical documentation expert.

Generate a professional, production-ready README.md in clean Markdown for the project described by the summary you are given.

The README must be structured, concise and suitable for GitHub. Avoid fluff and generic phrasing; tailor every section to the actual project details provided.

Follow this exact structure:

1. Project Title
   - Clear and professional name
   - One-line tagline

2. Overview
   - 2-4 paragraphs: what the project does, the problem it solves, who it is for, why it is valuable

3. Key Features
   - Bullet points with action-driven descriptions
   - Focus on functionality, not marketing language

4. Tech Stack
   - Categorized bullets: Frontend, Backend, Database, AI / ML (if applicable), DevOps / Tools

5. Architecture
   - Short explanation of the system design and how it works
   - Mention APIs, data flow, authentication, AI pipelines where relevant

6. Installation & Setup
   - Step-by-step: clone, install dependencies, environment variables, run commands

7. Usage
   - How to use the application, with example workflows

8. Project Structure
   - Brief explanation of folders and the important files that actually exist

9. API Endpoints (only for backend projects)
   - Table format:
     | Method | Endpoint | Description |

10. Configuration & Future Improvements
    - Configuration options and realistic roadmap items

11. Contributing
    - Simple contribution steps

12. License
    - Placeholder if not specified

Formatting rules:
- Output must be valid Markdown with a proper heading hierarchy (#, ##, ###).
- Do NOT include emojis.
- Do NOT include explanations outside the README.
- Do NOT mention that you are an AI.
- Keep the tone professional and engineering-focused; concise but complete.

If project information is incomplete, make logical assumptions but do not fabricate unrealistic features.

Generate only the final README.md content.";

/// Default user template: the stage input, verbatim.
pub const DEFAULT_USER_TEMPLATE: &str = "{{input}}";

/// Name of the only recognized placeholder.
const INPUT_PLACEHOLDER: &str = "input";

/// Default prompt directory under the user's home.
const DEFAULT_PROMPT_DIR: &str = ".config/aireadme/prompts";

/// Environment variable overriding the prompt directory.
pub const PROMPT_DIR_ENV: &str = "AIREADME_PROMPT_DIR";

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// System and user template for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// System prompt text (used verbatim).
    pub system: String,
    /// User message template.
    pub user: String,
}

impl PromptTemplate {
    /// Creates a template.
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Checks that the user template only uses recognized placeholders
    /// and does reference `{{input}}`.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] naming `name` on the first violation.
    pub fn validate(&self, name: &str) -> std::result::Result<(), PromptError> {
        let mut has_input = false;
        for caps in PLACEHOLDER.captures_iter(&self.user) {
            let placeholder = &caps[1];
            if placeholder != INPUT_PLACEHOLDER {
                return Err(PromptError::UnknownPlaceholder {
                    template: format!("{name}.user"),
                    placeholder: placeholder.to_string(),
                });
            }
            has_input = true;
        }

        if !has_input {
            return Err(PromptError::MissingInputPlaceholder {
                template: format!("{name}.user"),
            });
        }
        Ok(())
    }

    /// Builds the two-message conversation for `input`.
    #[must_use]
    pub fn render(&self, input: &str) -> Vec<Message> {
        let user = PLACEHOLDER.replace_all(&self.user, |_: &regex::Captures<'_>| input.to_string());
        vec![
            Message::system(self.system.clone()),
            Message::user(user.into_owned()),
        ]
    }
}

/// Templates for all three stages.
///
/// Use [`PromptSet::load`] to resolve the prompt directory from the CLI
/// flag, the environment, or the default path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Stage 1 template.
    pub summarize: PromptTemplate,
    /// Stage 2 template.
    pub merge: PromptTemplate,
    /// Stage 3 template.
    pub synthesize: PromptTemplate,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl PromptSet {
    /// Loads templates, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument (from `--prompt-dir`)
    /// 2. `AIREADME_PROMPT_DIR` environment variable
    /// 3. `~/.config/aireadme/prompts/`
    ///
    /// Each stage reads `<stage>.md` (system) and `<stage>.user.md`
    /// (user); a missing file uses its default.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] if a loaded template is invalid.
    pub fn load(prompt_dir: Option<&Path>) -> Result<Self> {
        let resolved_dir = prompt_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var(PROMPT_DIR_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_dir);

        let load_file = |filename: String, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(&filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .unwrap_or_else(|| default.to_string())
        };

        let load_stage = |stage: Stage, system: &str| {
            PromptTemplate::new(
                load_file(format!("{stage}.md"), system),
                load_file(format!("{stage}.user.md"), DEFAULT_USER_TEMPLATE),
            )
        };

        let set = Self {
            summarize: load_stage(Stage::Summarize, SUMMARIZE_SYSTEM_PROMPT),
            merge: load_stage(Stage::Merge, MERGE_SYSTEM_PROMPT),
            synthesize: load_stage(Stage::Synthesize, SYNTHESIZE_SYSTEM_PROMPT),
        };
        set.validate()?;

        tracing::debug!(dir = ?resolved_dir, "prompt templates loaded");
        Ok(set)
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            summarize: PromptTemplate::new(SUMMARIZE_SYSTEM_PROMPT, DEFAULT_USER_TEMPLATE),
            merge: PromptTemplate::new(MERGE_SYSTEM_PROMPT, DEFAULT_USER_TEMPLATE),
            synthesize: PromptTemplate::new(SYNTHESIZE_SYSTEM_PROMPT, DEFAULT_USER_TEMPLATE),
        }
    }

    /// Returns the template for `stage`.
    #[must_use]
    pub const fn template(&self, stage: Stage) -> &PromptTemplate {
        match stage {
            Stage::Summarize => &self.summarize,
            Stage::Merge => &self.merge,
            Stage::Synthesize => &self.synthesize,
        }
    }

    /// Validates every stage template.
    ///
    /// # Errors
    ///
    /// Returns the first [`PromptError`] found.
    pub fn validate(&self) -> Result<()> {
        for stage in Stage::ALL {
            self.template(stage).validate(stage.as_str())?;
        }
        Ok(())
    }

    /// Writes the compiled-in default templates to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let defaults = Self::defaults();
        let mut written = Vec::new();
        for stage in Stage::ALL {
            let template = defaults.template(stage);
            let files = [
                (format!("{stage}.md"), &template.system),
                (format!("{stage}.user.md"), &template.user),
            ];
            for (filename, content) in files {
                let path = dir.join(filename);
                if !path.exists() {
                    std::fs::write(&path, content)?;
                    written.push(path);
                }
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}
