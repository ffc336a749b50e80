//! CLI command implementations.
//!
//! Each command returns its stdout text; `main` decides where it goes.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::output::{
    DoctorReport, OutputFormat, format_chunk_plan, format_config_change, format_doctor,
    format_generate_result, format_prompts_init,
};
use crate::cli::parser::{Cli, Commands, ConfigCommands, PromptCommands};
use crate::completion::{CompletionConfig, OpenRouterClient};
use crate::config::{ConfigStore, CredentialProvider};
use crate::error::{CommandError, CompletionError, ConfigError, IoError, PipelineError, Result};
use crate::generate::{GenerateOptions, generate_readme, plan};
use crate::pipeline::Progress;
use crate::prompt::PromptSet;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Generate {
            dir,
            output,
            max_chunk_size,
            model,
            api_base,
            temperature,
            timeout,
            prompt_dir,
            dry_run,
        } => {
            let options = GenerateOptions {
                output: output.clone(),
                max_chunk_size: *max_chunk_size,
                ..GenerateOptions::new(dir)
            };
            if *dry_run {
                return cmd_dry_run(&options, format);
            }
            let completion = CompletionConfig::default()
                .model(model)
                .api_base(api_base)
                .temperature(*temperature)
                .timeout(Duration::from_secs(*timeout));
            cmd_generate(
                config_path,
                &options,
                completion,
                prompt_dir.as_deref(),
                format,
            )
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::SetKey { key } => cmd_set_key(config_path, key, format),
            ConfigCommands::Delete => cmd_delete_key(config_path, format),
            ConfigCommands::Doctor => cmd_doctor(config_path, format),
        },
        Commands::Prompts(PromptCommands::Init { dir }) => cmd_prompts_init(dir.as_deref(), format),
    }
}

// ==================== Command Implementations ====================

fn cmd_dry_run(options: &GenerateOptions, format: OutputFormat) -> Result<String> {
    let plan = plan(options)?;
    if plan.chunk_sizes.is_empty() {
        return Err(PipelineError::EmptyInput.into());
    }
    Ok(format_chunk_plan(&plan, format))
}

fn cmd_generate(
    config_path: Option<&Path>,
    options: &GenerateOptions,
    completion: CompletionConfig,
    prompt_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let store = Arc::new(ConfigStore::resolve(config_path)?);
    if store.api_key().is_none() {
        return Err(CompletionError::MissingCredential.into());
    }
    let prompts = PromptSet::load(prompt_dir)?;
    let client = OpenRouterClient::new(completion, Arc::clone(&store) as Arc<dyn CredentialProvider>);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CommandError::ExecutionFailed(format!("failed to start runtime: {e}")))?;

    // Progress shares stderr with logs; JSON callers only get the result.
    let show_progress = format == OutputFormat::Text;
    let report = runtime.block_on(generate_readme(
        options,
        &client,
        store.as_ref(),
        &prompts,
        |progress: Progress| {
            if show_progress {
                let _ = writeln!(io::stderr(), "{progress}");
            }
        },
    ))?;

    Ok(format_generate_result(&report, format))
}

fn cmd_set_key(config_path: Option<&Path>, key: &str, format: OutputFormat) -> Result<String> {
    let store = ConfigStore::resolve(config_path)?;
    store.set_api_key(key)?;
    Ok(format_config_change("API key saved", store.path(), format))
}

fn cmd_delete_key(config_path: Option<&Path>, format: OutputFormat) -> Result<String> {
    let store = ConfigStore::resolve(config_path)?;
    let action = if store.delete()? {
        "API key deleted"
    } else {
        "No stored API key"
    };
    Ok(format_config_change(action, store.path(), format))
}

fn cmd_doctor(config_path: Option<&Path>, format: OutputFormat) -> Result<String> {
    let store = ConfigStore::resolve(config_path)?;
    let report = DoctorReport {
        config_path: store.path().to_path_buf(),
        config_exists: store.path().exists(),
        key_configured: store.has_api_key(),
        key_source: store.key_source(),
        key_preview: store.key_preview(),
    };
    Ok(format_doctor(&report, format))
}

fn cmd_prompts_init(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => PromptSet::default_dir().ok_or(ConfigError::NoHomeDirectory)?,
    };
    let written = PromptSet::write_defaults(&dir).map_err(|e| IoError::WriteFailed {
        path: dir.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;
    Ok(format_prompts_init(&dir, &written, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn setup() -> (TempDir, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("aireadme.json");
        (temp_dir, config_path)
    }

    #[test]
    fn test_cmd_set_key_and_doctor() {
        let (_temp_dir, config_path) = setup();

        let result = cmd_set_key(Some(&config_path), "sk-or-v1-0123456789", OutputFormat::Text);
        assert!(result.unwrap().contains("API key saved"));
        assert!(config_path.exists());

        let doctor = cmd_doctor(Some(&config_path), OutputFormat::Json).unwrap();
        assert!(doctor.contains("\"config_exists\": true"));
        assert!(doctor.contains("\"key_configured\": true"));
    }

    #[test]
    fn test_cmd_set_key_rejects_blank() {
        let (_temp_dir, config_path) = setup();
        let result = cmd_set_key(Some(&config_path), "  ", OutputFormat::Text);
        assert!(matches!(result, Err(Error::Config(ConfigError::InvalidApiKey))));
    }

    #[test]
    fn test_cmd_delete_key() {
        let (_temp_dir, config_path) = setup();

        let result = cmd_delete_key(Some(&config_path), OutputFormat::Text).unwrap();
        assert!(result.contains("No stored API key"));

        cmd_set_key(Some(&config_path), "sk-test", OutputFormat::Text).unwrap();
        let result = cmd_delete_key(Some(&config_path), OutputFormat::Text).unwrap();
        assert!(result.contains("API key deleted"));
        assert!(!config_path.exists());
    }

    #[test]
    fn test_cmd_dry_run() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.js"), "x").unwrap();

        let options = GenerateOptions::new(temp_dir.path());
        let result = cmd_dry_run(&options, OutputFormat::Text).unwrap();
        assert!(result.contains("1 files -> 1 chunks"));
        assert!(result.contains("[0] 15 chars"));
    }

    #[test]
    fn test_cmd_dry_run_empty_project() {
        let temp_dir = TempDir::new().unwrap();
        let options = GenerateOptions::new(temp_dir.path());
        let result = cmd_dry_run(&options, OutputFormat::Text);
        assert!(matches!(result, Err(Error::Pipeline(PipelineError::EmptyInput))));
    }

    #[test]
    fn test_cmd_prompts_init() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("prompts");

        let result = cmd_prompts_init(Some(&dir), OutputFormat::Text).unwrap();
        assert!(result.contains("Wrote 6 templates"));
        assert!(dir.join("summarize.md").exists());
        assert!(dir.join("synthesize.user.md").exists());

        let result = cmd_prompts_init(Some(&dir), OutputFormat::Text).unwrap();
        assert!(result.contains("already present"));
    }
}
