//! Integration tests for aireadme.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use aireadme::completion::FnCompletion;
use aireadme::config::StaticCredential;
use aireadme::core::{Message, SourceFile};
use aireadme::error::{CompletionError, Error, PipelineError};
use aireadme::generate::{GenerateOptions, generate_readme};
use aireadme::pipeline::{Orchestrator, Progress, Stage};
use aireadme::prompt::PromptSet;
use aireadme::chunk;
use tempfile::TempDir;

type Calls = Arc<Mutex<Vec<Vec<Message>>>>;
type Reply = std::future::Ready<Result<String, CompletionError>>;

/// Fake service: records each conversation and answers via `respond`,
/// which sees the 0-based call number and the user content.
fn fake<R>(respond: R) -> (Calls, FnCompletion<impl Fn(Vec<Message>) -> Reply>)
where
    R: Fn(usize, &str) -> Result<String, CompletionError> + Send + Sync,
{
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&calls);
    let service = FnCompletion(move |messages: Vec<Message>| {
        let mut log = log.lock().unwrap();
        let reply = respond(log.len(), &messages[1].content);
        log.push(messages);
        std::future::ready(reply)
    });
    (calls, service)
}

fn key() -> StaticCredential {
    StaticCredential::new(Some("sk-test".to_string()))
}

/// Creates a small project tree with a few ignored entries.
fn project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    std::fs::write(root.join("index.js"), "console.log('hi');").unwrap();
    std::fs::write(root.join("src/lib.rs"), "pub fn f() {}").unwrap();
    std::fs::write(root.join("node_modules/pkg/index.js"), "ignored").unwrap();
    std::fs::write(root.join("logo.png"), "not really a png").unwrap();
    dir
}

mod generate_tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_writes_trimmed_document() {
        let dir = project();
        let (calls, service) = fake(|n, _input| Ok(format!("\n  answer {n}  \n")));
        let mut events = Vec::new();

        let report = generate_readme(
            &GenerateOptions::new(dir.path()),
            &service,
            &key(),
            &PromptSet::defaults(),
            |p| events.push(p),
        )
        .await
        .expect("generate");

        assert_eq!(report.files, 2);
        assert_eq!(report.chunks, 1);
        assert_eq!(report.output, dir.path().join("README.md"));

        let readme = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert_eq!(readme, "answer 2");
        assert_eq!(report.document_len, readme.len());

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        let chunk = &calls[0][1].content;
        assert!(chunk.starts_with("FILE: /index.js\n"));
        assert!(chunk.contains("FILE: /src/lib.rs\npub fn f() {}\n\n"));
        assert!(!chunk.contains("node_modules"));
        assert!(!chunk.contains("logo.png"));
        assert_eq!(calls[1][1].content, "answer 0");
        assert_eq!(calls[2][1].content, "answer 1");

        assert_eq!(
            events,
            vec![
                Progress::ReadingFiles,
                Progress::Chunking { files: 2 },
                Progress::Summarizing { index: 1, total: 1 },
                Progress::Merging,
                Progress::Synthesizing,
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_writes_nothing_and_stops() {
        let dir = project();
        let (calls, service) = fake(|n, _input| {
            if n == 1 {
                Err(CompletionError::Service("HTTP 500".to_string()))
            } else {
                Ok("summary".to_string())
            }
        });

        let err = generate_readme(
            &GenerateOptions::new(dir.path()),
            &service,
            &key(),
            &PromptSet::defaults(),
            |_| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Completion(CompletionError::Service(_))));
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert!(!dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn test_missing_credential_reads_nothing() {
        let dir = project();
        let (calls, service) = fake(|_, _| Ok("x".to_string()));
        let mut events = Vec::new();

        let err = generate_readme(
            &GenerateOptions::new(dir.path()),
            &service,
            &StaticCredential::new(None),
            &PromptSet::defaults(),
            |p| events.push(p),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Completion(CompletionError::MissingCredential)
        ));
        assert!(events.is_empty());
        assert!(calls.lock().unwrap().is_empty());
        assert!(!dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn test_empty_project_is_empty_input() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "old readme").unwrap();
        let (calls, service) = fake(|_, _| Ok("x".to_string()));

        let err = generate_readme(
            &GenerateOptions::new(dir.path()),
            &service,
            &key(),
            &PromptSet::defaults(),
            |_| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Pipeline(PipelineError::EmptyInput)));
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "old readme"
        );
    }

    #[tokio::test]
    async fn test_custom_output_path() {
        let dir = project();
        let out = TempDir::new().unwrap();
        let target = out.path().join("docs/OVERVIEW.md");
        let (_calls, service) = fake(|_, _| Ok("# Project".to_string()));

        let options = GenerateOptions {
            output: Some(target.clone()),
            ..GenerateOptions::new(dir.path())
        };
        generate_readme(&options, &service, &key(), &PromptSet::defaults(), |_| {})
            .await
            .expect("generate");

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# Project");
        assert!(!dir.path().join("README.md").exists());
    }
}

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_summaries_keep_chunk_order() {
        let (calls, service) = fake(|_, input| Ok(input.replace("chunk", "sum")));
        let prompts = PromptSet::defaults();
        let credentials = key();
        let chunks: Vec<String> = (0..12).map(|i| format!("chunk-{i}")).collect();

        Orchestrator::new(&service, &credentials, &prompts)
            .run(&chunks)
            .await
            .expect("run");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), chunks.len() + 2);
        let expected: Vec<String> = (0..12).map(|i| format!("sum-{i}")).collect();
        assert_eq!(calls[12][1].content, expected.join("\n\n"));
    }

    #[tokio::test]
    async fn test_synthesize_failure_is_tagged() {
        let (calls, service) = fake(|n, _| {
            if n == 2 {
                Ok("   ".to_string())
            } else {
                Ok("text".to_string())
            }
        });
        let prompts = PromptSet::defaults();
        let credentials = key();

        let err = Orchestrator::new(&service, &credentials, &prompts)
            .run(&["only".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Completion(CompletionError::EmptyResponse {
                stage: Some(Stage::Synthesize)
            })
        ));
        assert!(err.to_string().contains("during synthesize"));
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_custom_user_template_wraps_input() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("merge.user.md"), "Summaries:\n{{input}}").unwrap();
        let prompts = PromptSet::load(Some(dir.path())).expect("prompts");

        let (calls, service) = fake(|_, _| Ok("s".to_string()));
        let credentials = key();
        Orchestrator::new(&service, &credentials, &prompts)
            .run(&["a".to_string(), "b".to_string()])
            .await
            .expect("run");

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0][1].content, "a");
        assert_eq!(calls[2][1].content, "Summaries:\ns\n\ns");
    }
}

mod chunking_tests {
    use super::*;

    #[test]
    fn test_single_small_file() {
        let chunks = chunk(&[SourceFile::new("/a.js", "x")], 3000).unwrap();
        assert_eq!(chunks, vec!["FILE: /a.js\nx\n\n".to_string()]);
    }

    #[test]
    fn test_oversized_file_is_sliced() {
        // "FILE: /big\n" + content + "\n\n" = 7000 chars
        let content = "y".repeat(7000 - 11 - 2);
        let chunks = chunk(&[SourceFile::new("/big", content)], 3000).unwrap();
        let lengths: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(lengths, vec![3000, 3000, 1000]);
    }

    #[test]
    fn test_oversized_file_leaves_pending_chunk_open() {
        let files = vec![
            SourceFile::new("/a", "1"),
            SourceFile::new("/big", "z".repeat(40)),
            SourceFile::new("/b", "2"),
        ];
        let chunks = chunk(&files, 30).unwrap();
        // /a and /b share the accumulator across the oversized record.
        assert_eq!(chunks.last().unwrap(), "FILE: /a\n1\n\nFILE: /b\n2\n\n");
        assert!(chunks[0].starts_with("FILE: /big\n"));
    }
}

mod property_tests {
    use aireadme::chunk;
    use aireadme::core::SourceFile;
    use proptest::prelude::*;

    fn files() -> impl Strategy<Value = Vec<SourceFile>> {
        prop::collection::vec(
            ("/[a-z]{1,8}", "[a-zé \n]{0,60}").prop_map(|(p, c)| SourceFile::new(p, c)),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn chunking_preserves_total_length(files in files(), max_size in 1usize..120) {
            let chunks = chunk(&files, max_size).unwrap();
            let chunked: usize = chunks.iter().map(|c| c.chars().count()).sum();
            let records: usize = files.iter().map(|f| f.serialize().chars().count()).sum();
            prop_assert_eq!(chunked, records);
        }

        #[test]
        fn chunks_fit_when_no_record_is_oversized(files in files(), extra in 0usize..100) {
            // Longest possible record: "FILE: " + 9 + "\n" + 60 + "\n\n" = 78 chars.
            let max_size = 78 + extra;
            let chunks = chunk(&files, max_size).unwrap();
            for c in &chunks {
                prop_assert!(c.chars().count() <= max_size);
                prop_assert!(!c.is_empty());
            }
            let joined: String = files.iter().map(SourceFile::serialize).collect();
            prop_assert_eq!(chunks.concat(), joined);
        }

        #[test]
        fn oversized_record_slices_reconstruct(content in "[a-zß\n]{0,400}", max_size in 1usize..50) {
            let file = SourceFile::new("/big", content);
            let chunks = chunk(std::slice::from_ref(&file), max_size).unwrap();
            prop_assert_eq!(chunks.concat(), file.serialize());
            for c in &chunks {
                prop_assert!(c.chars().count() <= max_size);
            }
        }
    }
}

/// CLI command integration tests.
mod cli_tests {
    use aireadme::cli::commands::execute;
    use aireadme::cli::parser::{Cli, Commands, ConfigCommands, PromptCommands};
    use std::path::Path;
    use tempfile::TempDir;

    /// Helper to create a CLI struct with a custom config path.
    fn make_cli(config: &Path, format: &str, command: Commands) -> Cli {
        Cli {
            config: Some(config.to_path_buf()),
            verbose: false,
            format: format.to_string(),
            command,
        }
    }

    fn dry_run(dir: &Path, max_chunk_size: usize) -> Commands {
        Commands::Generate {
            dir: dir.to_path_buf(),
            output: None,
            max_chunk_size,
            model: aireadme::completion::DEFAULT_MODEL.to_string(),
            api_base: aireadme::completion::DEFAULT_API_BASE.to_string(),
            temperature: 0.2,
            timeout: 60,
            prompt_dir: None,
            dry_run: true,
        }
    }

    #[test]
    fn test_config_round_trip() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = temp_dir.path().join("aireadme.json");

        let cli = make_cli(
            &config,
            "text",
            Commands::Config(ConfigCommands::SetKey {
                key: "sk-or-v1-abcdefghijkl".to_string(),
            }),
        );
        let output = execute(&cli).expect("set-key");
        assert!(output.contains("API key saved"));

        let cli = make_cli(&config, "text", Commands::Config(ConfigCommands::Doctor));
        let output = execute(&cli).expect("doctor");
        assert!(output.contains("File exists:  yes"));

        let cli = make_cli(&config, "json", Commands::Config(ConfigCommands::Delete));
        let output = execute(&cli).expect("delete");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["action"], "API key deleted");
        assert!(!config.exists());
    }

    #[test]
    fn test_dry_run_needs_no_credential() {
        let temp_dir = TempDir::new().expect("temp dir");
        std::fs::write(temp_dir.path().join("a.js"), "x".repeat(50)).unwrap();
        std::fs::write(temp_dir.path().join("b.js"), "y".repeat(50)).unwrap();
        let config = temp_dir.path().join("missing.json");

        let cli = make_cli(&config, "json", dry_run(temp_dir.path(), 80));
        let output = execute(&cli).expect("dry run");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["files"], 2);
        assert_eq!(value["chunk_sizes"], serde_json::json!([64, 64]));
        assert!(!temp_dir.path().join("README.md").exists());
    }

    #[test]
    fn test_dry_run_rejects_invalid_chunk_size() {
        let temp_dir = TempDir::new().expect("temp dir");
        std::fs::write(temp_dir.path().join("a.js"), "x").unwrap();
        let config = temp_dir.path().join("missing.json");

        let cli = make_cli(&config, "text", dry_run(temp_dir.path(), 0));
        let err = execute(&cli).unwrap_err();
        assert_eq!(err.kind(), "chunking");
    }

    #[test]
    fn test_prompts_init() {
        let temp_dir = TempDir::new().expect("temp dir");
        let dir = temp_dir.path().join("prompts");
        let config = temp_dir.path().join("unused.json");

        let cli = make_cli(
            &config,
            "json",
            Commands::Prompts(PromptCommands::Init {
                dir: Some(dir.clone()),
            }),
        );
        let output = execute(&cli).expect("prompts init");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["written"].as_array().map(Vec::len), Some(6));
        assert!(dir.join("merge.user.md").exists());
    }
}
