//! `plexport` command line interface.
//!
//! Wires the exporter pipeline to its concrete collaborators: environment
//! configuration, the PrairieLearn REST client, the JSON state store, and
//! a local output file.

mod sink;
mod store;

use clap::{Parser, Subcommand};
use common::config::Config;
use common::format_validation_errors;
use common::logger::init_logger;
use exporter::cache::InstanceCache;
use exporter::error::ExportError;
use exporter::header::HeaderMode;
use exporter::pipeline::{FetchPipeline, FetchRequest, RemoteSettings, refresh_instances};
use exporter::processors::ProcessorRegistry;
use pl_api::PlApiClient;
use sink::FileSink;
use std::path::PathBuf;
use store::JsonStateStore;
use validator::Validate;

#[derive(Parser)]
#[command(
    name = "plexport",
    version,
    about = "Export PrairieLearn submissions for the student being graded in Canvas"
)]
struct Cli {
    /// Env file with the remote settings (PL_BASE_URL, PL_API_TOKEN, ...)
    #[arg(long, default_value = ".env")]
    env_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a roster CSV (gradebook export or legacy 4-column layout),
    /// replacing the stored roster
    ImportRoster {
        /// Path to the CSV file
        path: PathBuf,
    },
    /// List the stored roster
    Roster,
    /// Rebuild the instance cache for one assessment from the remote platform
    RefreshInstances {
        #[arg(long)]
        assessment_id: String,
    },
    /// List the export rules with processor summaries and any validation problems
    Rules,
    /// Fetch one student's submission per an export rule and write it to a file
    Fetch {
        /// Canvas user id of the student being graded
        #[arg(long)]
        student_id: String,
        /// Displayed name (possibly truncated); cross-checked against the roster
        #[arg(long)]
        name: Option<String>,
        /// Question id selecting the export rule
        #[arg(long)]
        question_id: String,
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
    /// Drop every cached instance mapping
    ClearCache,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::init(&cli.env_file);
    init_logger(&config.log_level, &config.log_file);

    if let Err(err) = run(cli.command, config).await {
        eprintln!("Failed: {err}");
        std::process::exit(1);
    }
}

fn remote_settings(config: &Config) -> RemoteSettings {
    RemoteSettings {
        base_url: config.pl_base_url.clone(),
        api_token: config.pl_api_token.clone(),
        course_instance_id: config.course_instance_id.clone(),
        header_mode: HeaderMode::from_config(&config.include_output_header),
    }
}

async fn run(command: Command, config: &Config) -> Result<(), ExportError> {
    let store = JsonStateStore::new(&config.state_dir);

    match command {
        Command::ImportRoster { path } => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ExportError::Import(format!("read {}: {e}", path.display())))?;
            let result = roster::parse_roster(&text);
            for error in &result.errors {
                log::warn!("{error}");
            }
            if result.entries.is_empty() {
                return Err(ExportError::Import(
                    result.errors.first().cloned().unwrap_or_default(),
                ));
            }
            store.save_roster(&result.entries)?;
            println!(
                "Imported {} students ({} rows rejected)",
                result.entries.len(),
                result.errors.len()
            );
            Ok(())
        }

        Command::Roster => {
            let entries = store.load_roster()?;
            if entries.is_empty() {
                println!("No roster imported");
                return Ok(());
            }
            for entry in &entries {
                println!(
                    "{}  canvas_id={} sis_user_id={} sis_login_id={}",
                    entry.name, entry.canvas_id, entry.sis_user_id, entry.sis_login_id
                );
            }
            Ok(())
        }

        Command::RefreshInstances { assessment_id } => {
            let settings = remote_settings(config);
            let api = PlApiClient::new(&settings.base_url, &settings.api_token);
            let mut cache =
                InstanceCache::new(settings.course_instance_id.clone(), store.clone());
            let size = refresh_instances(&api, &mut cache, &settings, &assessment_id).await?;
            println!("Loaded {size} instances (assessment_id={assessment_id})");
            Ok(())
        }

        Command::Rules => {
            let rules = store.load_rules()?;
            if rules.is_empty() {
                println!("No export rules configured");
                return Ok(());
            }
            let registry = ProcessorRegistry::with_builtins();
            for (i, rule) in rules.iter().enumerate() {
                let mut problems = Vec::new();
                if let Err(errors) = rule.validate() {
                    problems.push(format_validation_errors(&errors));
                }
                problems.extend(registry.validate_config(&rule.processor));

                print!(
                    "#{} question_id={} assessment_id={} strategy={} processor={}",
                    i + 1,
                    rule.question_id,
                    rule.assessment_id,
                    rule.strategy,
                    registry.summary(&rule.processor)
                );
                if problems.is_empty() {
                    println!();
                } else {
                    println!("  [{}]", problems.join("; "));
                }
            }
            Ok(())
        }

        Command::Fetch {
            student_id,
            name,
            question_id,
            out,
        } => {
            let entries = store.load_roster()?;
            let rules = store.load_rules()?;
            let qid = question_id.trim();
            let rule = rules
                .iter()
                .find(|r| r.question_id.trim() == qid)
                .ok_or_else(|| {
                    ExportError::Config(format!("no export rule for question_id={qid}"))
                })?;

            let settings = remote_settings(config);
            let api = PlApiClient::new(&settings.base_url, &settings.api_token);
            let cache = InstanceCache::new(settings.course_instance_id.clone(), store.clone());
            let mut pipeline = FetchPipeline::new(
                settings,
                Box::new(api),
                Some(Box::new(FileSink::new(&out))),
                cache,
            );

            let report = pipeline
                .fetch(&FetchRequest {
                    roster: &entries,
                    canvas_user_id: &student_id,
                    displayed_name: name.as_deref(),
                    rule,
                })
                .await?;
            println!(
                "Done: wrote {} ({} bytes, candidates={}) to {}",
                report.file_name,
                report.bytes_written,
                report.candidates,
                out.display()
            );
            Ok(())
        }

        Command::ClearCache => {
            let mut cache =
                InstanceCache::new(config.course_instance_id.clone(), store.clone());
            cache.clear_all()?;
            println!("Instance caches cleared");
            Ok(())
        }
    }
}
