//! captionbridge: batch subtitle uploads to a video-hosting service.
//!
//! Set CAPTIONBRIDGE_API_KEY (and optionally TRANSLOADIT_AUTH_KEY with
//! TRANSLOADIT_TEMPLATE_ID to convert .ass/.ssa files before upload).

use anyhow::Context;
use captionbridge_api_client::{ApiClient, ConversionClient};
use captionbridge_cli::{collect_files, init_tracing, preview_line, render_event, status_label};
use captionbridge_core::{Batch, Config};
use captionbridge_pipeline::{
    FormatConverter, LanguageCatalog, SystemClock, TokioSleeper, UploadPipeline,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser)]
#[command(name = "captionbridge", about = "Upload subtitle files to their matching videos")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List destination folders
    Folders,
    /// List caption languages
    Languages {
        /// Ignore the cached catalog
        #[arg(long)]
        refresh: bool,
    },
    /// Upload subtitle files into a folder
    Upload {
        /// Destination folder id
        #[arg(long)]
        folder: String,
        /// Language for every file, as "Name (code)" or a bare code
        #[arg(long)]
        language: Option<String>,
        /// Subtitle files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn open_catalog(config: &Config, client: Arc<ApiClient>) -> anyhow::Result<LanguageCatalog> {
    LanguageCatalog::open(client, &config.cache_dir, Arc::new(SystemClock))
        .await
        .with_context(|| format!("Failed to open cache at {}", config.cache_dir.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env().context("Set CAPTIONBRIDGE_API_KEY")?;
    let client = Arc::new(
        ApiClient::new(&config.api_url, &config.api_key, config.http_timeout)
            .context("Failed to create API client")?,
    );

    match cli.command {
        Commands::Folders => {
            let folders = client.list_folders().await.context("Failed to list folders")?;
            if cli.json {
                print_json(&folders)?;
            } else if folders.is_empty() {
                println!("No folders");
            } else {
                for folder in &folders {
                    println!("{}\t{}", folder.id, folder.folder_name);
                }
            }
        }
        Commands::Languages { refresh } => {
            let mut catalog = open_catalog(&config, client).await?;
            let entries = if refresh {
                catalog.refresh().await?
            } else {
                catalog.load().await?
            };
            if cli.json {
                print_json(&entries)?;
            } else {
                for entry in entries {
                    println!("{}\t{}", entry.lang_id, entry.display_name());
                }
            }
        }
        Commands::Upload {
            folder,
            language,
            paths,
        } => {
            let mut catalog = open_catalog(&config, client.clone()).await?;
            catalog.load().await?;

            let mut batch = Batch::new();
            let files = collect_files(&paths).await?;
            let outcome = batch.add_files(files, catalog.entries())?;
            for name in &outcome.rejected {
                eprintln!("Skipping {}: unsupported format", name);
            }
            if outcome.duplicates > 0 {
                eprintln!("Skipping {} duplicate file(s)", outcome.duplicates);
            }

            if let Some(text) = language {
                let entry = catalog
                    .find_by_display(&text)
                    .or_else(|| catalog.find_by_code(&text))
                    .cloned()
                    .with_context(|| format!("Unknown language '{}'", text))?;
                let ids: Vec<_> = batch.iter().map(|f| f.id.clone()).collect();
                for id in &ids {
                    batch.set_language(id, entry.clone());
                }
            }

            if !cli.json {
                for item in batch.iter() {
                    println!("{}", preview_line(item));
                }
            }

            let mut pipeline = UploadPipeline::new(
                config.api_key.clone(),
                client.clone(),
                client,
            );
            if let Some(conversion) = &config.conversion {
                let service = ConversionClient::new(conversion, config.http_timeout)
                    .context("Failed to create conversion client")?;
                pipeline = pipeline.with_converter(FormatConverter::from_config(
                    Arc::new(service),
                    Arc::new(TokioSleeper),
                    conversion,
                ));
            }

            let mut events = pipeline.subscribe();
            let quiet = cli.json;
            let printer = tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(event) => {
                            if let Some(line) = render_event(&event).filter(|_| !quiet) {
                                println!("{}", line);
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Event printer fell behind");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            let report = pipeline.run(&mut batch, &folder).await;
            drop(pipeline);
            if let Err(e) = printer.await {
                tracing::warn!(error = %e, "Event printer stopped");
            }
            let report = report?;

            if cli.json {
                print_json(&report)?;
            } else {
                println!();
                for item in batch.iter() {
                    println!("{}\t{}", status_label(item.status), item.name());
                }
                for failure in &report.failures {
                    println!("{}: {} ({})", failure.file_name, failure.message, failure.error_code);
                }
                println!("{}", report.summary());
            }

            if !report.is_complete_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
