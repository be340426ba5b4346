//! Command-line driver for the Digital Twin Scanner.
//!
//! Prints classified scan statuses and fetched records; `export` writes the
//! enriched JSON document into a directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use twin_scanner_app::{AppState, AppStateBuilder, DirectoryExportSink, Session};
use twin_scanner_core::{BatchOutcome, ScannerConfig, StatusKind};
use twin_scanner_provider::AttributeProvider;

#[derive(Parser)]
#[command(name = "twin-scanner")]
#[command(about = "Scan, fetch and export domain attributes from the attribute service")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true, default_value = "twin-scanner.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered attributes
    List,
    /// Show provider metadata
    Describe {
        /// Attributes to describe (all when omitted)
        #[arg(short, long = "attribute")]
        attributes: Vec<String>,
    },
    /// Trigger scans and print their status
    Scan(Target),
    /// Print stored records
    Fetch(Target),
    /// Write the enriched export document
    Export {
        #[command(flatten)]
        target: Target,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,

        /// Directory the export is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Args)]
struct Target {
    /// Domain to work on
    #[arg(short, long)]
    domain: String,

    /// Attributes to include (all when omitted)
    #[arg(short, long = "attribute")]
    attributes: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config =
        ScannerConfig::load(Some(cli.config.as_path())).context("loading configuration")?;
    if let Commands::Export { pretty: true, .. } = cli.command {
        config.orchestrator.pretty_export = true;
    }
    let state = AppStateBuilder::new()
        .config(config)
        .build()
        .context("building application state")?;

    match cli.command {
        Commands::List => {
            for descriptor in state.registry().descriptors() {
                println!("{:<16} {}", descriptor.display_name, descriptor.provider_key);
            }
            Ok(())
        }
        Commands::Describe { attributes } => describe(&state, &attributes).await,
        Commands::Scan(target) => {
            let session = open(&state, &target)?;
            if let BatchOutcome::Published { results, .. } = session.scan().await {
                for (name, status) in results.iter() {
                    let tag = match status.kind() {
                        StatusKind::Info => "INFO ",
                        StatusKind::Error => "ERROR",
                    };
                    println!("[{tag}] {name}: {status}");
                }
            }
            session.close().await;
            Ok(())
        }
        Commands::Fetch(target) => {
            let session = open(&state, &target)?;
            if let BatchOutcome::Published { results, .. } = session.fetch().await {
                println!("{}", serde_json::to_string_pretty(&*results)?);
            }
            session.close().await;
            Ok(())
        }
        Commands::Export { target, out_dir, .. } => {
            let session = open(&state, &target)?;
            let sink = DirectoryExportSink::new(out_dir);
            let path = session.export(&sink).await?;
            println!("{}", path.display());
            session.close().await;
            Ok(())
        }
    }
}

/// Session for `target`: all attributes unless some are named.
fn open(state: &AppState, target: &Target) -> Result<Session> {
    let mut session = state.open_session();
    session.set_domain(target.domain.clone());
    if target.attributes.is_empty() {
        session.select_all(true);
    }
    for name in &target.attributes {
        session.set_attribute(name, true)?;
    }
    Ok(session)
}

async fn describe(state: &AppState, attributes: &[String]) -> Result<()> {
    let names: Vec<String> = if attributes.is_empty() {
        state.registry().display_names().map(str::to_string).collect()
    } else {
        attributes.to_vec()
    };

    for name in names {
        let Some(provider) = state.registry().lookup(&name) else {
            tracing::warn!("Unknown attribute '{name}', skipping");
            continue;
        };
        let metadata = provider.describe().await;
        println!("{name}: {}", serde_json::to_string(&metadata)?);
    }
    Ok(())
}
