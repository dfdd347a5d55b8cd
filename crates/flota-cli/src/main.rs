//! flota - command-line client for the fleet console's data layer.
//!
//! Every command performs one data access call and prints the resulting
//! envelope as JSON. The process exits non-zero when the call failed.

mod cli;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use flota_core::models::{Collaborator, Model, Task, Vehicle};
use flota_core::utils::truncate_string;
use flota_core::{Config, DataAccess, Envelope, ResourceKind};
use serde::Serialize;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{build_filters, Cli, Command};

/// Log file name prefix inside `--log-dir`
const LOG_FILE_PREFIX: &str = "flota.log";

/// Column width for titles in brief listings
const BRIEF_TITLE_WIDTH: usize = 48;

/// Initialize the tracing subscriber for logging.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref());

    let config = Config::load().context("Failed to load configuration")?;
    let access = DataAccess::from_config(&config).context("Failed to build HTTP client")?;
    info!(url = %config.supabase_url, "flota starting");

    let code = run(&access, cli.command).await?;

    let cache = access.cache_stats();
    info!(entries = cache.entries, oldest = %cache.oldest_display(), "Read cache at exit");
    Ok(code)
}

async fn run(access: &DataAccess, command: Command) -> Result<ExitCode> {
    let envelope = match command {
        Command::List { resource, search, limit, filters, brief } => {
            let filters = build_filters(search.as_deref(), limit, &filters);
            let envelope = access.list(resource, &filters).await;
            if brief && envelope.is_success() {
                print_brief(resource, &envelope)?;
                return Ok(ExitCode::SUCCESS);
            }
            envelope
        }
        Command::Get { resource, id } => access.get(resource, id).await,
        Command::Create { resource, record } => access.create(resource, &record).await,
        Command::Update { resource, id, changes } => access.update(resource, id, &changes).await,
        Command::Delete { resource, id } => access.delete(resource, id).await,
        Command::Stats => {
            let stats = access.stats().await;
            print_json(&stats)?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    print_json(&envelope)?;
    Ok(if envelope.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", text);
    Ok(())
}

/// One line per record, using the typed entities where the resource has one.
fn print_brief(resource: ResourceKind, envelope: &Envelope) -> Result<()> {
    let lines: Vec<String> = match resource {
        ResourceKind::Vehicles => envelope
            .decode::<Vehicle>()?
            .iter()
            .map(|v| {
                format!(
                    "{:>6}  {:<width$}  {:<12}  {:<16}  {}",
                    v.id,
                    truncate_string(&v.display_name(), BRIEF_TITLE_WIDTH),
                    v.inventory_state_name(),
                    v.weekly_price_display(),
                    v.acquisition_date_display(),
                    width = BRIEF_TITLE_WIDTH
                )
            })
            .collect(),
        ResourceKind::Tasks => envelope
            .decode::<Task>()?
            .iter()
            .map(|t| {
                format!(
                    "{:>6}  {:<width$}  {:<11}  {:<24}  {:<20}  {}",
                    t.id,
                    truncate_string(&t.title, BRIEF_TITLE_WIDTH),
                    t.status.as_str(),
                    t.vehicle.as_ref().map(|v| v.label()).unwrap_or_default(),
                    t.assignee_name(),
                    t.created_display(),
                    width = BRIEF_TITLE_WIDTH
                )
            })
            .collect(),
        ResourceKind::Collaborators => envelope
            .decode::<Collaborator>()?
            .iter()
            .map(|c| {
                let marker = if c.active { "*" } else { " " };
                format!("{:>6} {} {:<32}  {}", c.id, marker, truncate_string(&c.name, 32), c.phone_display())
            })
            .collect(),
        ResourceKind::Models => envelope
            .decode::<Model>()?
            .iter()
            .map(|m| format!("{:>6}  {}", m.id, truncate_string(&m.full_name(), BRIEF_TITLE_WIDTH)))
            .collect(),
        _ => envelope
            .data()
            .iter()
            .map(|record| {
                let id = record.get("id").map(|v| v.to_string()).unwrap_or_default();
                let name = record.get("nombre").and_then(|v| v.as_str()).unwrap_or_default();
                format!("{:>6}  {}", id, truncate_string(name, BRIEF_TITLE_WIDTH))
            })
            .collect(),
    };

    for line in lines {
        println!("{}", line);
    }
    if let Some(count) = envelope.count() {
        println!("({} of {})", envelope.data().len(), count);
    }
    Ok(())
}
