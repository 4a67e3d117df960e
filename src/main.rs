//! habitd - Adaptive Daily Task Engine
//!
//! CLI entry point for planning, daily task queries, and the maintenance
//! daemon.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use habitd::cli::{Cli, Command, OutputFormat};
use habitd::clock::SystemClock;
use habitd::config::Config;
use habitd::domain::JsonProfileStore;
use habitd::engine::TaskEngine;
use habitd::generator::create_generator;
use habitd::maintenance::MaintenanceScheduler;
use habitd::random::RandChooser;
use habitd::store::DailyTaskStore;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("habitd")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("habitd.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

/// Wire up the engine from config
fn build_engine(config: &Config) -> Result<TaskEngine> {
    let store = Arc::new(DailyTaskStore::new(&config.storage.data_dir));
    let profiles = Arc::new(JsonProfileStore::new(config.storage.users_file()));
    let generator = create_generator(&config.generator).context("Failed to create generator client")?;

    Ok(TaskEngine::new(
        store,
        profiles,
        generator,
        Arc::new(SystemClock),
        Arc::new(RandChooser),
        config.planning.max_weekly_tasks,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!(
        "habitd loaded config: provider={}, model={}, data-dir={}",
        config.generator.provider,
        config.generator.model,
        config.storage.data_dir.display()
    );

    match cli.command {
        Command::Plan { user } => cmd_plan(&config, &user).await,
        Command::Today { format } => cmd_today(&config, format).await,
        Command::Complete => cmd_complete(&config).await,
        Command::List { format } => cmd_list(&config, format).await,
        Command::Quote => cmd_quote(&config).await,
        Command::Daemon => cmd_daemon(&config).await,
    }
}

/// Run a weekly planning cycle
async fn cmd_plan(config: &Config, user: &str) -> Result<()> {
    let engine = build_engine(config)?;

    let summary = engine.generate_weekly_plan(user).await?;
    println!("Weekly plan generated for {}", user);
    println!("  Capacity: {} tasks", summary.weekly_capacity);
    println!("  Parsed:   {} tasks", summary.task_count);
    println!();
    println!("{}", summary.preview);
    Ok(())
}

/// Show (or create) today's task
async fn cmd_today(config: &Config, format: OutputFormat) -> Result<()> {
    let engine = build_engine(config)?;
    let today = engine.today_task().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&today)?);
        }
        OutputFormat::Text => match (&today.task, &today.status) {
            (Some(task), Some(status)) => {
                println!("Today ({}) [{}]", today.date, status);
                println!("{}", task);
            }
            _ => {
                println!("No tasks available for {}. Run `habitd plan <user>` first.", today.date);
            }
        },
    }

    Ok(())
}

/// Mark today's task complete
async fn cmd_complete(config: &Config) -> Result<()> {
    let engine = build_engine(config)?;

    let entry = engine.complete_today().await?;
    println!("Marked {} complete.", entry.date);
    Ok(())
}

/// List all daily entries
async fn cmd_list(config: &Config, format: OutputFormat) -> Result<()> {
    let engine = build_engine(config)?;
    let entries = engine.list_entries().await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "total": entries.len(),
                "entries": entries,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No daily entries yet.");
                return Ok(());
            }
            println!("{} entries:", entries.len());
            for entry in &entries {
                let first_line = entry.task.lines().next().unwrap_or("");
                println!("  {}  [{}]  {}", entry.date, entry.status, first_line);
            }
        }
    }

    Ok(())
}

/// Show a motivational quote.
///
/// The quote is process state: this command samples one for its own
/// invocation, while the daemon resamples its own copy at every sweep.
/// Reading the daemon's live quote would need an IPC boundary the CLI
/// does not have.
async fn cmd_quote(config: &Config) -> Result<()> {
    let engine = build_engine(config)?;
    println!("{}", engine.current_quote().await);
    Ok(())
}

/// Run the maintenance scheduler in the foreground
async fn cmd_daemon(config: &Config) -> Result<()> {
    info!("Daemon starting...");

    let engine = build_engine(config)?;

    // The scheduler shares the engine's store so the sweep and request
    // handling serialize through the same lock
    let scheduler = MaintenanceScheduler::new(
        config.maintenance.sweep_time()?,
        Arc::new(SystemClock),
        Arc::new(RandChooser),
        engine.store_handle(),
        engine.quote_handle(),
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));
    info!("Maintenance scheduler started");

    println!("habitd daemon running (sweep at {}). Press Ctrl+C to stop.", config.maintenance.sweep_time);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                info!("SIGINT received");
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }

    info!("Daemon shutting down...");
    let _ = shutdown_tx.send(()).await;
    let _ = scheduler_handle.await;

    Ok(())
}
