use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use josephus::config::Config;
use josephus::engine::{Params, Summary};
use josephus::playback::{ConsoleRenderer, Format};
use josephus::session::{AnimationSession, RunOutcome};
use josephus::tui;

mod cli;

use cli::{Cli, Commands, ParamArgs};

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("josephus")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("josephus.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let fallback = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(fallback))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Merge command-line values over the configured defaults.
fn resolve_params(args: &ParamArgs, config: &Config) -> Result<Params> {
    let defaults = config.defaults.params();
    let params = Params::new(
        args.participants.unwrap_or(defaults.participants()),
        args.step.unwrap_or(defaults.step()),
    )?;
    Ok(params)
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        eprintln!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => run_tui(config).await,
        Some(Commands::Play {
            params,
            interval_ms,
            json,
        }) => handle_play_command(resolve_params(params, config)?, *interval_ms, *json, config).await,
        Some(Commands::Order { params, json }) => handle_order_command(resolve_params(params, config)?, *json),
    }
}

async fn run_tui(config: &Config) -> Result<()> {
    info!("Launching TUI mode");
    let terminal = tui::init_terminal().context("Failed to initialize terminal")?;
    let mut runner = tui::TuiRunner::new(terminal, config);
    let result = runner.run().await;
    // Always restore, even when the loop failed
    tui::restore_terminal().context("Failed to restore terminal")?;
    result
}

async fn handle_play_command(params: Params, interval_ms: Option<u64>, json: bool, config: &Config) -> Result<()> {
    info!("Playing {} (interval: {:?})", params, interval_ms);

    let mut session_config = config.animation.session_config();
    if let Some(ms) = interval_ms {
        session_config.tick_interval = Duration::from_millis(ms);
    }

    let format = if json { Format::Json } else { Format::Text };
    let mut session = AnimationSession::new(ConsoleRenderer::stdout(format), session_config);
    session.start(params.participants(), params.step())?;

    let outcome = tokio::select! {
        outcome = session.wait() => outcome?,
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            Some(RunOutcome::Cancelled)
        }
    };

    match outcome {
        Some(RunOutcome::Failed(reason)) => Err(eyre::eyre!("Playback failed: {}", reason)),
        _ => Ok(()),
    }
}

fn handle_order_command(params: Params, json: bool) -> Result<()> {
    info!("Computing elimination order for {}", params);
    let summary = Summary::compute(params);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} soldiers, every {}",
        "Josephus:".cyan().bold(),
        summary.participants,
        summary.step
    );
    println!("  {} {}", "passes:".green(), summary.passes);
    println!(
        "  {} {} ({} survived a count, {} eliminated)",
        "events:".green(),
        summary.total_events(),
        summary.alive_events,
        summary.dead_events
    );
    let order: Vec<String> = summary.elimination_order.iter().map(ToString::to_string).collect();
    println!("  {} {}", "order:".green(), order.join(" "));
    if let Some(last) = summary.last_eliminated() {
        println!("  {} {}", "last out:".yellow().bold(), last);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the configured level is known
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?;

    // Run the main application logic
    runtime
        .block_on(run_application(&cli, &config))
        .context("Application failed")?;

    Ok(())
}
