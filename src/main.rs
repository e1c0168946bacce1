use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use touchline::config::{self, Config};
use touchline::data_provider::{ApiFootballClient, FootballDataProvider};
use touchline::live::{poll_once, PollEvent, Relevance};
use touchline::store::{JsonFileStore, ProfileStore};
use touchline::tui;

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "touchline")]
#[command(
    about = "Live football scores for the terminal",
    long_about = "Live football scores for the terminal\n\nIf no command is specified, the program starts in interactive mode."
)]
struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    /// Use simulated data instead of the football API
    #[cfg(feature = "development")]
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Display current configuration
    Config,
    /// Poll once and print live matches you follow
    Live {
        /// Print every live match, not only followed ones
        #[arg(short, long)]
        all: bool,
    },
    /// Track a match to get alerts for its goals
    Track {
        /// Fixture ID
        fixture_id: i64,
    },
    /// Stop tracking a match
    Untrack {
        /// Fixture ID
        fixture_id: i64,
    },
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Handle the config command - display current configuration
fn handle_config_command() {
    let cfg = config::read();

    let (path_str, exists) = match config::get_config_path() {
        Some(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        None => ("Unable to determine config path".to_string(), false),
    };

    println!("Configuration File: {} (Exists: {})", path_str, if exists { "yes" } else { "no" });
    println!();
    println!("Current Configuration:");
    println!("=====================");
    println!("log_level: {}", cfg.log_level);
    println!("log_file: {}", cfg.log_file);
    println!("user_id: {}", cfg.user_id);
    println!("refresh_interval: {} seconds", cfg.refresh_interval);
    println!("lookahead_minutes: {}", cfg.lookahead_minutes);
    println!("alert_duration_secs: {}", cfg.alert_duration_secs);
    println!("allowed_leagues: {:?}", cfg.allowed_leagues);
    println!();
    println!("[api]");
    println!("base_url: {}", cfg.api.base_url);
    println!(
        "api_key: {}",
        if cfg.api.resolved_api_key().is_some() { "set" } else { "not set" }
    );
    println!("timeout_secs: {}", cfg.api.timeout_secs);
    println!();
    println!("[scroll]");
    println!("rate_px_per_sec: {}", cfg.scroll.rate_px_per_sec);
    println!("debounce_ms: {}", cfg.scroll.debounce_ms);
    println!("release_timeout_ms: {}", cfg.scroll.release_timeout_ms);
    println!();
    println!("[theme]");
    println!("focus_fg: {:?}", cfg.theme.focus_fg);
    println!("live_fg: {:?}", cfg.theme.live_fg);
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

fn create_provider(cli: &Cli, config: &Config) -> anyhow::Result<Arc<dyn FootballDataProvider>> {
    #[cfg(feature = "development")]
    if cli.mock {
        let today = chrono::Utc::now().date_naive();
        return Ok(Arc::new(touchline::dev::MockProvider::new(today)));
    }
    #[cfg(not(feature = "development"))]
    let _ = cli;

    let client = ApiFootballClient::new(&config.api).context("Failed to create football API client")?;
    Ok(Arc::new(client))
}

fn create_store() -> anyhow::Result<JsonFileStore> {
    JsonFileStore::from_xdg().context("Failed to open profile store")
}

/// Poll once and print the live matches the profile follows
async fn live_command(provider: &dyn FootballDataProvider, config: &Config, all: bool) -> anyhow::Result<()> {
    let matches = match poll_once(provider, &[], chrono::Duration::zero(), true).await {
        PollEvent::Fetched(matches) => matches,
        PollEvent::Failed(e) => anyhow::bail!("Failed to fetch live matches: {}", e),
        PollEvent::Skipped => Vec::new(),
    };
    let profile = create_store()?.load(&config.user_id)?;
    let relevance = Relevance {
        profile: &profile,
        allowed_leagues: &config.allowed_leagues,
        open_match: None,
    };

    let shown: Vec<_> = matches
        .iter()
        .filter(|m| all || relevance.is_relevant(m, false))
        .collect();
    if shown.is_empty() {
        println!("No live matches{}", if all { "" } else { " you follow (use --all to see every match)" });
        return Ok(());
    }
    for m in shown {
        println!(
            "{:>10}  {:<24} {:>2} - {:<2} {:<24} {:<14} {}{}",
            m.id(),
            m.teams.home.name,
            m.goals.pair().0,
            m.goals.pair().1,
            m.teams.away.name,
            m.fixture.status.display_text(),
            m.league.name,
            if profile.is_tracked(m.id()) { "  ●" } else { "" },
        );
    }
    Ok(())
}

fn set_tracked(config: &Config, fixture_id: i64, tracked: bool) -> anyhow::Result<()> {
    let store = create_store()?;
    let mut profile = store.load(&config.user_id)?;
    let changed = if tracked {
        profile.track(fixture_id)
    } else {
        profile.untrack(fixture_id)
    };
    if !changed {
        println!(
            "Match {} is {} tracked",
            fixture_id,
            if tracked { "already" } else { "not" }
        );
        return Ok(());
    }
    store.save(&config.user_id, &profile)?;
    println!("{} match {}", if tracked { "Tracking" } else { "Stopped tracking" }, fixture_id);
    Ok(())
}

/// Run TUI mode against the configured provider and profile store
async fn run_tui_mode(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let provider = create_provider(cli, &config)?;
    let store: Arc<dyn ProfileStore> = Arc::new(create_store()?);
    tui::run(config, provider, store).await?;
    Ok(())
}

/// Execute a CLI command by routing it to the appropriate command handler
async fn execute_command(cli: &Cli, config: &Config, command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Config => unreachable!("Config command should be handled before execute_command"),
        Commands::Live { all } => {
            let provider = create_provider(cli, config)?;
            live_command(provider.as_ref(), config, *all).await
        }
        Commands::Track { fixture_id } => set_tracked(config, *fixture_id, true),
        Commands::Untrack { fixture_id } => set_tracked(config, *fixture_id, false),
    }
}

#[tokio::main]
async fn main() {
    let config = config::read();
    let cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    let Some(command) = cli.command.as_ref() else {
        if let Err(e) = run_tui_mode(&cli, config).await {
            eprintln!("Error running TUI: {:#}", e);
            tracing::error!("TUI failed: {:#}", e);
            std::process::exit(1);
        }
        return;
    };

    // Handle Config command separately (doesn't need a provider)
    if let Commands::Config = command {
        handle_config_command();
        return;
    }

    if let Err(e) = execute_command(&cli, &config, command).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
