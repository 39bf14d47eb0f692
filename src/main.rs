use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use leetwatch::stats;
use leetwatch::tui;
use leetwatch::{
    AccountRegistry, BatchOutcome, Config, HttpSubmissionSource, SessionState, SyncEngine,
};

#[derive(Parser)]
#[command(name = "leetwatch")]
#[command(about = "Terminal tracker for competitive-programming submission activity")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Fetch submissions once and print a per-account report
    Sync {
        /// Usernames to sync (defaults to the configured seed accounts)
        usernames: Vec<String>,
    },

    /// List the configured seed accounts
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only initialize logging for CLI commands, not TUI
    // TUI output shares the terminal and stdout logging breaks raw mode
    let is_tui = cli.command.is_none();
    if !is_tui {
        init_logging(cli.verbose)?;
        info!("Starting leetwatch v{}", env!("CARGO_PKG_VERSION"));
    }

    // Init must run before config loading, which creates a default file
    // as a side effect when none exists
    if let Some(Commands::Init { force }) = &cli.command {
        return cmd_init(*force);
    }

    // Load configuration
    let config = load_config(cli.config)?;

    // Execute command (default to TUI if no command specified)
    match cli.command {
        None => tui::run_tui(config).await,
        Some(Commands::Init { .. }) => unreachable!("handled above"),
        Some(Commands::Sync { usernames }) => cmd_sync(usernames, &config).await,
        Some(Commands::List) => cmd_list(&config),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<std::path::PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => Config::load_or_default(),
    }
}

/// Write a default configuration file
fn cmd_init(force: bool) -> Result<()> {
    let config_path = Config::default_config_path()?;

    if config_path.exists() && !force {
        println!("⚠️  Configuration already exists: {:?}", config_path);
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default();
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    config.save(&config_path)?;

    println!("✅ Configuration written to {:?}", config_path);
    println!("   Seed accounts: {}", config.accounts.seeds.join(", "));

    Ok(())
}

/// One-shot sync and plain-text report
async fn cmd_sync(usernames: Vec<String>, config: &Config) -> Result<()> {
    let source = HttpSubmissionSource::new(config)?;
    let engine = SyncEngine::new(Arc::new(source));

    let seeds = if usernames.is_empty() {
        config.accounts.seeds.clone()
    } else {
        usernames
    };
    let mut state = SessionState::new(AccountRegistry::new(&seeds));

    info!("Syncing {} account(s)", state.registry.len());
    let outcome = engine.sync_all(&mut state).await;

    // Report whatever was committed, including partial results after an abort
    for username in state.registry.usernames() {
        let submissions = state.submissions(username);
        println!(
            "\n{} — {} submissions today",
            username,
            stats::today_count(submissions)
        );

        if submissions.is_empty() {
            println!("   (not fetched)");
            continue;
        }

        for sub in submissions {
            println!(
                "   {:40} {:10} {}  {}",
                sub.title,
                sub.language,
                stats::display_time(&sub.time),
                sub.problem_url()
            );
        }
    }

    match outcome {
        BatchOutcome::Completed { fetched, pruned } => {
            println!("\n✅ Sync complete: {} account(s) fetched", fetched.len());
            for username in pruned {
                println!("   ⏭  \"{}\" has zero submissions and was dropped", username);
            }
        }
        BatchOutcome::Aborted { message, .. } => {
            println!("\n❌ {}", message);
        }
    }

    Ok(())
}

/// List the configured seed accounts
fn cmd_list(config: &Config) -> Result<()> {
    println!("Seed accounts ({}):", config.accounts.seeds.len());
    for username in &config.accounts.seeds {
        println!("  {}", username);
    }
    Ok(())
}
