use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod tracker;

use catalog::{BlogCommand, DealsCommand, FlashcardsArgs, MarketsArgs, PulseArgs};
use config::{GlobalArgs, Settings};
use tracker::TrackerCommand;

#[derive(Parser)]
#[command(name = "rolodex")]
#[command(about = "Rolodex dashboards: application tracker, deals, blog, markets and interview prep", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track applications through the interview pipeline
    Tracker {
        #[command(subcommand)]
        action: TrackerCommand,
    },
    /// Browse the deals feed
    Deals {
        #[command(subcommand)]
        action: DealsCommand,
    },
    /// Read blog posts
    Blog {
        #[command(subcommand)]
        action: BlogCommand,
    },
    /// Show the market ticker
    Markets(MarketsArgs),
    /// Technical interview flashcards
    Flashcards(FlashcardsArgs),
    /// Interview-focused market insights
    Pulse(PulseArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.debug);

    match cli.command {
        Commands::Tracker { action } => {
            let settings = Settings::resolve(&cli.global)?;
            let today = Local::now().date_naive();
            tracker::handle_tracker_command(action, &settings, today)
        }
        Commands::Deals { action } => catalog::handle_deals_command(action),
        Commands::Blog { action } => catalog::handle_blog_command(action),
        Commands::Markets(args) => catalog::show_markets(&args),
        Commands::Flashcards(args) => catalog::show_flashcards(&args),
        Commands::Pulse(args) => catalog::show_pulse(&args),
    }
}

fn init_logging(debug: bool) {
    let level = if debug {
        "debug".to_string()
    } else if let Ok(level) = std::env::var("ROLODEX_LOG_LEVEL") {
        level
    } else {
        "warn".to_string()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("logging already initialized");
    }
}
