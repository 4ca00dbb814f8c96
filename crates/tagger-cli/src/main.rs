use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tagger_infrastructure::ConfigService;

mod commands;

#[derive(Parser)]
#[command(name = "tagger")]
#[command(about = "Abstract Tagger - fetch items and inspect review progress", long_about = None)]
struct Cli {
    /// Configuration file (defaults to $TAGGER_CONFIG, ./config.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download Zotero items that have an abstract into the item source file
    Fetch {
        /// Write here instead of paths.items_input
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show review progress and how often each tag was assigned
    Status {
        /// Read this item file instead of paths.items_output
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Write a config template with placeholder credentials
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };

    match cli.command {
        Commands::Fetch { output } => commands::fetch::run(&config_service, output).await?,
        Commands::Status { file } => commands::status::run(&config_service, file)?,
        Commands::InitConfig => commands::init::run(&config_service)?,
    }

    Ok(())
}
