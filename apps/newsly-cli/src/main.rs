#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod app;
mod commands;
mod config;
mod logging;
#[cfg(test)]
mod test_support;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::app::App;
use crate::commands::Commands;
use crate::config::{AppConfig, CliOverrides};

/// Newsly - personalized news in the terminal
#[derive(Parser)]
#[command(name = "newsly")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// API base URL (overrides config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for local data (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (NEWSLY__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        verbose: cli.verbose,
        api_url: cli.api_url,
        data_dir: cli.data_dir,
    });

    logging::init(&config.logging)?;

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let app = App::new(config)?;
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Feed(commands::FeedArgs::default()));

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    command.run(&app, &mut input, &mut out).await
}
