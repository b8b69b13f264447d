//! zusage CLI - Z.ai quota monitor
//!
//! A command-line front-end for the same quota client and refresh loop the
//! tray widget uses.

mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use zusage_core::{DisplayPreference, WidgetConfig, ZaiClient};

#[derive(Parser)]
#[command(name = "zusage")]
#[command(author, version, about = "Z.ai quota and usage monitor", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override the API base URL (defaults to ZAI_API_BASE or https://api.z.ai/api)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every token quota with its reset countdown
    Quota,

    /// Show the single quota the mini overlay would track
    Mini {
        /// Quota to track: 5h, weekly or monthly (defaults to ZAI_MINI_QUOTA)
        #[arg(long)]
        quota: Option<DisplayPreference>,
    },

    /// Show model usage for a recent time window
    Usage {
        /// Number of hours back from now
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },

    /// Keep refreshing on an interval until interrupted
    Watch {
        /// Refresh period in minutes (defaults to ZAI_REFRESH_MINUTES or 5)
        #[arg(long)]
        interval_minutes: Option<u32>,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WidgetConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.api_base = base_url.clone();
    }
    config.debug |= cli.debug;

    let default_filter = if config.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    log::debug!("[cli] Loaded config: {:?}", config);

    let ctx = commands::Context {
        client: Arc::new(ZaiClient::from_config(&config)),
        config,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Quota => commands::quota::show_quota(&ctx).await,
        Commands::Mini { quota } => commands::quota::show_mini(&ctx, quota).await,
        Commands::Usage { hours } => commands::usage::show_usage(&ctx, hours).await,
        Commands::Watch { interval_minutes } => {
            commands::watch::watch(&ctx, interval_minutes).await
        }
        Commands::Config => commands::config::show_config(&ctx),
    }
}
