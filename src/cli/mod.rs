//! CLI module for the metadata cache
//!
//! Subcommands talk to a live schema API through the cache:
//! - `tables`: list the configured project's tables
//! - `get`: look a table up by id or title, optionally several times

pub mod get;
pub mod tables;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::{logging, metrics};

/// Table metadata cache in front of a remote schema API
#[derive(Parser)]
#[command(name = "meta-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the tables of the configured project
    Tables,

    /// Fetch table metadata by id or title
    Get(get::GetArgs),
}

/// Loads `.env` and configuration, then installs logging
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::try_init_logging(&config.logging)?;
    metrics::describe_metrics();

    Ok(config)
}
