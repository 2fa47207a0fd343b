//! CLI interface for price-tracker
//!
//! Provides subcommands for:
//! - `run`: Start tracking (default when no subcommand is given)
//! - `config`: Show the resolved configuration

mod run;
mod show;

pub use run::{build_scheduler, RunArgs};
pub use show::ConfigArgs;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "price-tracker")]
#[command(about = "Watches a product page and alerts a webhook when the price drops")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file (optional; environment variables override it)
    #[arg(short, long, default_value = "price-tracker.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start tracking
    Run(RunArgs),
    /// Show the resolved configuration
    Config(ConfigArgs),
}
