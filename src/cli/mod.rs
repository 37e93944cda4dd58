//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod resolve;
pub mod route;
pub mod serve;

use crate::config::Config;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Resolve places and plan driving routes
#[derive(Parser)]
#[command(name = "route-planner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Resolve place names to coordinates
    Resolve(resolve::ResolveArgs),

    /// Compute a route through coordinates
    Route(route::RouteArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve(args) => {
            init_logging("info");
            serve::run(args, load_config(config_path)?).await
        }
        Commands::Resolve(args) => {
            init_logging("warn");
            resolve::run(args, load_config(config_path)?).await
        }
        Commands::Route(args) => {
            init_logging("warn");
            route::run(args, load_config(config_path)?).await
        }
        Commands::Config(args) => config::run(args, config_path),
    }
}

/// Load config from `path` or the default location, then apply env overrides
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config.apply_env())
}

/// Log to stderr, filtered by RUST_LOG or `default_level`
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
