//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;
use std::path::{Path, PathBuf};

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "resolver.max_fallback")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
///
/// `config_path` is the global `--config` override, if any.
pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let path: PathBuf = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };

    // Show path
    if args.path {
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        Config::default().save_to(&path)?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load_from(&path)?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            for line in render_all(&config) {
                println!("{}", line);
            }
        }

        // Key only: show that value
        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                return Err(Error::Config(format!(
                    "Unknown config key: {}\nAvailable keys:\n  {}",
                    key,
                    Config::available_keys().join("\n  ")
                )));
            }
        },

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save_to(&path)?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid (clap fills key first, kept for completeness)
        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// One `key = value` line per config key
fn render_all(config: &Config) -> Vec<String> {
    Config::available_keys()
        .into_iter()
        .filter_map(|key| config.get(key).map(|value| format!("{} = {}", key, value)))
        .collect()
}
