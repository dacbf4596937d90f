//! Logger setup
//!
//! The TUI owns the terminal, so interactive sessions log to a file. Headless
//! commands log to stderr. `RUST_LOG` overrides the configured level.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

use crate::config::LoggingPreferences;

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn init_logging(prefs: &LoggingPreferences, target: LogTarget) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(prefs.level.as_str()));

    match target {
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
    }

    builder.try_init().context("Logger already initialized")?;
    Ok(())
}
