//! # CLI Interface
//!
//! Command-line arguments for `star-notary-node`, with environment fallbacks.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use star_notary::NotaryConfig;

use crate::logging::LogFormat;

/// Star notarization HTTP service.
///
/// Serves the validation and notarization API over a SQLite-backed ledger.
#[derive(Parser, Debug)]
#[command(name = "star-notary-node", about = "Star notarization service", version)]
pub struct Cli {
    /// Path to the SQLite ledger file. Created on first run.
    #[arg(long, env = "STAR_NOTARY_DB", default_value = "star-notary.db")]
    pub db: PathBuf,

    /// Keep the ledger in memory instead of on disk. Overrides `--db`.
    #[arg(long)]
    pub memory: bool,

    /// Address to serve HTTP on.
    #[arg(long, env = "STAR_NOTARY_LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,

    /// Log output format.
    #[arg(long, env = "STAR_NOTARY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "star_notary=info,star_notary_node=info,tower_http=info")]
    pub log_level: String,

    /// Seconds a validation challenge stays answerable.
    #[arg(long, env = "STAR_NOTARY_VALIDATION_WINDOW", default_value_t = 300)]
    pub validation_window_secs: u64,

    /// Largest accepted star story in bytes.
    #[arg(long, default_value_t = 500)]
    pub max_story_bytes: usize,
}

impl Cli {
    /// The on-disk ledger file, or `None` in memory mode.
    pub fn ledger_path(&self) -> Option<&Path> {
        (!self.memory).then_some(self.db.as_path())
    }

    pub fn notary_config(&self) -> NotaryConfig {
        NotaryConfig {
            validation_window: Duration::from_secs(self.validation_window_secs),
            max_story_bytes: self.max_story_bytes,
        }
    }
}
