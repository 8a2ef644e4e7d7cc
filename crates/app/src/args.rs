pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "keyshake")]
#[command(about = "Two-party P-256 key agreement and AES-256-CBC message exchange")]
pub struct Args {
    /// Path to the keyshake config directory (defaults to ~/.keyshake)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    #[command(subcommand)]
    pub command: crate::Command,
}
