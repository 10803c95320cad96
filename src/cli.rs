// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::CursorVariant;

/// Command-line arguments for `rota`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rota",
    version,
    about = "Assign people from a roster in round-robin order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Rota.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Override `[config].variant` (local or shared cursor).
    #[arg(long, value_enum, value_name = "VARIANT")]
    pub variant: Option<VariantArg>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ROTA_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, fetch and print the roster, but start no console.
    #[arg(long)]
    pub dry_run: bool,
}

/// Cursor variant as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum VariantArg {
    Local,
    Shared,
}

impl From<VariantArg> for CursorVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Local => CursorVariant::Local,
            VariantArg::Shared => CursorVariant::Shared,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
