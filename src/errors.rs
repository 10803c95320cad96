// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! The first four variants are the engine's own taxonomy and are what the
//! console reports back to the user. The rest are ambient failures (config,
//! IO, parsing) that mostly surface at startup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotaError {
    /// Bad count, or an assignment against an empty / missing roster.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The roster or the cursor could not be retrieved.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A cursor write failed; the operation was aborted with no local change.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RotaError {
    /// Wrap an adapter-level failure as a [`RotaError::Fetch`], keeping the
    /// whole context chain in the message.
    pub fn fetch(err: anyhow::Error) -> Self {
        RotaError::Fetch(format!("{err:#}"))
    }

    /// Wrap an adapter-level failure as a [`RotaError::Persistence`].
    pub fn persistence(err: anyhow::Error) -> Self {
        RotaError::Persistence(format!("{err:#}"))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RotaError>;
