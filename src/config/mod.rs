// src/config/mod.rs

//! Configuration loading and validation for rota.
//!
//! - [`model`] defines the TOML-backed data model.
//! - [`loader`] reads a config file from disk.
//! - [`validate`] turns a `RawConfigFile` into a checked `ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve_relative};
pub use model::{
    AnnotateSection, AnnotateSettings, ConfigFile, ConfigSection, CursorSection, RawConfigFile,
    RosterSection, RosterSource,
};
pub use validate::parse_duration;
