#![allow(dead_code)]

use std::path::PathBuf;

use rota::config::{
    AnnotateSection, ConfigFile, ConfigSection, CursorSection, RawConfigFile, RosterSection,
};
use rota::types::{CursorCheck, CursorVariant};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts as a local-cursor config with no roster source; add one with
/// [`names`](Self::names) or [`roster_path`](Self::roster_path).
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                roster: RosterSection::default(),
                cursor: CursorSection::default(),
                annotate: AnnotateSection::default(),
            },
        }
    }

    pub fn names(mut self, names: &[&str]) -> Self {
        self.config.roster.names = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn roster_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.roster.path = Some(path.into());
        self
    }

    pub fn watch(mut self, val: bool) -> Self {
        self.config.roster.watch = val;
        self
    }

    pub fn shared(mut self) -> Self {
        self.config.config.variant = CursorVariant::Shared;
        self
    }

    pub fn cursor_check(mut self, check: CursorCheck) -> Self {
        self.config.config.cursor_check = check;
        self
    }

    pub fn cursor_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cursor.path = path.into();
        self
    }

    pub fn annotate_command(mut self, cmd: &str) -> Self {
        self.config.annotate.command = Some(cmd.to_string());
        self
    }

    pub fn annotate_timeout(mut self, timeout: &str) -> Self {
        self.config.annotate.timeout = timeout.to_string();
        self
    }

    /// The unvalidated config, for tests that exercise validation.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
