// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::cursor::CURSOR_FILE_PATH;
use crate::types::{CursorCheck, CursorVariant};

/// Configuration exactly as read from TOML, before validation.
///
/// ```toml
/// [config]
/// variant = "shared"
/// cursor_check = "version"
///
/// [roster]
/// path = "roster.txt"
/// watch = true
///
/// [cursor]
/// path = ".rota/cursor"
///
/// [annotate]
/// command = "./summarize.sh"
/// timeout = "5s"
/// ```
///
/// Every section is optional except that the roster needs a source.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub roster: RosterSection,

    #[serde(default)]
    pub cursor: CursorSection,

    #[serde(default)]
    pub annotate: AnnotateSection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub roster: RosterSource,
    pub roster_watch: bool,
    pub cursor: CursorSection,
    pub annotate: AnnotateSettings,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        roster: RosterSource,
        roster_watch: bool,
        cursor: CursorSection,
        annotate: AnnotateSettings,
    ) -> Self {
        Self {
            config,
            roster,
            roster_watch,
            cursor,
            annotate,
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// `"local"` (default) or `"shared"`.
    #[serde(default)]
    pub variant: CursorVariant,

    /// `"none"` (default) or `"version"`; only meaningful when shared.
    #[serde(default)]
    pub cursor_check: CursorCheck,
}

/// `[roster]` section. Exactly one of `names` / `path` must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterSection {
    #[serde(default)]
    pub names: Option<Vec<String>>,

    /// Text file with one name per line, relative to the config file.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Reload automatically when the roster file changes.
    #[serde(default)]
    pub watch: bool,
}

/// Where the roster comes from, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    Inline(Vec<String>),
    File(PathBuf),
}

/// `[cursor]` section (shared variant).
#[derive(Debug, Clone, Deserialize)]
pub struct CursorSection {
    /// Cursor record location, relative to the config file.
    #[serde(default = "default_cursor_path")]
    pub path: PathBuf,
}

fn default_cursor_path() -> PathBuf {
    PathBuf::from(CURSOR_FILE_PATH)
}

impl Default for CursorSection {
    fn default() -> Self {
        Self {
            path: default_cursor_path(),
        }
    }
}

/// `[annotate]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotateSection {
    /// Shell command; annotations are disabled when absent.
    #[serde(default)]
    pub command: Option<String>,

    /// Duration string such as `"500ms"` or `"5s"`.
    #[serde(default = "default_annotate_timeout")]
    pub timeout: String,
}

fn default_annotate_timeout() -> String {
    "5s".to_string()
}

impl Default for AnnotateSection {
    fn default() -> Self {
        Self {
            command: None,
            timeout: default_annotate_timeout(),
        }
    }
}

/// Validated annotator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateSettings {
    pub command: Option<String>,
    pub timeout: Duration,
}
