use std::str::FromStr;
use serde::Deserialize;

/// Where the assignment cursor lives.
///
/// - `Local`: in memory only; every reload starts again from the top of the
///   roster.
/// - `Shared`: persisted in a cursor store and re-read before every
///   assignment, so independent clients advance the same cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorVariant {
    Local,
    Shared,
}

impl Default for CursorVariant {
    fn default() -> Self {
        CursorVariant::Local
    }
}

impl FromStr for CursorVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(CursorVariant::Local),
            "shared" => Ok(CursorVariant::Shared),
            other => Err(format!(
                "invalid variant: {other} (expected \"local\" or \"shared\")"
            )),
        }
    }
}

/// How cursor writes guard against concurrent writers in the shared variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorCheck {
    /// Plain read-then-write; the last writer wins.
    None,
    /// Reject the write if the stored version moved since it was read.
    ///
    /// Exact for the in-memory store. The file store checks without a lock,
    /// so two writers that read the same version at the same instant can
    /// both get through.
    Version,
}

impl Default for CursorCheck {
    fn default() -> Self {
        CursorCheck::None
    }
}

impl FromStr for CursorCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(CursorCheck::None),
            "version" => Ok(CursorCheck::Version),
            other => Err(format!(
                "invalid cursor_check: {other} (expected \"none\" or \"version\")"
            )),
        }
    }
}
