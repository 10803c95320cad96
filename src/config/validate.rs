// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{AnnotateSettings, ConfigFile, RawConfigFile, RosterSource};
use crate::errors::{Result, RotaError};
use crate::types::{CursorCheck, CursorVariant};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RotaError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw)?;
        let roster = validate_roster(&raw)?;
        let annotate = validate_annotate(&raw)?;
        validate_cursor(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.config,
            roster,
            raw.roster.watch,
            raw.cursor,
            annotate,
        ))
    }
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    // variant / cursor_check are strongly typed and checked during
    // deserialization; only their combination is checked here.
    if cfg.config.cursor_check == CursorCheck::Version
        && cfg.config.variant != CursorVariant::Shared
    {
        return Err(RotaError::ConfigError(
            "[config].cursor_check = \"version\" requires variant = \"shared\"".to_string(),
        ));
    }
    Ok(())
}

fn validate_roster(cfg: &RawConfigFile) -> Result<RosterSource> {
    let roster = &cfg.roster;
    let source = match (&roster.names, &roster.path) {
        (Some(_), Some(_)) => {
            return Err(RotaError::ConfigError(
                "[roster] must set either `names` or `path`, not both".to_string(),
            ));
        }
        (None, None) => {
            return Err(RotaError::ConfigError(
                "config must contain a roster: set [roster].names or [roster].path".to_string(),
            ));
        }
        (Some(names), None) => {
            for (i, name) in names.iter().enumerate() {
                if name.trim().is_empty() {
                    return Err(RotaError::ConfigError(format!(
                        "[roster].names[{i}] is blank"
                    )));
                }
            }
            RosterSource::Inline(names.iter().map(|n| n.trim().to_string()).collect())
        }
        (None, Some(path)) => {
            if path.as_os_str().is_empty() {
                return Err(RotaError::ConfigError(
                    "[roster].path must not be empty".to_string(),
                ));
            }
            RosterSource::File(path.clone())
        }
    };

    if roster.watch && !matches!(source, RosterSource::File(_)) {
        return Err(RotaError::ConfigError(
            "[roster].watch = true requires [roster].path".to_string(),
        ));
    }

    Ok(source)
}

fn validate_cursor(cfg: &RawConfigFile) -> Result<()> {
    if cfg.cursor.path.as_os_str().is_empty() {
        return Err(RotaError::ConfigError(
            "[cursor].path must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_annotate(cfg: &RawConfigFile) -> Result<AnnotateSettings> {
    let command = match &cfg.annotate.command {
        Some(cmd) if cmd.trim().is_empty() => {
            return Err(RotaError::ConfigError(
                "[annotate].command must not be empty".to_string(),
            ));
        }
        Some(cmd) => Some(cmd.clone()),
        None => None,
    };

    let timeout = parse_duration(&cfg.annotate.timeout).map_err(|e| {
        RotaError::ConfigError(format!("[annotate].timeout: {e}"))
    })?;
    if timeout.is_zero() {
        return Err(RotaError::ConfigError(
            "[annotate].timeout must be greater than zero".to_string(),
        ));
    }

    Ok(AnnotateSettings { command, timeout })
}

fn secs_times(value: u64, factor: u64, raw: &str) -> std::result::Result<Duration, String> {
    value
        .checked_mul(factor)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{raw}' is too large"))
}

/// Parse durations like `"500ms"`, `"5s"`, `"2m"`, `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => secs_times(value, 60, s),
        "h" => secs_times(value, 60 * 60, s),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
