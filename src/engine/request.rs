// src/engine/request.rs

use crate::errors::{Result, RotaError};

/// Parse a user-supplied assignment count.
///
/// Accepts a positive decimal integer with optional surrounding whitespace.
/// Zero, negatives, non-numeric input and overflow are `InvalidRequest`.
pub fn parse_count(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RotaError::InvalidRequest(
            "count is required".to_string(),
        ));
    }

    if let Some(rest) = trimmed.strip_prefix('-') {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(RotaError::InvalidRequest(format!(
                "count must be a positive integer (got {trimmed})"
            )));
        }
    }

    let count: usize = trimmed.parse().map_err(|_| {
        RotaError::InvalidRequest(format!("count must be a positive integer (got {trimmed:?})"))
    })?;

    if count == 0 {
        return Err(RotaError::InvalidRequest(
            "count must be a positive integer (got 0)".to_string(),
        ));
    }

    Ok(count)
}
