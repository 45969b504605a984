use anyhow::{anyhow, Result};

use crate::database::models::DEFAULT_MAX_POSITIONS;

/// Upper bound for an event's capacity.
pub const MAX_POSITIONS_LIMIT: i64 = 500;
pub const MAX_EVENT_NAME_LEN: usize = 64;

/// Trims and checks an event name, returning the cleaned value.
pub fn validate_event_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Event name cannot be empty"));
    }

    if name.chars().count() > MAX_EVENT_NAME_LEN {
        return Err(anyhow!(
            "Event name cannot be longer than {} characters",
            MAX_EVENT_NAME_LEN
        ));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("Event name cannot contain line breaks"));
    }

    if name.starts_with('/') {
        return Err(anyhow!("Event name cannot start with '/'"));
    }

    Ok(name.to_string())
}

/// Parses the capacity answer of the create-event dialogue.
///
/// Blank or non-numeric input falls back to the default capacity; a number
/// outside `1..=MAX_POSITIONS_LIMIT` is an error.
pub fn parse_max_positions(input: &str) -> Result<i64> {
    let input = input.trim();

    let Ok(value) = input.parse::<i64>() else {
        return Ok(DEFAULT_MAX_POSITIONS);
    };

    if value < 1 {
        return Err(anyhow!("Number of positions must be at least 1"));
    }

    if value > MAX_POSITIONS_LIMIT {
        return Err(anyhow!(
            "Number of positions cannot exceed {}",
            MAX_POSITIONS_LIMIT
        ));
    }

    Ok(value)
}

/// Parses a queue position typed by the user. Range checks happen on registration.
pub fn parse_position(input: &str) -> Result<i64> {
    let input = input.trim();

    if input.is_empty() {
        return Err(anyhow!("Enter a number"));
    }

    input.parse::<i64>().map_err(|_| anyhow!("Enter a number"))
}
