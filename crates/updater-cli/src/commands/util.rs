//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a JSON object from a file for `--from-file` flags.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CliError::Validation {
            field: "from-file".into(),
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
    }
}

/// Split `KEY=VALUE`. The value is parsed as JSON, falling back to a string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), CliError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| CliError::Validation {
        field: raw.into(),
        reason: "expected KEY=VALUE".into(),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: raw.into(),
            reason: "key must not be empty".into(),
        });
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
