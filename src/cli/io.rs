//! JSON I/O handling for CLI
//!
//! - Input: JSON files
//! - Output: single JSON object per command on stdout

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read and parse a JSON file
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::invalid_input(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_value(&response)
}

/// Write a rejection with its details to stdout
pub fn write_rejection(code: &str, errors: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "rejected",
        "code": code,
        "errors": errors
    });
    write_value(&response)
}

fn write_value(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
