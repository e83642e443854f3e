use serde_json::Value;
use std::io::{self, Read};

/// Read an applicant document piped on stdin, e.g.
/// `cat applicant.json | drc assess --config config/default-risk.yaml`.
///
/// Returns None when stdin is a terminal or the pipe is empty, so the caller
/// falls back to individual flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse applicant JSON from stdin: {}", e))?;
    tracing::debug!(bytes = trimmed.len(), "applicant read from stdin");
    Ok(Some(value))
}
