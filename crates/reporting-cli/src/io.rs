#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use crate::client::CliError;

/// Read a JSON document from disk; the server performs the real validation.
pub async fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let data = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?;
    serde_json::from_str(&data)
        .map_err(|e| CliError::InvalidInput(format!("{} is not valid JSON: {e}", path.display())))
}
