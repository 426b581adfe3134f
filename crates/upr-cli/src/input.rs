//! Accession list files
//!
//! `--input` files carry one accession per line; blank lines and `#`
//! comments are skipped.

use crate::error::{CliError, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Read accessions from a text file.
pub fn read_ids(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::input_file(format!("{}: {e}", path.display())))?;

    let ids: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Err(CliError::input_file(format!(
            "{}: no accessions found",
            path.display()
        )));
    }

    info!(count = ids.len(), file = %path.display(), "Read accession list");
    Ok(ids)
}
