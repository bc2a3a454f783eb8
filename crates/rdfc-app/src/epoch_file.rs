//! Plain-text epoch loader
//!
//! One electrode per line, samples separated by whitespace. Blank lines and
//! lines starting with `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Read whitespace-separated rows of numbers.
///
/// Row count and length are not checked here; [`rdfc_core::Epoch`] reports
/// those as shape mismatches.
pub fn read_rows<R: BufRead>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let row = trimmed
            .split_whitespace()
            .enumerate()
            .map(|(col, token)| {
                token.parse::<f64>().map_err(|_| {
                    anyhow!("line {line_no}, column {}: '{token}' is not a number", col + 1)
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(rows)
}

/// Read an epoch file from disk.
pub fn load_rows(path: &Path) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_rows(BufReader::new(file)).with_context(|| format!("Failed to parse {}", path.display()))
}
