//! JSON build reports.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use auctioneer_static::BuildReport;

/// Write a build report as pretty-printed JSON.
pub fn write_report(report: &BuildReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
