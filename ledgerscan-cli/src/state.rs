use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$LEDGERSCAN_HOME`, else `~/.ledgerscan`.
pub fn ledgerscan_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("LEDGERSCAN_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set (or set LEDGERSCAN_HOME)")?;
    Ok(PathBuf::from(home).join(".ledgerscan"))
}

pub fn ensure_ledgerscan_home() -> Result<PathBuf> {
    let dir = ledgerscan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
