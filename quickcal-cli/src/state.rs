use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$QUICKCAL_HOME`, or `~/.quickcal`.
pub fn quickcal_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("QUICKCAL_HOME")
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".quickcal"))
}

pub fn ensure_quickcal_home() -> Result<PathBuf> {
    let dir = quickcal_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
