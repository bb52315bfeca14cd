//! Shared utility functions for LaunchKit crates

use anyhow::anyhow;
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// container setups which remap HOME keep the registry and config in the
/// mounted location.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Get the LaunchKit state directory (~/.launchkit), creating it if needed
pub fn get_state_dir() -> anyhow::Result<PathBuf> {
    let dir = get_home_dir()?.join(".launchkit");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
