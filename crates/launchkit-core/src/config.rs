//! Configuration file loading (~/.launchkit/config.yaml)

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::ExecutionMode;
use crate::utils::get_home_dir;

/// Top-level LaunchKit configuration
///
/// Every field is optional in the file; defaults are resolved at load time
/// so callers never see a half-configured state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LaunchkitConfig {
    /// Path to the project registry file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<Utf8PathBuf>,

    /// Path to a user grammar table replacing the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar: Option<Utf8PathBuf>,

    /// Directory project scaffolds are created under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_root: Option<Utf8PathBuf>,

    /// Default execution mode for new sessions
    #[serde(default)]
    pub mode: ExecutionMode,
}

impl LaunchkitConfig {
    /// Load configuration from the default location, or return defaults
    /// when no config file exists
    pub fn load_default() -> Result<Self> {
        let home = get_home_dir().map_err(|e| Error::invalid_config(e.to_string()))?;
        let path = home.join(".launchkit").join("config.yaml");
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Load configuration from an explicit path
    pub fn load(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::config_not_found(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the registry path, falling back to ~/.launchkit/projects.json
    pub fn registry_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.registry {
            return Ok(path.clone().into_std_path_buf());
        }
        let home = get_home_dir().map_err(|e| Error::invalid_config(e.to_string()))?;
        Ok(home.join(".launchkit").join("projects.json"))
    }

    /// Resolve the scaffold root, falling back to ~/launchkit-projects
    pub fn projects_root_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.projects_root {
            return Ok(path.clone().into_std_path_buf());
        }
        let home = get_home_dir().map_err(|e| Error::invalid_config(e.to_string()))?;
        Ok(home.join("launchkit-projects"))
    }
}
