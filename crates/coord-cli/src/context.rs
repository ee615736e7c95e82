//! Loading and saving the config file a command operates on

use std::fs;
use std::path::{Path, PathBuf};

use coord_space::ViewConfig;

use crate::error::{CliError, Result};

/// The view config file named by `--config` / `COORD_CONFIG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the config.
    pub fn load(&self) -> Result<ViewConfig> {
        if !self.path.exists() {
            return Err(CliError::user(format!(
                "Config file not found: {}",
                self.path.display()
            )));
        }
        let content = fs::read_to_string(&self.path)?;
        let config = ViewConfig::from_json_str(&content).map_err(|e| {
            CliError::user(format!("Invalid view config {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(path = %self.path.display(), views = config.layout.len(), "Loaded view config");
        Ok(config)
    }

    /// Write the config back as pretty JSON.
    pub fn save(&self, config: &ViewConfig) -> Result<()> {
        let mut content = config.to_json_string_pretty()?;
        content.push('\n');
        fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), "Saved view config");
        Ok(())
    }
}

/// Read a JSON file that is not a view config (fragments, registries).
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::user(format!("Could not read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::user(format!("Invalid JSON in {}: {}", path.display(), e)))
}
