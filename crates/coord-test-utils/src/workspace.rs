//! [`TestWorkspace`]: a temporary directory holding a view config file.

use coord_space::ViewConfig;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name used by [`TestWorkspace::with_config`].
pub const CONFIG_FILE: &str = "config.json";

/// A temporary directory with helpers for writing and reading configs.
///
/// # Example
///
/// ```rust,no_run
/// use coord_test_utils::{fixtures, workspace::TestWorkspace};
///
/// let ws = TestWorkspace::with_config(&fixtures::two_sliders_json());
/// let config = ws.read_config();
/// assert_eq!(config.layout.len(), 2);
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a directory with `config` written to [`CONFIG_FILE`].
    pub fn with_config(config: &Value) -> Self {
        let ws = Self::new();
        ws.write_json(CONFIG_FILE, config);
        ws
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of [`CONFIG_FILE`].
    pub fn config_path(&self) -> PathBuf {
        self.root().join(CONFIG_FILE)
    }

    /// Write `value` as pretty JSON to `name` under the root; returns its path.
    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    /// Parse [`CONFIG_FILE`] back into a config.
    ///
    /// # Panics
    /// Panics if the file is missing or is not a valid view config.
    pub fn read_config(&self) -> ViewConfig {
        let path = self.config_path();
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read config: {}", path.display()));
        ViewConfig::from_json_str(&content)
            .unwrap_or_else(|e| panic!("Invalid config at {}: {}", path.display(), e))
    }
}
