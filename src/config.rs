//! Toolkit Configuration
//!
//! Loads the toolkit's configuration from `dugout.json` in the project
//! directory, falling back to defaults for anything unset.

use std::fs;
use std::path::{Path, PathBuf};

/// Config file name within the project directory.
const CONFIG_FILENAME: &str = "dugout.json";

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolkitConfig {
    /// Exact interpreter version the bootstrap enforces.
    pub python_version: String,
    /// Virtual environment directory, relative to the project root.
    pub venv_dir: String,
    /// Pinned dependency manifest.
    pub requirements_file: String,
    /// Ranked battle results used to fit the win-probability model.
    pub ranked_results_file: String,
    /// Directory where fitted win-probability models are stored.
    pub model_dir: String,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        default_config()
    }
}

/// The built-in configuration used when `dugout.json` is absent.
pub fn default_config() -> ToolkitConfig {
    ToolkitConfig {
        python_version: "3.10.2".to_string(),
        venv_dir: ".venv".to_string(),
        requirements_file: "requirements.txt".to_string(),
        ranked_results_file: "input/ranked_results.csv".to_string(),
        model_dir: "input".to_string(),
    }
}

/// Load the toolkit config from `dugout.json` under `dir`.
///
/// Missing fields fall back to defaults. Returns the defaults outright if
/// the file does not exist or cannot be parsed.
pub fn load_config(dir: &Path) -> ToolkitConfig {
    let config_path = get_config_path(dir);
    if !config_path.exists() {
        return default_config();
    }

    let contents = match fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(_) => return default_config(),
    };
    let mut config: ToolkitConfig = match serde_json::from_str(&contents) {
        Ok(c) => c,
        Err(_) => return default_config(),
    };

    // Merge defaults for unset fields
    let defaults = default_config();

    if config.python_version.is_empty() {
        config.python_version = defaults.python_version;
    }
    if config.venv_dir.is_empty() {
        config.venv_dir = defaults.venv_dir;
    }
    if config.requirements_file.is_empty() {
        config.requirements_file = defaults.requirements_file;
    }
    if config.ranked_results_file.is_empty() {
        config.ranked_results_file = defaults.ranked_results_file;
    }
    if config.model_dir.is_empty() {
        config.model_dir = defaults.model_dir;
    }

    config
}

/// Returns the full path to the toolkit config file under `dir`.
pub fn get_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}
