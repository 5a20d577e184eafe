use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChrnError, Result};
use crate::git::Author;

/// File name looked up in the current directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "chrn.toml";

/// Represents the complete configuration for chrn.
///
/// Every key is optional in the file; command-line flags take precedence
/// over file values.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Repository owner or organisation
    pub org: String,

    /// Repository name
    pub repo: Option<String>,

    /// Path of the changelog file
    pub changelog: Option<PathBuf>,

    /// File holding the forge API token
    pub token_file: PathBuf,

    /// Label marking pull requests that belong in the release notes
    pub label: String,

    /// Branch releases are cut from and pull requests target
    pub base_branch: String,

    /// Git remote used for pull and push
    pub remote: String,

    /// Prefix distinguishing release tags from bare versions
    pub tag_prefix: String,

    /// Default bump kind for `rotate`
    pub bump: String,

    /// Path of the single-line version file
    pub version_file: PathBuf,

    /// SSH private key for git transport; `~` expands to the home directory
    pub ssh_key: String,

    /// Identity for release commits; the repository's git identity when unset
    pub author: Option<Author>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            org: "knabben".to_string(),
            repo: None,
            changelog: None,
            token_file: PathBuf::from("./token"),
            label: "release-note".to_string(),
            base_branch: "master".to_string(),
            remote: "origin".to_string(),
            tag_prefix: "v".to_string(),
            bump: "minor".to_string(),
            version_file: PathBuf::from("version.py"),
            ssh_key: "~/.ssh/id_rsa".to_string(),
            author: None,
        }
    }
}

impl Config {
    /// Resolved SSH key path with a leading `~` expanded
    pub fn ssh_key_path(&self) -> PathBuf {
        expand_home(&self.ssh_key)
    }
}

/// Expands a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `chrn.toml` in current directory
/// 3. `chrn.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Config::default());
        }
        path
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ChrnError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str)
        .map_err(|e| ChrnError::config(format!("invalid {}: {}", path.display(), e)))
}
