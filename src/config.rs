//! Configuration
//!
//! Reads `~/.voxcore/config.toml` at startup. Every field has a default, so
//! a missing or unparseable file never stops the assistant — it just runs
//! with the defaults and logs a warning.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub repl: ReplConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Directories to search for files. `~` expands to the home directory.
    /// Empty means the built-in Desktop/Documents/Downloads/home roots.
    pub paths: Vec<String>,
    /// Stop after this many matches.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            max_results: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Execute confirmation-required commands without prompting.
    pub auto_confirm: bool,
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or
    /// malformed.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "config unparseable, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                Self::default()
            }
        }
    }

    /// The directories `search-file` walks, with `~` expanded.
    pub fn search_roots(&self) -> Vec<PathBuf> {
        if self.search.paths.is_empty() {
            return crate::system::search::default_roots();
        }
        self.search
            .paths
            .iter()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
            .collect()
    }
}

/// Path to the app home directory: `~/.voxcore/`
pub fn voxcore_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".voxcore")
}

fn config_path() -> PathBuf {
    voxcore_home().join("config.toml")
}
