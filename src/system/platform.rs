//! Platform Detection
//!
//! Answers one question: what computer is this running on? The rest of the
//! system layer keys its command tables off the answer.

use super::SystemError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The platforms the action planner knows command tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(rename = "mac")]
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// Detect the platform this process is running on.
    pub fn current() -> Result<Self, SystemError> {
        Self::from_os(std::env::consts::OS)
    }

    fn from_os(os: &str) -> Result<Self, SystemError> {
        match os {
            "macos" => Ok(Platform::MacOs),
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            other => Err(SystemError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Platform::MacOs => "mac",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        };
        f.write_str(s)
    }
}

/// Diagnostics record for the `platform` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub os: String,
    pub arch: String,
    pub family: String,
}

impl PlatformInfo {
    pub fn current() -> Result<Self, SystemError> {
        Ok(Self {
            platform: Platform::current()?,
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            family: std::env::consts::FAMILY.to_string(),
        })
    }
}
