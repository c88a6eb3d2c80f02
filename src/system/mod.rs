//! System Control
//!
//! Everything between a parsed command and the operating system: platform
//! detection, the per-platform action planner, and filename search. The
//! planner decides *which* command a platform would run; actually spawning
//! it is left behind the [`actions::ActionRunner`] seam so embedders choose
//! their own execution policy.

pub mod actions;
pub mod platform;
pub mod search;

pub use actions::{ActionRunner, CommandSpec, LogRunner, SystemAction};
pub use platform::{Platform, PlatformInfo};

/// Errors from platform detection and action planning.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SystemError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("{action} is not supported on {platform}")]
    Unsupported { action: String, platform: Platform },
    #[error("Volume must be between 0 and 100, got {0}")]
    VolumeOutOfRange(i64),
}
