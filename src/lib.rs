//! voxcore — voice-assistant command core.
//!
//! Takes transcribed speech or typed text, parses it into a structured
//! command (intent + optional target + confirmation flag), and dispatches it
//! to an in-memory task list or a platform-aware system-action planner.
//! Speech-to-text and text-to-speech stay outside this crate: callers hand
//! in text and speak the reply strings however they like.

pub mod config;
pub mod dispatch;
pub mod parser;
pub mod system;
pub mod tasks;

#[cfg(test)]
mod tests;

/// Crate version, surfaced by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
