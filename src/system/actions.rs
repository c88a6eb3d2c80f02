//! System Action Planner
//!
//! Maps each system-level intent to the exact command line its platform
//! would run. The tables mirror the usual native tools: `osascript`/`pmset`
//! on macOS, `shutdown`/`taskkill`/`rundll32` on Windows, and
//! `amixer`/`systemctl`/`xdg-open` on Linux.
//!
//! Planning is pure. Execution goes through [`ActionRunner`]; the shipped
//! [`LogRunner`] only logs the plan and answers with the acknowledgement
//! text, leaving real process spawning to the embedding application.

use super::{Platform, SystemError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A system-level effect requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemAction {
    SetVolume(u8),
    Mute,
    Unmute,
    Shutdown,
    Restart,
    Sleep,
    OpenApp(String),
    CloseApp(String),
    OpenFile(String),
    DeleteFile(String),
}

/// A fully-rendered command line: program plus argv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

impl SystemAction {
    /// Validated constructor for volume changes. Levels outside 0-100 are
    /// rejected before any plan exists.
    pub fn set_volume(level: i64) -> Result<Self, SystemError> {
        if (0..=100).contains(&level) {
            Ok(SystemAction::SetVolume(level as u8))
        } else {
            Err(SystemError::VolumeOutOfRange(level))
        }
    }

    /// Render the command line `platform` would run for this action.
    ///
    /// Volume, mute, and unmute have no Windows table entry and come back as
    /// [`SystemError::Unsupported`] there.
    pub fn command(&self, platform: Platform) -> Result<CommandSpec, SystemError> {
        use Platform::*;

        let spec = match (self, platform) {
            (SystemAction::SetVolume(level), MacOs) => CommandSpec::new(
                "osascript",
                &["-e", &format!("set volume output volume {level}")],
            ),
            (SystemAction::SetVolume(level), Linux) => {
                CommandSpec::new("amixer", &["set", "Master", &format!("{level}%")])
            }
            (SystemAction::Mute, MacOs) => {
                CommandSpec::new("osascript", &["-e", "set volume with output muted"])
            }
            (SystemAction::Mute, Linux) => CommandSpec::new("amixer", &["set", "Master", "mute"]),
            (SystemAction::Unmute, MacOs) => {
                CommandSpec::new("osascript", &["-e", "set volume without output muted"])
            }
            (SystemAction::Unmute, Linux) => {
                CommandSpec::new("amixer", &["set", "Master", "unmute"])
            }
            (SystemAction::SetVolume(_) | SystemAction::Mute | SystemAction::Unmute, Windows) => {
                return Err(SystemError::Unsupported {
                    action: self.describe(),
                    platform,
                });
            }

            (SystemAction::Shutdown, MacOs) => CommandSpec::new(
                "osascript",
                &["-e", "tell app \"System Events\" to shut down"],
            ),
            (SystemAction::Shutdown, Windows) => CommandSpec::new("shutdown", &["/s", "/t", "0"]),
            (SystemAction::Shutdown, Linux) => CommandSpec::new("systemctl", &["poweroff"]),

            (SystemAction::Restart, MacOs) => {
                CommandSpec::new("osascript", &["-e", "tell app \"System Events\" to restart"])
            }
            (SystemAction::Restart, Windows) => CommandSpec::new("shutdown", &["/r", "/t", "0"]),
            (SystemAction::Restart, Linux) => CommandSpec::new("systemctl", &["reboot"]),

            (SystemAction::Sleep, MacOs) => CommandSpec::new("pmset", &["sleepnow"]),
            (SystemAction::Sleep, Windows) => CommandSpec::new(
                "rundll32.exe",
                &["powrprof.dll,SetSuspendState", "0,1,0"],
            ),
            (SystemAction::Sleep, Linux) => CommandSpec::new("systemctl", &["suspend"]),

            (SystemAction::OpenApp(app), MacOs) => CommandSpec::new("open", &["-a", app]),
            (SystemAction::OpenApp(app), Windows) => CommandSpec::new("cmd", &["/C", "start", app]),
            (SystemAction::OpenApp(app), Linux) => CommandSpec::new(app, &[]),

            (SystemAction::CloseApp(app), MacOs) => {
                CommandSpec::new("osascript", &["-e", &format!("quit app \"{app}\"")])
            }
            (SystemAction::CloseApp(app), Windows) => {
                CommandSpec::new("taskkill", &["/F", "/IM", &format!("{app}.exe")])
            }
            (SystemAction::CloseApp(app), Linux) => CommandSpec::new("pkill", &[app]),

            (SystemAction::OpenFile(path), MacOs) => CommandSpec::new("open", &[path]),
            (SystemAction::OpenFile(path), Windows) => {
                CommandSpec::new("cmd", &["/C", "start", "", path])
            }
            (SystemAction::OpenFile(path), Linux) => CommandSpec::new("xdg-open", &[path]),

            (SystemAction::DeleteFile(path), Windows) => {
                CommandSpec::new("cmd", &["/C", "del", path])
            }
            (SystemAction::DeleteFile(path), MacOs | Linux) => CommandSpec::new("rm", &[path]),
        };
        Ok(spec)
    }

    /// Short human-readable name, used in errors and logs.
    pub fn describe(&self) -> String {
        match self {
            SystemAction::SetVolume(level) => format!("set volume to {level}"),
            SystemAction::Mute => "mute".to_string(),
            SystemAction::Unmute => "unmute".to_string(),
            SystemAction::Shutdown => "shutdown".to_string(),
            SystemAction::Restart => "restart".to_string(),
            SystemAction::Sleep => "sleep".to_string(),
            SystemAction::OpenApp(app) => format!("open {app}"),
            SystemAction::CloseApp(app) => format!("close {app}"),
            SystemAction::OpenFile(path) => format!("open file {path}"),
            SystemAction::DeleteFile(path) => format!("delete file {path}"),
        }
    }

    /// The acknowledgement spoken back once the action has been handed off.
    pub fn acknowledgement(&self) -> String {
        match self {
            SystemAction::SetVolume(level) => format!("Volume set to {level}"),
            SystemAction::Mute => "System muted".to_string(),
            SystemAction::Unmute => "System unmuted".to_string(),
            SystemAction::Shutdown => "Shutting down".to_string(),
            SystemAction::Restart => "Restarting".to_string(),
            SystemAction::Sleep => "Going to sleep".to_string(),
            SystemAction::OpenApp(app) => format!("Opened {app}"),
            SystemAction::CloseApp(app) => format!("Closed {app}"),
            SystemAction::OpenFile(path) => format!("Opened {path}"),
            SystemAction::DeleteFile(path) => format!("Deleted {path}"),
        }
    }
}

/// Execution seam for planned actions.
///
/// The dispatcher plans an action and hands it here. Embedders that want
/// real side effects implement this trait with a process spawner; the
/// default [`LogRunner`] stays side-effect free.
pub trait ActionRunner: Send + Sync {
    /// Carry out (or record) the action, returning the reply text for the
    /// user.
    fn run(&self, action: &SystemAction, spec: &CommandSpec) -> Result<String, SystemError>;
}

/// Runner that logs the planned command line instead of executing it.
pub struct LogRunner;

impl ActionRunner for LogRunner {
    fn run(&self, action: &SystemAction, spec: &CommandSpec) -> Result<String, SystemError> {
        tracing::info!(action = %action.describe(), command = %spec, "planned system action");
        Ok(action.acknowledgement())
    }
}
