//! Natural-Language Command Parser
//!
//! Turns a transcribed or typed utterance into a structured [`Command`]:
//! an intent, an optional target, and a confirmation flag for destructive
//! actions. The parser is a pure function — no session memory, no learning,
//! safe to call from any number of tasks concurrently.
//!
//! Matching is a flat cascade of rules evaluated in a fixed order; the first
//! rule that matches wins and nothing after it is consulted. Utterances that
//! match no rule come back as [`Command::unknown`] rather than an error.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Stop-words stripped from the utterance before any rule runs.
static FILLER_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "please", "could", "you", "can", "would", "will", "up", "the", "a", "an", "for", "me",
        "my",
    ]
    .into_iter()
    .collect()
});

/// The closed set of actions the parser can recognize.
///
/// Serialized as the kebab-case tag (`open-file`, `set-volume`, …) that the
/// downstream dispatcher keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    OpenFile,
    OpenApp,
    CloseApp,
    SearchFile,
    DeleteFile,
    SetVolume,
    Mute,
    Unmute,
    Shutdown,
    Restart,
    Sleep,
    AddTask,
    ListTasks,
    ListAllTasks,
    CompleteTask,
    DeleteTask,
    TaskCount,
    Exit,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Intent::OpenFile => "open-file",
            Intent::OpenApp => "open-app",
            Intent::CloseApp => "close-app",
            Intent::SearchFile => "search-file",
            Intent::DeleteFile => "delete-file",
            Intent::SetVolume => "set-volume",
            Intent::Mute => "mute",
            Intent::Unmute => "unmute",
            Intent::Shutdown => "shutdown",
            Intent::Restart => "restart",
            Intent::Sleep => "sleep",
            Intent::AddTask => "add-task",
            Intent::ListTasks => "list-tasks",
            Intent::ListAllTasks => "list-all-tasks",
            Intent::CompleteTask => "complete-task",
            Intent::DeleteTask => "delete-task",
            Intent::TaskCount => "task-count",
            Intent::Exit => "exit",
        };
        f.write_str(tag)
    }
}

/// The parser's sole output: what the user wants, with what, and whether the
/// dispatcher must ask before doing it.
///
/// `target` is an opaque payload whose meaning is intent-specific (an app
/// name, a filename, a numeric volume level, or `"<description>|<priority>"`
/// for task creation). Target strings are not re-parseable commands; feeding
/// one back through [`parse`] is not guaranteed to reproduce the intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub intent: Option<Intent>,
    pub target: Option<String>,
    pub needs_confirm: bool,
}

impl Command {
    fn new(intent: Intent, target: Option<String>, needs_confirm: bool) -> Self {
        Self {
            intent: Some(intent),
            target,
            needs_confirm,
        }
    }

    /// The no-match result: no intent, no target, nothing to confirm.
    pub fn unknown() -> Self {
        Self {
            intent: None,
            target: None,
            needs_confirm: false,
        }
    }
}

/// Parse an utterance into a [`Command`].
///
/// Never fails: malformed, empty, or unrecognized input yields
/// [`Command::unknown`].
pub fn parse(text: &str) -> Command {
    let tokens = clean_tokens(text);

    // Rule order is load-bearing: `open file` must beat `open`, `delete` must
    // defer to the task block when a task word is present, and the task block
    // must run before the task-count and exit checks it can fall through to.
    let rules: [fn(&[String]) -> Option<Command>; 14] = [
        rule_open_file,
        rule_open_app,
        rule_close_app,
        rule_search_file,
        rule_delete_file,
        rule_set_volume,
        rule_mute,
        rule_unmute,
        rule_shutdown,
        rule_restart,
        rule_sleep,
        rule_tasks,
        rule_task_count,
        rule_exit,
    ];

    for rule in rules {
        if let Some(cmd) = rule(&tokens) {
            tracing::debug!(intent = %cmd.intent.map(|i| i.to_string()).unwrap_or_default(), "parsed utterance");
            return cmd;
        }
    }
    Command::unknown()
}

// ─── Preprocessing ───────────────────────────────────────────

/// Lowercase, trim, drop a single trailing period, split on whitespace, and
/// strip filler words. Token order is preserved so multi-word targets can be
/// rebuilt by joining.
fn clean_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    trimmed
        .split_whitespace()
        .filter(|w| !FILLER_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

// ─── Token helpers ───────────────────────────────────────────

fn has(tokens: &[String], word: &str) -> bool {
    tokens.iter().any(|t| t == word)
}

fn has_any(tokens: &[String], words: &[&str]) -> bool {
    tokens.iter().any(|t| words.contains(&t.as_str()))
}

/// All tokens not in the exclusion set, order preserved.
fn without(tokens: &[String], exclude: &[&str]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !exclude.contains(&t.as_str()))
        .cloned()
        .collect()
}

/// Tokens with the first occurrence of `word` dropped.
fn without_first(tokens: &[String], word: &str) -> Vec<String> {
    let mut removed = false;
    tokens
        .iter()
        .filter(|t| {
            if !removed && *t == word {
                removed = true;
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}

/// Space-join the remaining tokens; `None` when nothing is left.
fn join(tokens: &[String]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

/// First token made up entirely of ASCII digits.
fn first_number(tokens: &[String]) -> Option<String> {
    tokens
        .iter()
        .find(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
        .cloned()
}

// ─── Cascade rules ───────────────────────────────────────────
//
// Each rule returns `Some(command)` on a match and `None` to pass the
// utterance along. Rules that extract a target return `None` when the target
// would be empty, so the cascade keeps going instead of producing a
// half-formed command.

fn rule_open_file(tokens: &[String]) -> Option<Command> {
    if !(has(tokens, "file") && has(tokens, "open")) {
        return None;
    }
    let target = join(&without(tokens, &["open", "file"]))?;
    Some(Command::new(Intent::OpenFile, Some(target), false))
}

fn rule_open_app(tokens: &[String]) -> Option<Command> {
    if !has(tokens, "open") {
        return None;
    }
    let target = join(&without_first(tokens, "open"))?;
    Some(Command::new(Intent::OpenApp, Some(target), false))
}

fn rule_close_app(tokens: &[String]) -> Option<Command> {
    if !has(tokens, "close") {
        return None;
    }
    let target = join(&without_first(tokens, "close"))?;
    Some(Command::new(Intent::CloseApp, Some(target), false))
}

fn rule_search_file(tokens: &[String]) -> Option<Command> {
    if !has_any(tokens, &["search", "find"]) {
        return None;
    }
    let target = join(&without(tokens, &["search", "find", "file"]))?;
    Some(Command::new(Intent::SearchFile, Some(target), false))
}

fn rule_delete_file(tokens: &[String]) -> Option<Command> {
    if !has(tokens, "delete") || has_any(tokens, &["task", "tasks"]) {
        return None;
    }
    let target = join(&without(tokens, &["delete", "file"]))?;
    Some(Command::new(Intent::DeleteFile, Some(target), true))
}

fn rule_set_volume(tokens: &[String]) -> Option<Command> {
    if !has(tokens, "volume") {
        return None;
    }
    // A missing level still matches; the dispatcher asks for the number.
    let rest = without_first(tokens, "volume");
    Some(Command::new(Intent::SetVolume, first_number(&rest), false))
}

fn rule_mute(tokens: &[String]) -> Option<Command> {
    has(tokens, "mute").then(|| Command::new(Intent::Mute, None, false))
}

fn rule_unmute(tokens: &[String]) -> Option<Command> {
    has(tokens, "unmute").then(|| Command::new(Intent::Unmute, None, false))
}

fn rule_shutdown(tokens: &[String]) -> Option<Command> {
    has_any(tokens, &["shutdown", "shut"]).then(|| Command::new(Intent::Shutdown, None, true))
}

fn rule_restart(tokens: &[String]) -> Option<Command> {
    has(tokens, "restart").then(|| Command::new(Intent::Restart, None, true))
}

fn rule_sleep(tokens: &[String]) -> Option<Command> {
    has(tokens, "sleep").then(|| Command::new(Intent::Sleep, None, true))
}

/// The task block: only entered when a task word is present, and itself an
/// ordered sub-cascade. Falls through (returns `None`) when the task word
/// appears without any task verb, so `how many tasks` can still reach the
/// count rule below it.
fn rule_tasks(tokens: &[String]) -> Option<Command> {
    if !has_any(tokens, &["task", "tasks"]) {
        return None;
    }

    if has_any(tokens, &["add", "create", "new"]) {
        return Some(add_task(tokens));
    }

    if has_any(tokens, &["list", "show", "what"]) {
        let intent = if has_any(tokens, &["all", "completed"]) {
            Intent::ListAllTasks
        } else {
            Intent::ListTasks
        };
        return Some(Command::new(intent, None, false));
    }

    if has_any(tokens, &["complete", "finish", "done"]) {
        return Some(Command::new(Intent::CompleteTask, first_number(tokens), false));
    }

    if has_any(tokens, &["delete", "remove", "cancel"]) {
        return Some(Command::new(Intent::DeleteTask, first_number(tokens), true));
    }

    None
}

/// Build an `add-task` command, folding any priority words into the
/// composite `"<description>|<priority>"` target.
fn add_task(tokens: &[String]) -> Command {
    let mut words = without(tokens, &["add", "create", "new", "task", "tasks"]);

    let priority = if has_any(&words, &["high", "important", "urgent"]) {
        words = without(&words, &["high", "important", "urgent", "priority"]);
        "high"
    } else if has(&words, "low") {
        words = without(&words, &["low", "priority"]);
        "low"
    } else {
        "normal"
    };

    let target = join(&words).map(|desc| format!("{desc}|{priority}"));
    Command::new(Intent::AddTask, target, false)
}

fn rule_task_count(tokens: &[String]) -> Option<Command> {
    let asks_count = (has(tokens, "how") && has(tokens, "many")) || has(tokens, "count");
    (asks_count && has_any(tokens, &["task", "tasks"]))
        .then(|| Command::new(Intent::TaskCount, None, false))
}

fn rule_exit(tokens: &[String]) -> Option<Command> {
    has_any(tokens, &["exit", "quit"]).then(|| Command::new(Intent::Exit, None, false))
}
