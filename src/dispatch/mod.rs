//! Command Dispatch
//!
//! Routes a parsed [`Command`] to the task store, the system-action planner,
//! or the file search, and owns the confirmation gate: commands flagged
//! `needs_confirm` are held until the user answers, then executed or
//! dropped. Everything the user should hear comes back as a [`Reply`] —
//! failures included, since a voice assistant apologizing beats one that
//! errors out.

use crate::config::Config;
use crate::parser::{self, Command, Intent};
use crate::system::{search, ActionRunner, LogRunner, Platform, SystemAction};
use crate::tasks::{Priority, Task, TaskStore};
use std::sync::Arc;

/// What the surface (REPL, or an embedding caller) shows or speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: String,
    /// True when the session is waiting for a yes/no answer.
    pub pending_confirm: bool,
    /// True when the user asked to leave.
    pub exit: bool,
}

impl Reply {
    fn say(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            pending_confirm: false,
            exit: false,
        }
    }
}

/// Words accepted as a confirmation answer.
const AFFIRMATIVE: [&str; 7] = ["yes", "y", "yeah", "sure", "ok", "okay", "confirm"];

/// A dispatch session: one user's conversation with the assistant.
///
/// Holds at most one pending confirmation. The parser itself stays
/// stateless; this is the only place turn-to-turn state lives.
pub struct Session {
    store: TaskStore,
    runner: Arc<dyn ActionRunner>,
    config: Config,
    pending: Option<Command>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_parts(config, TaskStore::new(), Arc::new(LogRunner))
    }

    pub fn with_parts(config: Config, store: TaskStore, runner: Arc<dyn ActionRunner>) -> Self {
        Self {
            store,
            runner,
            config,
            pending: None,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Feed one utterance in. If a confirmation is pending, the text is the
    /// answer; otherwise it is parsed and dispatched.
    pub async fn submit(&mut self, text: &str) -> Reply {
        if let Some(pending) = self.pending.take() {
            return if is_affirmative(text) {
                self.execute(pending).await
            } else {
                Reply::say("Cancelled.")
            };
        }
        let command = parser::parse(text);
        self.dispatch(command).await
    }

    /// Dispatch an already-parsed command, applying the confirmation gate.
    pub async fn dispatch(&mut self, command: Command) -> Reply {
        if command.needs_confirm && !self.config.repl.auto_confirm {
            let prompt = confirm_prompt(&command);
            self.pending = Some(command);
            return Reply {
                message: prompt,
                pending_confirm: true,
                exit: false,
            };
        }
        self.execute(command).await
    }

    async fn execute(&self, command: Command) -> Reply {
        let Some(intent) = command.intent else {
            return Reply::say("Sorry, I didn't catch that.");
        };
        let target = command.target;

        match intent {
            Intent::OpenFile => match target {
                Some(path) => self.run_system(SystemAction::OpenFile(path)),
                None => Reply::say("Which file?"),
            },
            Intent::OpenApp => match target {
                Some(app) => self.run_system(SystemAction::OpenApp(app)),
                None => Reply::say("Which app?"),
            },
            Intent::CloseApp => match target {
                Some(app) => self.run_system(SystemAction::CloseApp(app)),
                None => Reply::say("Which app?"),
            },
            Intent::DeleteFile => match target {
                Some(path) => self.run_system(SystemAction::DeleteFile(path)),
                None => Reply::say("Which file?"),
            },
            Intent::SearchFile => match target {
                Some(name) => self.search(&name),
                None => Reply::say("What file should I look for?"),
            },
            Intent::SetVolume => match target.and_then(|t| t.parse::<i64>().ok()) {
                Some(level) => match SystemAction::set_volume(level) {
                    Ok(action) => self.run_system(action),
                    Err(e) => Reply::say(e.to_string()),
                },
                None => Reply::say("What volume level? Try: set volume to 50"),
            },
            Intent::Mute => self.run_system(SystemAction::Mute),
            Intent::Unmute => self.run_system(SystemAction::Unmute),
            Intent::Shutdown => self.run_system(SystemAction::Shutdown),
            Intent::Restart => self.run_system(SystemAction::Restart),
            Intent::Sleep => self.run_system(SystemAction::Sleep),

            Intent::AddTask => match target {
                Some(composite) => self.add_task(&composite).await,
                None => Reply::say("What should the task say?"),
            },
            Intent::ListTasks => self.list_tasks(false).await,
            Intent::ListAllTasks => self.list_tasks(true).await,
            Intent::CompleteTask => match parse_id(target.as_deref()) {
                Some(id) => match self.store.complete(id).await {
                    Ok(task) => Reply::say(format!("Task {} complete: {}", task.id, task.description)),
                    Err(e) => Reply::say(e.to_string()),
                },
                None => Reply::say("Which task number?"),
            },
            Intent::DeleteTask => match parse_id(target.as_deref()) {
                Some(id) => match self.store.delete(id).await {
                    Ok(task) => Reply::say(format!("Task {} deleted", task.id)),
                    Err(e) => Reply::say(e.to_string()),
                },
                None => Reply::say("Which task number?"),
            },
            Intent::TaskCount => {
                let counts = self.store.counts().await;
                let noun = if counts.open == 1 { "task" } else { "tasks" };
                Reply::say(format!(
                    "You have {} open {} ({} total)",
                    counts.open, noun, counts.total
                ))
            }

            Intent::Exit => Reply {
                message: "Goodbye.".to_string(),
                pending_confirm: false,
                exit: true,
            },
        }
    }

    /// Plan an action for the current platform and hand it to the runner.
    fn run_system(&self, action: SystemAction) -> Reply {
        let platform = match Platform::current() {
            Ok(p) => p,
            Err(e) => return Reply::say(e.to_string()),
        };
        let spec = match action.command(platform) {
            Ok(spec) => spec,
            Err(e) => return Reply::say(e.to_string()),
        };
        match self.runner.run(&action, &spec) {
            Ok(message) => Reply::say(message),
            Err(e) => Reply::say(e.to_string()),
        }
    }

    fn search(&self, name: &str) -> Reply {
        let roots = self.config.search_roots();
        let matches = search::search_file(name, &roots, self.config.search.max_results);
        if matches.is_empty() {
            return Reply::say(format!("No files matching {name} found"));
        }
        let mut lines = vec![format!("Found {} match(es):", matches.len())];
        lines.extend(matches.iter().map(|p| format!("  {}", p.display())));
        Reply::say(lines.join("\n"))
    }

    /// Split the composite `"<description>|<priority>"` target and insert.
    async fn add_task(&self, composite: &str) -> Reply {
        let (description, priority) = match composite.rsplit_once('|') {
            Some((desc, prio)) => (desc, prio.parse::<Priority>().unwrap_or_default()),
            None => (composite, Priority::Normal),
        };
        let task = self.store.add(description, priority).await;
        let suffix = match task.priority {
            Priority::Normal => String::new(),
            other => format!(" ({other} priority)"),
        };
        Reply::say(format!("Added task {}: {}{}", task.id, task.description, suffix))
    }

    async fn list_tasks(&self, all: bool) -> Reply {
        let tasks = self.store.list(all).await;
        if tasks.is_empty() {
            return Reply::say(if all { "No tasks yet." } else { "No open tasks." });
        }
        let lines: Vec<String> = tasks.iter().map(format_task).collect();
        Reply::say(lines.join("\n"))
    }
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!(
        "{}. [{}] {} ({})",
        task.id, mark, task.description, task.priority
    )
}

fn parse_id(target: Option<&str>) -> Option<i64> {
    target.and_then(|t| t.parse().ok())
}

fn is_affirmative(text: &str) -> bool {
    let answer = text.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

/// Confirmation prompt naming the effect the user is about to cause.
fn confirm_prompt(command: &Command) -> String {
    let effect = match (command.intent, command.target.as_deref()) {
        (Some(Intent::DeleteFile), Some(path)) => format!("permanently delete {path}"),
        (Some(Intent::DeleteTask), Some(id)) => format!("delete task {id}"),
        (Some(Intent::DeleteTask), None) => "delete a task".to_string(),
        (Some(Intent::Shutdown), _) => "shut down the computer".to_string(),
        (Some(Intent::Restart), _) => "restart the computer".to_string(),
        (Some(Intent::Sleep), _) => "put the computer to sleep".to_string(),
        _ => "do that".to_string(),
    };
    format!("This will {effect}. Are you sure? (yes/no)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{CommandSpec, SystemError};
    use std::sync::Mutex;

    /// Runner that records every plan it is handed.
    #[derive(Default)]
    struct RecordingRunner {
        plans: Mutex<Vec<CommandSpec>>,
    }

    impl ActionRunner for RecordingRunner {
        fn run(&self, action: &SystemAction, spec: &CommandSpec) -> Result<String, SystemError> {
            self.plans
                .lock()
                .expect("lock")
                .push(spec.clone());
            Ok(action.acknowledgement())
        }
    }

    fn session_with_runner() -> (Session, Arc<RecordingRunner>) {
        let runner = Arc::new(RecordingRunner::default());
        let session = Session::with_parts(Config::default(), TaskStore::new(), runner.clone());
        (session, runner)
    }

    #[tokio::test]
    async fn test_confirmation_yes_executes() {
        let (mut session, runner) = session_with_runner();

        let reply = session.submit("shut down the computer").await;
        assert!(reply.pending_confirm);
        assert!(reply.message.contains("shut down"));
        assert!(runner.plans.lock().expect("lock").is_empty());

        let reply = session.submit("yes").await;
        assert_eq!(reply.message, "Shutting down");
        assert!(!reply.pending_confirm);
        assert_eq!(runner.plans.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn test_confirmation_anything_else_cancels() {
        let (mut session, runner) = session_with_runner();

        session.submit("delete file old_report.pdf").await;
        let reply = session.submit("actually no").await;
        assert_eq!(reply.message, "Cancelled.");
        assert!(runner.plans.lock().expect("lock").is_empty());

        // The pending slot is cleared; the next utterance parses normally.
        let reply = session.submit("yes").await;
        assert_eq!(reply.message, "Sorry, I didn't catch that.");
    }

    #[tokio::test]
    async fn test_auto_confirm_skips_prompt() {
        let mut config = Config::default();
        config.repl.auto_confirm = true;
        let runner = Arc::new(RecordingRunner::default());
        let mut session = Session::with_parts(config, TaskStore::new(), runner.clone());

        let reply = session.submit("restart the machine").await;
        assert!(!reply.pending_confirm);
        assert_eq!(reply.message, "Restarting");
        assert_eq!(runner.plans.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn test_task_lifecycle_through_dispatch() {
        let (mut session, _) = session_with_runner();

        let reply = session.submit("add a high priority task buy milk").await;
        assert_eq!(reply.message, "Added task 1: buy milk (high priority)");

        let reply = session.submit("add a task water plants").await;
        assert_eq!(reply.message, "Added task 2: water plants");

        let reply = session.submit("list my tasks").await;
        assert_eq!(
            reply.message,
            "1. [ ] buy milk (high)\n2. [ ] water plants (normal)"
        );

        let reply = session.submit("complete task 1").await;
        assert_eq!(reply.message, "Task 1 complete: buy milk");

        let reply = session.submit("list my tasks").await;
        assert_eq!(reply.message, "2. [ ] water plants (normal)");

        let reply = session.submit("show all tasks").await;
        assert_eq!(
            reply.message,
            "1. [x] buy milk (high)\n2. [ ] water plants (normal)"
        );

        let reply = session.submit("how many tasks do i have").await;
        assert_eq!(reply.message, "You have 1 open task (2 total)");

        let reply = session.submit("delete task 2").await;
        assert!(reply.pending_confirm);
        let reply = session.submit("yes").await;
        assert_eq!(reply.message, "Task 2 deleted");
    }

    #[tokio::test]
    async fn test_missing_task_is_reported_not_fatal() {
        let (mut session, _) = session_with_runner();
        let reply = session.submit("complete task 42").await;
        assert_eq!(reply.message, "Task not found: 42");
    }

    #[tokio::test]
    async fn test_volume_replies() {
        let (mut session, _) = session_with_runner();

        let reply = session.submit("turn volume down").await;
        assert_eq!(reply.message, "What volume level? Try: set volume to 50");

        if Platform::current() != Ok(Platform::Windows) {
            let reply = session.submit("set the volume to 75").await;
            assert_eq!(reply.message, "Volume set to 75");
        }
    }

    #[tokio::test]
    async fn test_clarifying_replies_for_bare_task_verbs() {
        let (mut session, _) = session_with_runner();

        let reply = session.submit("add task").await;
        assert_eq!(reply.message, "What should the task say?");

        let reply = session.submit("mark task done").await;
        assert_eq!(reply.message, "Which task number?");
    }

    #[tokio::test]
    async fn test_unknown_and_exit() {
        let (mut session, _) = session_with_runner();

        let reply = session.submit("what is the weather").await;
        assert_eq!(reply.message, "Sorry, I didn't catch that.");
        assert!(!reply.exit);

        let reply = session.submit("exit").await;
        assert!(reply.exit);
    }

    #[test]
    fn test_affirmative_answers() {
        for word in ["yes", "Y", " Yeah ", "OK", "sure"] {
            assert!(is_affirmative(word), "{word} should confirm");
        }
        for word in ["no", "nope", "cancel", "yes please"] {
            assert!(!is_affirmative(word), "{word} should cancel");
        }
    }
}
