//! End-to-End Session Flows
//!
//! Drives a whole conversation through [`Session::submit`], checking the
//! confirmation gate, the task store effects, and the replies a voice
//! frontend would speak.

use crate::config::Config;
use crate::dispatch::Session;
use crate::parser::{Command, Intent};
use crate::system::{ActionRunner, CommandSpec, SystemAction, SystemError};
use crate::tasks::TaskStore;
use std::sync::{Arc, Mutex};

/// Runner that records rendered command lines instead of executing them.
#[derive(Default)]
struct PlanLog(Mutex<Vec<String>>);

impl ActionRunner for PlanLog {
    fn run(&self, action: &SystemAction, spec: &CommandSpec) -> Result<String, SystemError> {
        self.0.lock().expect("lock").push(spec.to_string());
        Ok(action.acknowledgement())
    }
}

fn new_session() -> (Session, TaskStore, Arc<PlanLog>) {
    let store = TaskStore::new();
    let log = Arc::new(PlanLog::default());
    let session = Session::with_parts(Config::default(), store.clone(), log.clone());
    (session, store, log)
}

#[tokio::test]
async fn test_full_conversation() {
    let (mut session, store, log) = new_session();

    let reply = session.submit("please open spotify").await;
    assert_eq!(reply.message, "Opened spotify");
    assert!(log.0.lock().expect("lock")[0].contains("spotify"));

    let reply = session.submit("create a new task send the invoices").await;
    assert_eq!(reply.message, "Added task 1: send invoices");

    // Declining a confirmation leaves the task alone.
    let reply = session.submit("delete task 1").await;
    assert!(reply.pending_confirm);
    let reply = session.submit("no").await;
    assert_eq!(reply.message, "Cancelled.");
    assert!(store.get(1).await.is_ok());

    // Accepting it removes the task.
    session.submit("delete task 1").await;
    let reply = session.submit("yes").await;
    assert_eq!(reply.message, "Task 1 deleted");
    assert!(store.get(1).await.is_err());

    let reply = session.submit("exit").await;
    assert_eq!(reply.message, "Goodbye.");
    assert!(reply.exit);
}

#[tokio::test]
async fn test_unknown_speech_is_harmless() {
    let (mut session, _, log) = new_session();

    for noise in ["uh", "what was that", "please the for me", ""] {
        let reply = session.submit(noise).await;
        assert_eq!(reply.message, "Sorry, I didn't catch that.");
        assert!(!reply.pending_confirm);
        assert!(!reply.exit);
    }
    assert!(log.0.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn test_embedded_commands_dispatch_without_parsing() {
    // Callers that already hold a structured command skip the parser.
    let (mut session, _, _) = new_session();

    let command = Command {
        intent: Some(Intent::AddTask),
        target: Some("ship the release|high".to_string()),
        needs_confirm: false,
    };
    let reply = session.dispatch(command).await;
    assert_eq!(reply.message, "Added task 1: ship the release (high priority)");
}

#[tokio::test]
async fn test_search_scoped_to_configured_roots() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("invoice.pdf"), "").expect("write");

    let config = Config {
        search: crate::config::SearchConfig {
            paths: vec![dir.path().to_string_lossy().into_owned()],
            max_results: 10,
        },
        repl: crate::config::ReplConfig::default(),
    };
    let mut session = Session::with_parts(config, TaskStore::new(), Arc::new(PlanLog::default()));

    let reply = session.submit("find the file invoice.pdf").await;
    assert!(reply.message.contains("Found 1 match(es):"));
    assert!(reply.message.contains("invoice.pdf"));

    let reply = session.submit("find missing-thing.qqq").await;
    assert_eq!(reply.message, "No files matching missing-thing.qqq found");
}
