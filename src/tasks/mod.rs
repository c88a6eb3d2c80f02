//! Task Store
//!
//! In-memory store backing the task intents. Tasks carry an integer id,
//! a description, a priority, and completion timestamps. The store is a
//! cheap-to-clone handle around `Arc<RwLock<…>>`; production deployments
//! would swap in SQLite behind the same surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Task priority. Parsed from and displayed as the lowercase word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            other => Err(TaskError::InvalidPriority(other.to_string())),
        }
    }
}

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Open vs. total task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub open: usize,
    pub total: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(i64),
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),
}

#[derive(Default)]
struct StoreInner {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

/// Handle to the shared in-memory task store.
#[derive(Clone, Default)]
pub struct TaskStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new task. Ids are 1-based and never reused within the
    /// store's lifetime, matching an autoincrement primary key.
    pub async fn add(&self, description: &str, priority: Priority) -> Task {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let task = Task {
            id: inner.next_id,
            description: description.to_string(),
            priority,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        inner.tasks.insert(task.id, task.clone());
        tracing::info!(id = task.id, priority = %task.priority, "task added");
        task
    }

    pub async fn get(&self, id: i64) -> Result<Task, TaskError> {
        let inner = self.inner.read().await;
        inner.tasks.get(&id).cloned().ok_or(TaskError::NotFound(id))
    }

    /// Tasks ordered by id. With `all = false`, completed tasks are
    /// filtered out.
    pub async fn list(&self, all: bool) -> Vec<Task> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .values()
            .filter(|t| all || !t.completed)
            .cloned()
            .collect()
    }

    /// Mark a task complete and stamp `completed_at`. Completing a task
    /// that is already complete leaves it untouched.
    pub async fn complete(&self, id: i64) -> Result<Task, TaskError> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        if !task.completed {
            task.completed = true;
            task.completed_at = Some(Utc::now());
            tracing::info!(id, "task completed");
        }
        Ok(task.clone())
    }

    /// Remove a task permanently.
    pub async fn delete(&self, id: i64) -> Result<Task, TaskError> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.remove(&id).ok_or(TaskError::NotFound(id))?;
        tracing::info!(id, "task deleted");
        Ok(task)
    }

    pub async fn counts(&self) -> TaskCounts {
        let inner = self.inner.read().await;
        let total = inner.tasks.len();
        let open = inner.tasks.values().filter(|t| !t.completed).count();
        TaskCounts { open, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_assigns_sequential_ids() {
        let store = TaskStore::new();
        let a = store.add("buy milk", Priority::Normal).await;
        let b = store.add("call dentist", Priority::High).await;
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(!a.completed);
        assert!(a.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = TaskStore::new();
        let a = store.add("one", Priority::Normal).await;
        store.delete(a.id).await.expect("delete");
        let b = store.add("two", Priority::Normal).await;
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_complete_stamps_timestamp_once() {
        let store = TaskStore::new();
        let task = store.add("water plants", Priority::Low).await;

        let done = store.complete(task.id).await.expect("complete");
        assert!(done.completed);
        let stamp = done.completed_at.expect("completed_at set");

        // Completing again is a no-op; the stamp does not move.
        let again = store.complete(task.id).await.expect("complete again");
        assert_eq!(again.completed_at, Some(stamp));
    }

    #[tokio::test]
    async fn test_list_filters_completed() {
        let store = TaskStore::new();
        let a = store.add("open", Priority::Normal).await;
        let b = store.add("done", Priority::Normal).await;
        store.complete(b.id).await.expect("complete");

        let open = store.list(false).await;
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, a.id);

        let all = store.list(true).await;
        assert_eq!(all.len(), 2);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let store = TaskStore::new();
        assert_eq!(store.get(99).await, Err(TaskError::NotFound(99)));
        assert_eq!(store.complete(99).await, Err(TaskError::NotFound(99)));
        assert_eq!(store.delete(99).await, Err(TaskError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_counts() {
        let store = TaskStore::new();
        assert_eq!(store.counts().await, TaskCounts { open: 0, total: 0 });

        store.add("a", Priority::Normal).await;
        let b = store.add("b", Priority::High).await;
        store.complete(b.id).await.expect("complete");

        assert_eq!(store.counts().await, TaskCounts { open: 1, total: 2 });
    }

    #[test]
    fn test_priority_round_trip() {
        for p in [Priority::Low, Priority::Normal, Priority::High] {
            let parsed: Priority = p.to_string().parse().expect("parse");
            assert_eq!(parsed, p);
        }
        assert!("medium".parse::<Priority>().is_err());
    }
}
