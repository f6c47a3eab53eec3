//! In-progress task list.
//!
//! Tasks are kept in insertion order. A task is referenced by the id it
//! receives when added; removing an unknown id is a no-op.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Task priority, 1 (lowest) to 5 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::invalid_input(
                "priority",
                format!("{value} is outside {}..={}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Priority {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable reference to a task in the store.
pub type TaskId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub priority: Priority,
}

/// Ordered task list.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. Fails with `InvalidInput` on a blank title or a
    /// priority outside 1..=5, leaving the store untouched.
    pub fn add_task(&mut self, title: &str, priority: u8) -> Result<Task> {
        if title.trim().is_empty() {
            return Err(CoreError::invalid_input("title", "must not be empty"));
        }
        let priority = Priority::new(priority)?;

        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            priority,
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Remove the referenced task, returning it if it was present.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn top_priority(&self) -> Option<&Task> {
        top_priority(&self.tasks)
    }
}

/// Highest-priority task; on ties the earliest one wins.
pub fn top_priority(tasks: &[Task]) -> Option<&Task> {
    tasks.iter().fold(None, |best: Option<&Task>, task| match best {
        Some(current) if current.priority >= task.priority => Some(current),
        _ => Some(task),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_insertion_order() {
        let mut store = TaskStore::new();
        store.add_task("write report", 2).unwrap();
        store.add_task("review PR", 5).unwrap();
        store.add_task("write report", 2).unwrap();

        let titles: Vec<_> = store.list().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["write report", "review PR", "write report"]);
    }

    #[test]
    fn rejects_blank_title_and_bad_priority() {
        let mut store = TaskStore::new();
        assert!(store.add_task("", 3).unwrap_err().is_invalid_input());
        assert!(store.add_task("   ", 3).unwrap_err().is_invalid_input());
        assert!(store.add_task("x", 0).unwrap_err().is_invalid_input());
        assert!(store.add_task("x", 6).unwrap_err().is_invalid_input());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut store = TaskStore::new();
        let task = store.add_task("a", 1).unwrap();
        assert!(store.remove_task(Uuid::new_v4()).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove_task(task.id), Some(task.clone()));
        assert!(store.remove_task(task.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_only_touches_the_referenced_duplicate() {
        let mut store = TaskStore::new();
        let first = store.add_task("same", 3).unwrap();
        let second = store.add_task("same", 3).unwrap();
        store.remove_task(first.id);
        assert_eq!(store.list(), [second]);
    }

    #[test]
    fn top_priority_breaks_ties_by_first_occurrence() {
        let mut store = TaskStore::new();
        assert!(store.top_priority().is_none());
        store.add_task("A", 2).unwrap();
        let b = store.add_task("B", 5).unwrap();
        store.add_task("C", 5).unwrap();
        assert_eq!(store.top_priority(), Some(&b));
    }

    #[test]
    fn priority_serializes_as_number() {
        let p = Priority::new(4).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "4");
        assert!(serde_json::from_str::<Priority>("9").is_err());
        assert_eq!(Priority::default().value(), 3);
    }
}
