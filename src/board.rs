//! Three-column task board.
//!
//! The board owns its tasks. Status changes that cross the Done boundary
//! come back as a [`CompletionDelta`] which the caller forwards to the
//! metrics counter; nothing else on the board touches metrics.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Task, TaskStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("title required")]
    BlankTitle,
    #[error("task not found: {0}")]
    NotFound(String),
}

/// Change in the number of Done tasks caused by one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionDelta {
    Completed,
    Reopened,
}

impl CompletionDelta {
    // Delta for a single status transition, if it crosses the Done boundary
    pub fn between(old: TaskStatus, new: TaskStatus) -> Option<Self> {
        match (old.is_done(), new.is_done()) {
            (false, true) => Some(CompletionDelta::Completed),
            (true, false) => Some(CompletionDelta::Reopened),
            _ => None,
        }
    }

    pub fn as_delta(self) -> i64 {
        match self {
            CompletionDelta::Completed => 1,
            CompletionDelta::Reopened => -1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    tasks: Vec<Task>,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_in(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.status == status)
    }

    // (done, total) for the board header
    pub fn completed_count(&self) -> (usize, usize) {
        (self.tasks_in(TaskStatus::Done).count(), self.tasks.len())
    }

    pub fn add_task(&mut self, title: &str) -> Result<Task, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::BlankTitle);
        }
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            status: TaskStatus::Todo,
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn rename_task(&mut self, id: &str, title: &str) -> Result<Task, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::BlankTitle);
        }
        let task = self.find_mut(id)?;
        task.title = title.to_string();
        Ok(task.clone())
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Task, BoardError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        removed
    }

    /// Move a task to another column. Returns the updated task and the
    /// Done-boundary crossing, if any.
    pub fn move_task(
        &mut self,
        id: &str,
        status: TaskStatus,
    ) -> Result<(Task, Option<CompletionDelta>), BoardError> {
        let task = self.find_mut(id)?;
        let delta = CompletionDelta::between(task.status, status);
        task.status = status;
        Ok((task.clone(), delta))
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task, BoardError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))
    }
}
