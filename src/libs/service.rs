//! Task use-case orchestration.
//!
//! `TaskService` sequences validation and repository calls for each of the
//! five operations and translates every failure into the [`TaskError`]
//! taxonomy. Validation always runs before any storage access, so malformed
//! input never produces a partial write.

use crate::db::tasks::Tasks;
use crate::libs::config::Config;
use crate::libs::task::{Task, TaskFilter};
use crate::libs::validation::{self, FieldViolation};
use serde_json::{Map, Value};
use thiserror::Error;

/// Every failure a task operation can surface.
///
/// `NotFound` is a first-class, expected outcome and is never folded into a
/// generic error. `Storage` failures are surfaced immediately, not retried.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("task {0} not found")]
    NotFound(i64),
    #[error("storage error: {0}")]
    Storage(anyhow::Error),
    #[error("request timed out")]
    Timeout,
}

impl From<rusqlite::Error> for TaskError {
    fn from(err: rusqlite::Error) -> Self {
        TaskError::Storage(err.into())
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        TaskError::Storage(err)
    }
}

/// Orchestrates validation and repository access for task use cases.
///
/// The status workflow (PENDING → IN_PROGRESS → COMPLETED, CANCELLED from
/// either) is advisory: no transition guard is enforced, and any client may
/// set any status directly. A guard, if ever added, belongs here.
pub struct TaskService {
    tasks: Tasks,
}

impl TaskService {
    /// Opens the task store named by the configuration, applying any
    /// pending schema migrations.
    pub fn new(config: &Config) -> Result<Self, TaskError> {
        let tasks = Tasks::with_db_file(config.db_file())?;
        Ok(TaskService { tasks })
    }

    /// Validates a create payload and inserts the task.
    pub fn create_task(&mut self, payload: &Map<String, Value>) -> Result<Task, TaskError> {
        let new_task = validation::validate_create(payload).map_err(TaskError::Validation)?;
        let task = self.tasks.create(&new_task)?;
        tracing::info!(id = task.id, status = task.status.as_str(), "task created");
        Ok(task)
    }

    /// Validates a partial-update payload and applies it.
    pub fn update_task(&mut self, id: i64, payload: &Map<String, Value>) -> Result<Task, TaskError> {
        let patch = validation::validate_update(payload).map_err(TaskError::Validation)?;
        let task = self.tasks.update(id, &patch)?;
        tracing::info!(id = task.id, "task updated");
        Ok(task)
    }

    /// Deletes the task permanently, returning the removed id.
    pub fn remove_task(&mut self, id: i64) -> Result<i64, TaskError> {
        self.tasks.delete(id)?;
        tracing::info!(id, "task deleted");
        Ok(id)
    }

    pub fn get_task(&mut self, id: i64) -> Result<Task, TaskError> {
        self.tasks.get_by_id(id)
    }

    pub fn list_tasks(&mut self, filter: &TaskFilter) -> Result<Vec<Task>, TaskError> {
        self.tasks.fetch(filter)
    }
}
