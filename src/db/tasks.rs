//! Task persistence operations.
//!
//! Provides the single-record CRUD primitives over the `tasks` table. Each
//! call is a direct round-trip to SQLite; no caching layer sits in between,
//! so reads always reflect the stored state. Concurrent writers to the same
//! record are serialized by the storage engine itself (last write wins on
//! update, first delete wins on delete).

use crate::db::db::Db;
use crate::libs::service::TaskError;
use crate::libs::task::{NewTask, Patch, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus};
use anyhow::Result;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};

/// Insert a new task record.
///
/// `created_at` and `updated_at` are supplied by the caller so both carry
/// the identical creation instant.
const INSERT_TASK: &str =
    "INSERT INTO tasks (title, description, status, priority, due_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Select the full column set in the order [`Tasks::map_task`] expects.
const SELECT_TASKS: &str = "SELECT id, title, description, status, priority, due_date, created_at, updated_at FROM tasks";

/// Find a single task by its identifier.
const SELECT_TASK_BY_ID: &str =
    "SELECT id, title, description, status, priority, due_date, created_at, updated_at FROM tasks WHERE id = ?1";

/// Permanently remove a task record.
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

/// Repository over the `tasks` table.
pub struct Tasks {
    pub conn: Connection,
}

impl Tasks {
    /// Opens the default database file, applying pending migrations.
    pub fn new() -> Result<Tasks> {
        let db = Db::new()?;
        Ok(Tasks { conn: db.conn })
    }

    /// Opens a named database file in the application data directory.
    pub fn with_db_file(file_name: &str) -> Result<Tasks> {
        let db = Db::open(file_name)?;
        Ok(Tasks { conn: db.conn })
    }

    /// Inserts a new record and returns it as stored.
    ///
    /// The identifier is assigned by SQLite; `created_at` and `updated_at`
    /// are both set to the same instant.
    pub fn create(&mut self, new_task: &NewTask) -> Result<Task, TaskError> {
        let now = Utc::now();
        self.conn.execute(
            INSERT_TASK,
            params![
                new_task.title,
                new_task.description,
                new_task.status.as_str(),
                new_task.priority.map(|p| p.as_str()),
                new_task.due_date,
                now,
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_by_id(id)
    }

    /// Fetches a task by id, or `NotFound`.
    pub fn get_by_id(&mut self, id: i64) -> Result<Task, TaskError> {
        self.conn.query_row(SELECT_TASK_BY_ID, params![id], Self::map_task).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => TaskError::NotFound(id),
            other => other.into(),
        })
    }

    /// Fetches tasks matching the filter, in insertion order.
    ///
    /// Both filter fields are optional equality constraints; the result is
    /// unbounded by design (pagination, if any, is the caller's concern).
    pub fn fetch(&mut self, filter: &TaskFilter) -> Result<Vec<Task>, TaskError> {
        let mut sql = String::from(SELECT_TASKS);
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<&str> = Vec::new();

        if let Some(status) = filter.status {
            values.push(status.as_str());
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(priority) = filter.priority {
            values.push(priority.as_str());
            clauses.push(format!("priority = ?{}", values.len()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let task_iter = stmt.query_map(params_from_iter(values), Self::map_task)?;

        let mut tasks = Vec::new();
        for task_result in task_iter {
            tasks.push(task_result?);
        }

        Ok(tasks)
    }

    /// Applies a partial update, leaving unpatched fields untouched.
    ///
    /// `updated_at` is refreshed on every call. Returns `NotFound` when the
    /// id does not exist; a missing record is never created.
    pub fn update(&mut self, id: i64, patch: &TaskPatch) -> Result<Task, TaskError> {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(title) = &patch.title {
            values.push(Box::new(title.clone()));
            sets.push(format!("title = ?{}", values.len()));
        }
        if let Some(status) = patch.status {
            values.push(Box::new(status.as_str()));
            sets.push(format!("status = ?{}", values.len()));
        }
        match &patch.description {
            Patch::Keep => {}
            Patch::Clear => sets.push("description = NULL".to_string()),
            Patch::Set(text) => {
                values.push(Box::new(text.clone()));
                sets.push(format!("description = ?{}", values.len()));
            }
        }
        match &patch.priority {
            Patch::Keep => {}
            Patch::Clear => sets.push("priority = NULL".to_string()),
            Patch::Set(priority) => {
                values.push(Box::new(priority.as_str()));
                sets.push(format!("priority = ?{}", values.len()));
            }
        }
        match &patch.due_date {
            Patch::Keep => {}
            Patch::Clear => sets.push("due_date = NULL".to_string()),
            Patch::Set(due_date) => {
                values.push(Box::new(*due_date));
                sets.push(format!("due_date = ?{}", values.len()));
            }
        }

        values.push(Box::new(Utc::now()));
        sets.push(format!("updated_at = ?{}", values.len()));

        values.push(Box::new(id));
        let sql = format!("UPDATE tasks SET {} WHERE id = ?{}", sets.join(", "), values.len());

        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let affected = self.conn.execute(&sql, params.as_slice())?;
        if affected == 0 {
            return Err(TaskError::NotFound(id));
        }

        self.get_by_id(id)
    }

    /// Permanently removes a record.
    ///
    /// Deleting an id that does not exist, including one already deleted,
    /// is `NotFound` rather than a silent success.
    pub fn delete(&mut self, id: i64) -> Result<(), TaskError> {
        let affected = self.conn.execute(DELETE_TASK, params![id])?;
        if affected == 0 {
            return Err(TaskError::NotFound(id));
        }
        Ok(())
    }

    /// Maps a result row to a [`Task`], decoding the canonical enum strings.
    fn map_task(row: &Row) -> rusqlite::Result<Task> {
        let status: String = row.get(3)?;
        let status = TaskStatus::parse(&status)
            .ok_or_else(|| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, format!("unknown status: {status}").into()))?;

        let priority: Option<String> = row.get(4)?;
        let priority = match priority {
            None => None,
            Some(raw) => Some(
                TaskPriority::parse(&raw)
                    .ok_or_else(|| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, format!("unknown priority: {raw}").into()))?,
            ),
        };

        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            status,
            priority,
            due_date: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}
