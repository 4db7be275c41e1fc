//! Core task domain model.
//!
//! Defines the persisted `Task` entity together with the input shapes used
//! by the rest of the system: `NewTask` for validated create requests,
//! `TaskPatch` for partial updates, and `TaskFilter` for list queries.
//!
//! Status and priority are closed sum types with a single canonical string
//! mapping (`as_str`/`parse`) shared by serde and the storage layer, so the
//! wire representation and the persisted representation cannot drift apart.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Workflow state of a task. Never null; new tasks default to `Pending`.
///
/// The implied workflow is PENDING → IN_PROGRESS → COMPLETED, with
/// CANCELLED reachable from PENDING or IN_PROGRESS. No transition guard is
/// enforced: any value may be set at any time. If enforcement is ever
/// wanted, it belongs in the service layer, not here or in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Canonical names, in declaration order.
    pub const NAMES: &'static [&'static str] = &["PENDING", "IN_PROGRESS", "COMPLETED", "CANCELLED"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parses the canonical representation. Case-sensitive exact match.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(TaskStatus::Pending),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "COMPLETED" => Some(TaskStatus::Completed),
            "CANCELLED" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).ok_or_else(|| de::Error::unknown_variant(&value, Self::NAMES))
    }
}

/// Optional task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const NAMES: &'static [&'static str] = &["LOW", "MEDIUM", "HIGH"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }

    /// Parses the canonical representation. Case-sensitive exact match.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOW" => Some(TaskPriority::Low),
            "MEDIUM" => Some(TaskPriority::Medium),
            "HIGH" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

impl Serialize for TaskPriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskPriority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).ok_or_else(|| de::Error::unknown_variant(&value, Self::NAMES))
    }
}

/// A persisted task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Database-assigned identifier, immutable after creation.
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful mutation; always >= `created_at`.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a create request. Produced only by the validation
/// layer; `status` is already defaulted to `Pending` when it was absent.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// One field of a partial update.
///
/// Distinguishes "not supplied" from "supplied as null": `Keep` leaves the
/// stored value untouched, `Clear` nulls it out, `Set` replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

/// Validated fields for a partial update.
///
/// `title` and `status` are not nullable, so they are plain options; the
/// nullable fields carry the full tri-state [`Patch`].
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub description: Patch<String>,
    pub priority: Patch<TaskPriority>,
    pub due_date: Patch<DateTime<Utc>>,
}

impl TaskPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.status.is_none() && self.description.is_keep() && self.priority.is_keep() && self.due_date.is_keep()
    }
}

/// Equality filters for listing tasks. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}
