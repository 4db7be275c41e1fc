//! Payload validation for create and update requests.
//!
//! Turns untyped JSON objects into the strongly-typed shapes the repository
//! consumes, or an ordered list of field-level violations. Validation is a
//! pure function of its input: it never touches storage, and it collects
//! every violation instead of stopping at the first one. Violations are
//! reported in field order (title, description, status, priority, due_date).
//!
//! ## Update semantics
//!
//! Updates are partial. A key that is absent leaves the stored value
//! untouched; a key present with `null` clears a nullable field; a key with
//! a value replaces it. `title` and `status` are not nullable, so an
//! explicit `null` for either is a violation rather than a clear.

use crate::libs::task::{NewTask, Patch, TaskFilter, TaskPatch, TaskPriority, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Maximum accepted title length, in characters.
pub const TITLE_MAX_LEN: usize = 255;

/// The kind of constraint a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    MissingField,
    FieldEmpty,
    FieldTooLong,
    InvalidEnumValue,
    InvalidDate,
    EmptyUpdate,
    MalformedPayload,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::MissingField => "MISSING_FIELD",
            ViolationKind::FieldEmpty => "FIELD_EMPTY",
            ViolationKind::FieldTooLong => "FIELD_TOO_LONG",
            ViolationKind::InvalidEnumValue => "INVALID_ENUM_VALUE",
            ViolationKind::InvalidDate => "INVALID_DATE",
            ViolationKind::EmptyUpdate => "EMPTY_UPDATE",
            ViolationKind::MalformedPayload => "MALFORMED_PAYLOAD",
        };
        f.write_str(name)
    }
}

/// A single rejected field, tagged with the constraint it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub violation: ViolationKind,
}

impl FieldViolation {
    pub fn new(field: &'static str, violation: ViolationKind) -> Self {
        Self { field, violation }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.violation)
    }
}

/// Validates a create payload into a [`NewTask`].
///
/// `title` is required, trimmed, non-empty, and at most [`TITLE_MAX_LEN`]
/// characters. `status` defaults to `PENDING` when absent. `priority` and
/// `due_date` accept explicit `null`.
pub fn validate_create(payload: &Map<String, Value>) -> Result<NewTask, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let title = match payload.get("title") {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new("title", ViolationKind::MissingField));
            None
        }
        Some(Value::String(raw)) => check_title(raw, &mut violations),
        Some(_) => {
            violations.push(FieldViolation::new("title", ViolationKind::FieldEmpty));
            None
        }
    };

    let description = match payload.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            violations.push(FieldViolation::new("description", ViolationKind::FieldEmpty));
            None
        }
    };

    let status = match payload.get("status") {
        None => TaskStatus::Pending,
        Some(value) => check_enum("status", value, TaskStatus::parse, &mut violations).unwrap_or(TaskStatus::Pending),
    };

    let priority = match payload.get("priority") {
        None | Some(Value::Null) => None,
        Some(value) => check_enum("priority", value, TaskPriority::parse, &mut violations),
    };

    let due_date = match payload.get("due_date") {
        None | Some(Value::Null) => None,
        Some(value) => check_due_date(value, &mut violations),
    };

    match title {
        Some(title) if violations.is_empty() => Ok(NewTask {
            title,
            description,
            status,
            priority,
            due_date,
        }),
        _ => Err(violations),
    }
}

/// Validates an update payload into a [`TaskPatch`].
///
/// All fields are optional, but at least one recognized field must be
/// present; otherwise the payload is rejected with a single `EMPTY_UPDATE`
/// violation. Unrecognized keys are ignored.
pub fn validate_update(payload: &Map<String, Value>) -> Result<TaskPatch, Vec<FieldViolation>> {
    let mut violations = Vec::new();
    let mut patch = TaskPatch::default();
    let mut recognized = false;

    if let Some(value) = payload.get("title") {
        recognized = true;
        match value {
            Value::String(raw) => patch.title = check_title(raw, &mut violations),
            // Title is required on the record itself, so it cannot be cleared.
            _ => violations.push(FieldViolation::new("title", ViolationKind::FieldEmpty)),
        }
    }

    if let Some(value) = payload.get("description") {
        recognized = true;
        match value {
            Value::Null => patch.description = Patch::Clear,
            Value::String(text) => patch.description = Patch::Set(text.clone()),
            _ => violations.push(FieldViolation::new("description", ViolationKind::FieldEmpty)),
        }
    }

    if let Some(value) = payload.get("status") {
        recognized = true;
        // Status is never null; an explicit null is not a clear.
        patch.status = check_enum("status", value, TaskStatus::parse, &mut violations);
    }

    if let Some(value) = payload.get("priority") {
        recognized = true;
        match value {
            Value::Null => patch.priority = Patch::Clear,
            other => {
                if let Some(priority) = check_enum("priority", other, TaskPriority::parse, &mut violations) {
                    patch.priority = Patch::Set(priority);
                }
            }
        }
    }

    if let Some(value) = payload.get("due_date") {
        recognized = true;
        match value {
            Value::Null => patch.due_date = Patch::Clear,
            other => {
                if let Some(due_date) = check_due_date(other, &mut violations) {
                    patch.due_date = Patch::Set(due_date);
                }
            }
        }
    }

    if !recognized {
        return Err(vec![FieldViolation::new("payload", ViolationKind::EmptyUpdate)]);
    }
    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(violations)
    }
}

/// Validates list-query filter values.
pub fn validate_filter(status: Option<&str>, priority: Option<&str>) -> Result<TaskFilter, Vec<FieldViolation>> {
    let mut violations = Vec::new();
    let mut filter = TaskFilter::default();

    if let Some(raw) = status {
        match TaskStatus::parse(raw) {
            Some(status) => filter.status = Some(status),
            None => violations.push(FieldViolation::new("status", ViolationKind::InvalidEnumValue)),
        }
    }
    if let Some(raw) = priority {
        match TaskPriority::parse(raw) {
            Some(priority) => filter.priority = Some(priority),
            None => violations.push(FieldViolation::new("priority", ViolationKind::InvalidEnumValue)),
        }
    }

    if violations.is_empty() {
        Ok(filter)
    } else {
        Err(violations)
    }
}

fn check_title(raw: &str, violations: &mut Vec<FieldViolation>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        violations.push(FieldViolation::new("title", ViolationKind::FieldEmpty));
        None
    } else if trimmed.chars().count() > TITLE_MAX_LEN {
        violations.push(FieldViolation::new("title", ViolationKind::FieldTooLong));
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn check_enum<T>(field: &'static str, value: &Value, parse: fn(&str) -> Option<T>, violations: &mut Vec<FieldViolation>) -> Option<T> {
    match value {
        Value::String(raw) => match parse(raw) {
            Some(parsed) => Some(parsed),
            None => {
                violations.push(FieldViolation::new(field, ViolationKind::InvalidEnumValue));
                None
            }
        },
        _ => {
            violations.push(FieldViolation::new(field, ViolationKind::InvalidEnumValue));
            None
        }
    }
}

fn check_due_date(value: &Value, violations: &mut Vec<FieldViolation>) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => match parse_due_date(raw) {
            Some(parsed) => Some(parsed),
            None => {
                violations.push(FieldViolation::new("due_date", ViolationKind::InvalidDate));
                None
            }
        },
        _ => {
            violations.push(FieldViolation::new("due_date", ViolationKind::InvalidDate));
            None
        }
    }
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
