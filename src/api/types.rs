//! Wire types for the task backend.
//!
//! Shapes mirror the backend's serializers exactly; the client never
//! invents fields. Tasks are owned by the server and fully replaced on
//! every fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task status, one of three fixed values. Doubles as the board column key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in board column order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Column index on the board.
    pub fn column(&self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl TaskPriority {
    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Normal => "Normal",
            TaskPriority::High => "High",
        }
    }

    /// Cycle order used by the task form.
    pub fn next(&self) -> TaskPriority {
        match self {
            TaskPriority::Low => TaskPriority::Normal,
            TaskPriority::Normal => TaskPriority::High,
            TaskPriority::High => TaskPriority::Low,
        }
    }

    pub fn prev(&self) -> TaskPriority {
        match self {
            TaskPriority::Low => TaskPriority::High,
            TaskPriority::Normal => TaskPriority::Low,
            TaskPriority::High => TaskPriority::Normal,
        }
    }
}

/// A user, read-only from the client's perspective. Used as the
/// assignee picklist and for card bylines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// A task as the backend serializes it. The client holds a transient,
/// fully replaceable copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub assigned_to: Option<User>,
    #[serde(default)]
    pub ordering: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for task create (POST) and full update (PUT). The server assigns
/// ordering on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<i64>,
}

/// Body for a board move (PATCH): only the fields a move can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMove {
    pub status: TaskStatus,
    pub ordering: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response from login and register. The refresh token is carried on the
/// wire but the client never exchanges it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<User>,
    pub access: String,
    #[serde(default)]
    pub refresh: String,
}

/// Flatten a backend auth-error payload into one displayable line.
///
/// The backend answers either `{"detail": "..."}` or a per-field map
/// like `{"username": ["taken"], "email": ["invalid"]}`. Anything else
/// falls back to a generic message.
pub fn flatten_auth_error(body: &str) -> String {
    const FALLBACK: &str = "Authentication failed. Try again.";

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return FALLBACK.to_string();
    };
    let Some(map) = value.as_object() else {
        return FALLBACK.to_string();
    };

    if let Some(detail) = map.get("detail").and_then(|d| d.as_str()) {
        return detail.to_string();
    }

    let mut parts = Vec::new();
    for (field, messages) in map {
        let joined = match messages {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            serde_json::Value::String(s) => s.clone(),
            _ => continue,
        };
        if !joined.is_empty() {
            parts.push(format!("{}: {}", field, joined));
        }
    }

    if parts.is_empty() {
        FALLBACK.to_string()
    } else {
        parts.join("  ")
    }
}
