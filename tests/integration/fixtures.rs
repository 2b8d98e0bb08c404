//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - A temporary state directory wired through `TASKDECK_DIR`
//! - Task and user builders
//! - Preconfigured models on either side of the auth boundary

use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::TempDir;

use chrono::Utc;
use taskdeck::api::{Task, TaskPriority, TaskStatus, User};
use taskdeck::config::Config;
use taskdeck::session::SessionStore;
use taskdeck::tea::Model;

/// Serializes tests that touch the `TASKDECK_DIR` environment variable.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// A temporary taskdeck state directory. While alive, `TASKDECK_DIR`
/// points at it and no other env-dependent test can run.
pub struct StateDir {
    _guard: MutexGuard<'static, ()>,
    temp_dir: TempDir,
}

impl StateDir {
    pub fn new() -> Self {
        let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::env::set_var("TASKDECK_DIR", temp_dir.path());
        Self {
            _guard: guard,
            temp_dir,
        }
    }

    pub fn token_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("token")
    }
}

impl Drop for StateDir {
    fn drop(&mut self) {
        std::env::remove_var("TASKDECK_DIR");
    }
}

pub fn user(id: i64, name: &str) -> User {
    User {
        id,
        username: name.to_string(),
        email: format!("{}@example.com", name),
    }
}

pub fn task(id: i64, title: &str, status: TaskStatus, ordering: i64) -> Task {
    let now = Utc::now();
    Task {
        id,
        title: title.to_string(),
        description: "a task".to_string(),
        status,
        priority: TaskPriority::Normal,
        due_date: None,
        created_by: None,
        assigned_to: None,
        ordering,
        created_at: now,
        updated_at: now,
    }
}

/// Model without a stored token - starts on the login screen.
pub fn unauthenticated_model() -> Model {
    Model::new(Config::default(), Arc::new(SessionStore::ephemeral(None)))
}

/// Model with an in-memory token - starts on the board.
pub fn authenticated_model() -> Model {
    Model::new(
        Config::default(),
        Arc::new(SessionStore::ephemeral(Some("test-token".to_string()))),
    )
}
