use crate::api::TaskPriority;
use crate::board::{Position, COLUMN_COUNT};
use crate::config::DEFAULT_BASE_URL;
use crate::tea::{AuthForm, Notification, Route, TaskForm};
use std::sync::atomic::{AtomicU64, Ordering};

/// View struct for a task card.
///
/// A flat snapshot of the fields a card actually draws, detached from
/// the model so the render thread never borrows it.
#[derive(Debug, Clone)]
pub struct TaskView {
    pub id: i64,
    pub title: String,
    pub priority: TaskPriority,
    /// Due date pre-formatted as `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// Assignee username, if any.
    pub assignee: Option<String>,
}

static VERSION_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct RenderState {
    pub version: u64,
    pub route: Route,
    pub columns: [Vec<TaskView>; COLUMN_COUNT],
    pub selected: Position,
    /// Whether a task is currently being carried.
    pub grabbed: bool,
    pub usernames: Vec<String>,
    pub loading: bool,
    pub auth_form: AuthForm,
    pub task_form: Option<TaskForm>,
    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,
    pub base_url: String,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            version: 0,
            route: Route::Login,
            columns: Default::default(),
            selected: (0, 0),
            grabbed: false,
            usernames: Vec::new(),
            loading: false,
            auth_form: AuthForm::default(),
            task_form: None,
            notification: None,
            show_keymap: false,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_counter_increments() {
        let v1 = next_version();
        let v2 = next_version();
        let v3 = next_version();
        assert!(v2 > v1, "Version should increment");
        assert!(v3 > v2, "Version should increment monotonically");
    }

    #[test]
    fn test_render_state_default_version() {
        let state = RenderState::default();
        assert_eq!(state.version, 0);
        assert_eq!(state.route, Route::Login);
        assert!(state.columns.iter().all(|c| c.is_empty()));
    }
}
