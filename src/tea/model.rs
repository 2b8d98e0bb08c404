//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model is pure application state - no channels, no handles, no runtime
//! infrastructure. It owns the current route, the board, the forms, and the
//! shared session handle.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::api::{Task, TaskPayload, TaskPriority, TaskStatus, User};
use crate::board::{Board, Position};
use crate::config::Config;
use crate::render::{next_version, RenderState, TaskView};
use crate::session::SessionStore;

/// Level of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Error notification - displayed in red
    Error,
    /// Informational notification - displayed in green
    Info,
}

/// A transient notification, cleared on the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// The three screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Login,
    Register,
    Board,
}

/// The route guard. Unauthenticated users cannot reach the board;
/// authenticated users are bounced off the auth screens.
pub fn guard(route: Route, authenticated: bool) -> Route {
    match (route, authenticated) {
        (Route::Board, false) => Route::Login,
        (Route::Login | Route::Register, true) => Route::Board,
        (route, _) => route,
    }
}

/// Fields of the login/register forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    #[default]
    Username,
    Email,
    Password,
}

impl AuthField {
    pub fn label(&self) -> &'static str {
        match self {
            AuthField::Username => "Username",
            AuthField::Email => "Email",
            AuthField::Password => "Password",
        }
    }

    /// Cycle to the next field (Tab behavior). Register carries the
    /// extra email field, login skips it.
    pub fn next(&self, route: Route) -> AuthField {
        match (route, self) {
            (Route::Register, AuthField::Email) => AuthField::Username,
            (Route::Register, AuthField::Username) => AuthField::Password,
            (Route::Register, AuthField::Password) => AuthField::Email,
            (_, AuthField::Username) => AuthField::Password,
            (_, _) => AuthField::Username,
        }
    }
}

/// State of the login/register form. All fields are required; the form
/// never submits while one is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub focus: AuthField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl AuthForm {
    pub fn reset(&mut self, route: Route) {
        *self = AuthForm::default();
        if route == Route::Register {
            self.focus = AuthField::Email;
        }
    }

    pub fn value_mut(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    /// Required-presence validation. Returns the first missing field.
    pub fn validate(&self, route: Route) -> Result<(), String> {
        if route == Route::Register && self.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

/// Fields of the task form, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskField {
    #[default]
    Title,
    Description,
    Priority,
    DueDate,
    Assignee,
}

impl TaskField {
    pub fn label(&self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::Description => "Description",
            TaskField::Priority => "Priority",
            TaskField::DueDate => "Due date",
            TaskField::Assignee => "Assignee",
        }
    }

    pub fn next(&self) -> TaskField {
        match self {
            TaskField::Title => TaskField::Description,
            TaskField::Description => TaskField::Priority,
            TaskField::Priority => TaskField::DueDate,
            TaskField::DueDate => TaskField::Assignee,
            TaskField::Assignee => TaskField::Title,
        }
    }

    pub fn prev(&self) -> TaskField {
        match self {
            TaskField::Title => TaskField::Assignee,
            TaskField::Description => TaskField::Title,
            TaskField::Priority => TaskField::Description,
            TaskField::DueDate => TaskField::Priority,
            TaskField::Assignee => TaskField::DueDate,
        }
    }
}

/// State of the create/edit task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    /// Task id when editing, None when creating.
    pub editing: Option<i64>,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    /// Raw `YYYY-MM-DD` input, empty for no due date.
    pub due_date: String,
    /// Index into the users picklist.
    pub assignee: Option<usize>,
    /// Status the task lands in; preset from the selected column.
    pub status: TaskStatus,
    pub focus: TaskField,
    pub error: Option<String>,
}

impl TaskForm {
    /// Fresh create form, preset to the column the cursor is on.
    pub fn create(status: TaskStatus) -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            priority: TaskPriority::default(),
            due_date: String::new(),
            assignee: None,
            status,
            focus: TaskField::default(),
            error: None,
        }
    }

    /// Edit form prefilled from an existing task.
    pub fn edit(task: &Task, users: &[User]) -> Self {
        let assignee = task
            .assigned_to
            .as_ref()
            .and_then(|a| users.iter().position(|u| u.id == a.id));
        Self {
            editing: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            assignee,
            status: task.status,
            focus: TaskField::default(),
            error: None,
        }
    }

    /// Cycle the assignee picklist forward, wrapping through "nobody".
    pub fn cycle_assignee(&mut self, user_count: usize) {
        self.assignee = match self.assignee {
            None if user_count > 0 => Some(0),
            Some(i) if i + 1 < user_count => Some(i + 1),
            _ => None,
        };
    }

    /// Validate required fields and produce the request body.
    /// No payload, no request: an invalid form never leaves the client.
    pub fn validate(&self, users: &[User]) -> Result<TaskPayload, String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required".to_string());
        }
        let Some(assignee) = self.assignee.and_then(|i| users.get(i)) else {
            return Err("Assignee is required".to_string());
        };
        let due_date = parse_due_date(&self.due_date)?;
        Ok(TaskPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            status: self.status,
            priority: self.priority,
            due_date,
            assigned_to_id: Some(assignee.id),
        })
    }
}

/// Parse an optional `YYYY-MM-DD` due date as midnight UTC.
fn parse_due_date(raw: &str) -> Result<Option<DateTime<Utc>>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| "Due date must be YYYY-MM-DD".to_string())?;
    Ok(Some(date.and_time(NaiveTime::MIN).and_utc()))
}

/// Pure application state - the single source of truth.
pub struct Model {
    // Navigation
    pub route: Route,

    // Board state
    pub board: Board,
    pub selected: Position,
    /// Origin of a grabbed task while it is being moved.
    pub grabbed: Option<Position>,
    pub users: Vec<User>,
    pub loading: bool,

    // Forms
    pub auth_form: AuthForm,
    pub task_form: Option<TaskForm>,

    // UI state
    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,

    // Shared handles (immutable after init)
    pub config: Config,
    pub session: Arc<SessionStore>,
}

impl Model {
    /// Create a model, landing on the guarded startup route: the board
    /// when a token is present, the login screen otherwise.
    pub fn new(config: Config, session: Arc<SessionStore>) -> Self {
        let route = guard(Route::Board, session.is_authenticated());
        Self {
            route,
            board: Board::default(),
            selected: (0, 0),
            grabbed: None,
            users: Vec::new(),
            loading: false,
            auth_form: AuthForm::default(),
            task_form: None,
            notification: None,
            show_keymap: false,
            dirty: true,
            config,
            session,
        }
    }

    /// Navigate, running the route guard against the live session flag.
    pub fn navigate(&mut self, route: Route) {
        let guarded = guard(route, self.session.is_authenticated());
        if guarded != self.route {
            self.route = guarded;
            self.dirty = true;
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.board.task_at(self.selected)
    }

    /// Keep the cursor inside the column it points at.
    pub fn clamp_selection(&mut self) {
        let (col, row) = self.selected;
        let len = self.board.column_len(col);
        if len == 0 {
            self.selected = (col, 0);
        } else if row >= len {
            self.selected = (col, len - 1);
        }
    }

    /// Create an immutable snapshot for the render thread.
    ///
    /// Each snapshot gets a monotonically increasing version number,
    /// enabling the render thread to detect state changes and skip
    /// redundant renders.
    pub fn snapshot(&self) -> RenderState {
        let columns = std::array::from_fn(|col| {
            self.board
                .column(col)
                .iter()
                .map(|task| TaskView {
                    id: task.id,
                    title: task.title.clone(),
                    priority: task.priority,
                    due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    assignee: task.assigned_to.as_ref().map(|u| u.username.clone()),
                })
                .collect()
        });

        RenderState {
            version: next_version(),
            route: self.route,
            columns,
            selected: self.selected,
            grabbed: self.grabbed.is_some(),
            usernames: self.users.iter().map(|u| u.username.clone()).collect(),
            loading: self.loading,
            auth_form: self.auth_form.clone(),
            task_form: self.task_form.clone(),
            notification: self.notification.clone(),
            show_keymap: self.show_keymap,
            base_url: self.config.effective_base_url().to_string(),
        }
    }
}
