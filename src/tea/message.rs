//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function - keyboard events and the
//! completion callbacks of the API commands.

use crossterm::event::KeyEvent;

use crate::api::{Task, User};

/// Input messages to the update function.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    // Auth completions
    /// Login succeeded, token already stored.
    LoggedIn(Option<User>),
    /// Registration succeeded, token already stored.
    Registered(Option<User>),
    /// Login or register rejected; the flattened field errors.
    AuthFailed(String),
    /// Explicit logout finished, token cleared.
    LoggedOut,
    /// A 401 arrived on any request; token already cleared.
    SessionExpired,

    // Data completions
    TasksLoaded(Vec<Task>),
    TasksLoadFailed(String),
    UsersLoaded(Vec<User>),
    UsersLoadFailed(String),

    // Mutation completions (each triggers a full re-fetch)
    TaskCreated(Task),
    TaskUpdated(Task),
    TaskSaveFailed(String),
    TaskMoved(i64),
    TaskMoveFailed(String),
}
