//! Commands for the TEA (The Elm Architecture) pattern.
//!
//! Commands are outputs from the update function - the side effects the
//! runtime executes, which here means HTTP requests against the backend.

use crate::api::{LoginPayload, RegisterPayload, TaskPayload};
use crate::board::MoveRequest;

/// Output commands from the update function.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Auth
    Login(LoginPayload),
    Register(RegisterPayload),
    Logout,

    // Data fetches (one-shot request/response, no subscriptions)
    FetchTasks,
    FetchUsers,

    // Task mutations
    CreateTask(TaskPayload),
    UpdateTask { id: i64, payload: TaskPayload },
    MoveTask(MoveRequest),

    // App lifecycle
    Quit,
}
