//! Typed client for the remote task backend.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{
    flatten_auth_error, AuthResponse, LoginPayload, RegisterPayload, Task, TaskMove, TaskPayload,
    TaskPriority, TaskStatus, User,
};
