//! The Elm Architecture (TEA) pattern implementation.
//!
//! - `model`: application state (Model) and its screen/form types
//! - `message`: events that can occur (Message)
//! - `command`: side effects to execute (Command)
//! - `update`: pure update function Model + Message → Commands

pub mod command;
pub mod message;
pub mod model;
pub mod update;

pub use command::Command;
pub use message::Message;
pub use model::{
    guard, AuthField, AuthForm, Model, Notification, NotificationLevel, Route, TaskField, TaskForm,
};
pub use update::update;
