pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod log;
pub mod session;

// Decoupled game loop architecture
pub mod app;
pub mod render;
pub mod tea;
pub mod ui;

pub use error::{Error, Result};
