//! Integration test suite for taskdeck.
//!
//! These tests exercise full user flows at the model level: the update
//! loop, the board, the forms, and the on-disk session store. They
//! verify that the components work together correctly.
//!
//! # Test Categories
//!
//! - `auth_flow`: login, register, logout, and token persistence
//! - `board_flow`: board navigation, drag and drop, and task forms
//!
//! # CI Compatibility
//!
//! These tests feed the update loop directly and do not make actual
//! network calls, making them safe to run in CI environments.

mod fixtures;

mod auth_flow;
mod board_flow;
