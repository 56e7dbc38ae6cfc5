//! Realtime chat server backed by a document store.
//!
//! Browser clients talk to the server over a WebSocket; every message is
//! persisted before it is broadcast, and every store operation is mirrored
//! to the clients as the equivalent MongoDB shell command.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
