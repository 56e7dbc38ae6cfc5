//! Utilities shared by the chatroom binaries: logging setup and time helpers.

pub mod logger;
pub mod time;
