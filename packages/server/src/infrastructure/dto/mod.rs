//! Data Transfer Objects (DTOs) for the chat application.
//!
//! - `websocket`: WebSocket event envelopes and payloads
//! - `conversion`: domain ↔ DTO conversion

pub mod conversion;
pub mod websocket;
