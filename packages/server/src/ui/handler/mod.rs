//! WebSocket handlers.

mod websocket;

pub use websocket::websocket_handler;
