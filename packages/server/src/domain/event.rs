//! Events pushed from the server to connected sessions.

use super::{
    entity::{ChatMessage, Stats},
    value_object::Timestamp,
};

/// Category of an entry on the store-command observability channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Connection,
    Query,
    Result,
    Aggregation,
    Insert,
    Admin,
    Index,
    Reconnect,
    Error,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Connection => "connection",
            CommandKind::Query => "query",
            CommandKind::Result => "result",
            CommandKind::Aggregation => "aggregation",
            CommandKind::Insert => "insert",
            CommandKind::Admin => "admin",
            CommandKind::Index => "index",
            CommandKind::Reconnect => "reconnect",
            CommandKind::Error => "error",
        }
    }
}

/// One entry of the store-command channel: a human-readable rendering of
/// what the server just asked the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCommandLog {
    pub command: String,
    pub timestamp: Timestamp,
    pub kind: CommandKind,
    pub success: bool,
}

/// Everything a session can receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Chat history, chronological. Sent once, to the joining session only.
    PreviousMessages(Vec<ChatMessage>),
    Message(ChatMessage),
    StatsUpdate(Stats),
    ChatCleared,
    /// Human-readable error, sent to the originating session only.
    Error(String),
    StoreCommand(StoreCommandLog),
}
