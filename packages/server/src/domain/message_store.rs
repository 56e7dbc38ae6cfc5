//! Document store interface.
//!
//! The store itself is an external collaborator; the server only needs the
//! handful of operations below. `CommandFormatter` renders each operation
//! as the equivalent shell command for the observability channel.

use async_trait::async_trait;

use super::{ChatMessage, SessionId, StoreError};

/// Message persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert one message and return the store-assigned id.
    async fn insert_message(&self, message: &ChatMessage) -> Result<String, StoreError>;

    /// Delete every stored message and return how many were removed.
    async fn delete_all_messages(&self) -> Result<u64, StoreError>;

    /// Up to `limit` messages, newest first.
    async fn find_recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;

    /// Round-trip to the store.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Create the indexes the queries above rely on. Idempotent.
    async fn ensure_indexes(&self) -> Result<(), StoreError>;
}

/// Store operations as shown on the observability channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    /// Database/collection banner shown after the store connects.
    Connect,
    ConnectionStatus,
    CreateIndexes,
    FindRecent { limit: usize },
    CountMessages,
    Insert {
        message: ChatMessage,
        session_id: SessionId,
    },
    DeleteAll,
}

/// Renders a [`StoreOperation`] as a shell command.
pub trait CommandFormatter: Send + Sync {
    fn describe(&self, operation: &StoreOperation) -> String;
}
