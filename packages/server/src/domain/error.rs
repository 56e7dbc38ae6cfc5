//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("session id must not be empty")]
    EmptySessionId,
}

/// Session Repository のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("session '{0}' is already registered")]
    DuplicateSession(String),
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    #[error("session '{0}' has already joined")]
    AlreadyJoined(String),
}

/// Document store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached (connectivity).
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store was reached but the operation failed (persistence).
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
    #[error("failed to serialize event: {0}")]
    Serialization(String),
}
