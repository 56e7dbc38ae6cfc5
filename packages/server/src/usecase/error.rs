//! UseCase 層のエラー型
//!
//! `Display` の文言はそのまま `error` イベントとしてクライアントに送られます。

use thiserror::Error;

use crate::domain::{RepositoryError, StoreError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Server is shutting down")]
    ShuttingDown,
    #[error("Could not register session: {0}")]
    Registry(#[from] RepositoryError),
}

/// join 処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinChatError {
    #[error("You have already joined the chat")]
    AlreadyJoined,
    #[error("Session is no longer connected")]
    SessionNotFound,
}

impl From<RepositoryError> for JoinChatError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::AlreadyJoined(_) => JoinChatError::AlreadyJoined,
            RepositoryError::SessionNotFound(_) | RepositoryError::DuplicateSession(_) => {
                JoinChatError::SessionNotFound
            }
        }
    }
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("Failed to send message. Please try again.")]
    PersistenceFailed(StoreError),
}

/// チャット全削除のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminClearError {
    #[error("Incorrect admin password")]
    Unauthorized,
    #[error("Failed to clear chat")]
    PersistenceFailed(StoreError),
}

/// サーバー再起動のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminRestartError {
    #[error("Incorrect admin password")]
    Unauthorized,
}
