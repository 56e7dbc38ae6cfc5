//! エンティティ

use std::collections::HashMap;

use super::{
    error::RepositoryError,
    value_object::{Avatar, MessageContent, SessionId, Timestamp, Username},
};

/// Author name used for server-generated notices.
pub const SYSTEM_USERNAME: &str = "System";

/// Message origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    System,
    User,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::System => "system",
            MessageKind::User => "user",
        }
    }

    /// Stored documents written by other tools may carry anything; only
    /// `"system"` is special.
    pub fn parse(value: &str) -> Self {
        match value {
            "system" => MessageKind::System,
            _ => MessageKind::User,
        }
    }
}

/// A chat message, persisted (user) or transient (system notices).
///
/// Stored messages are read back without re-validation, so the fields are
/// plain strings rather than the join-time value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub username: String,
    pub message: String,
    pub timestamp: Timestamp,
    pub kind: MessageKind,
    pub avatar: Option<String>,
}

impl ChatMessage {
    /// User message stamped with the server time.
    pub fn user(identity: &Identity, content: MessageContent, timestamp: Timestamp) -> Self {
        Self {
            username: identity.username.as_str().to_string(),
            message: content.into_string(),
            timestamp,
            kind: MessageKind::User,
            avatar: Some(identity.avatar.as_str().to_string()),
        }
    }

    /// Server notice (join/leave/admin). Never persisted.
    pub fn system(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            username: SYSTEM_USERNAME.to_string(),
            message: text.into(),
            timestamp,
            kind: MessageKind::System,
            avatar: None,
        }
    }
}

/// Identity set once at join time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: Username,
    pub avatar: Avatar,
}

impl Identity {
    pub fn new(username: Username, avatar: Avatar) -> Self {
        Self { username, avatar }
    }

    /// Identity attributed to sends from sessions that never joined.
    pub fn anonymous() -> Self {
        Self {
            username: Username::anonymous(),
            avatar: Avatar::default(),
        }
    }

    /// `[AVATAR] name`, the form used in join/leave notices.
    pub fn label(&self) -> String {
        format!("[{}] {}", self.avatar.as_str(), self.username.as_str())
    }
}

/// Session lifecycle. A closed session is simply absent from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Joined,
}

/// One live client connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub connected_at: Timestamp,
    pub identity: Option<Identity>,
}

impl Session {
    pub fn new(id: SessionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            identity: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.identity {
            Some(_) => SessionState::Joined,
            None => SessionState::Connected,
        }
    }
}

/// Snapshot sent as `stats-update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub online_users: usize,
    pub total_messages: u64,
}

/// Live sessions plus the process-local message counter.
///
/// The counter is not reconciled with the store: it starts at 0 on every
/// process start even when history survives.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    total_messages: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: SessionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        if self.sessions.contains_key(&id) {
            return Err(RepositoryError::DuplicateSession(id.into_string()));
        }
        self.sessions.insert(id.clone(), Session::new(id, connected_at));
        Ok(())
    }

    pub fn unregister(&mut self, id: &SessionId) -> Result<Session, RepositoryError> {
        self.sessions
            .remove(id)
            .ok_or_else(|| RepositoryError::SessionNotFound(id.as_str().to_string()))
    }

    /// Transition `connected` → `joined`. A second join is rejected.
    pub fn join(&mut self, id: &SessionId, identity: Identity) -> Result<(), RepositoryError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| RepositoryError::SessionNotFound(id.as_str().to_string()))?;
        if session.identity.is_some() {
            return Err(RepositoryError::AlreadyJoined(id.as_str().to_string()));
        }
        session.identity = Some(identity);
        Ok(())
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn total_messages(&self) -> u64 {
        self.total_messages
    }

    /// Returns the new total.
    pub fn increment_total_messages(&mut self) -> u64 {
        self.total_messages += 1;
        self.total_messages
    }

    pub fn reset_total_messages(&mut self) {
        self.total_messages = 0;
    }

    pub fn stats(&self) -> Stats {
        Stats {
            online_users: self.count(),
            total_messages: self.total_messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionIdFactory;

    fn identity(name: &str) -> Identity {
        Identity::new(Username::new(name.to_string()), Avatar::new(Some("DEV".to_string())))
    }

    #[test]
    fn test_register_and_count() {
        // テスト項目: セッション登録で接続数が増える
        // given (前提条件):
        let mut registry = SessionRegistry::new();

        // when (操作):
        registry
            .register(SessionIdFactory::generate(), Timestamp::new(1000))
            .unwrap();
        registry
            .register(SessionIdFactory::generate(), Timestamp::new(2000))
            .unwrap();

        // then (期待する結果):
        assert_eq!(registry.count(), 2);
        assert_eq!(registry.stats().online_users, 2);
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        // テスト項目: 同じ SessionId の二重登録はエラーになる
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        let id = SessionIdFactory::generate();
        registry.register(id.clone(), Timestamp::new(1000)).unwrap();

        // when (操作):
        let result = registry.register(id.clone(), Timestamp::new(2000));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::DuplicateSession(id.as_str().to_string()))
        );
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_join_transitions_session_state() {
        // テスト項目: join で connected から joined に遷移し、二度目の join は拒否される
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        let id = SessionIdFactory::generate();
        registry.register(id.clone(), Timestamp::new(1000)).unwrap();
        assert_eq!(registry.get(&id).unwrap().state(), SessionState::Connected);

        // when (操作):
        let first = registry.join(&id, identity("Ana"));
        let second = registry.join(&id, identity("Bia"));

        // then (期待する結果):
        assert!(first.is_ok());
        assert_eq!(
            second,
            Err(RepositoryError::AlreadyJoined(id.as_str().to_string()))
        );
        let session = registry.get(&id).unwrap();
        assert_eq!(session.state(), SessionState::Joined);
        assert_eq!(
            session.identity.as_ref().unwrap().username.as_str(),
            "Ana"
        );
    }

    #[test]
    fn test_join_unknown_session_is_rejected() {
        // テスト項目: 未登録セッションの join はエラーになる
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        let id = SessionIdFactory::generate();

        // when (操作):
        let result = registry.join(&id, identity("Ana"));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::SessionNotFound(id.as_str().to_string()))
        );
    }

    #[test]
    fn test_unregister_returns_removed_session() {
        // テスト項目: 登録解除で削除されたセッションが返される
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        let id = SessionIdFactory::generate();
        registry.register(id.clone(), Timestamp::new(1000)).unwrap();
        registry.join(&id, identity("Ana")).unwrap();

        // when (操作):
        let removed = registry.unregister(&id).unwrap();

        // then (期待する結果):
        assert_eq!(removed.id, id);
        assert!(removed.identity.is_some());
        assert_eq!(registry.count(), 0);
        assert!(registry.unregister(&id).is_err());
    }

    #[test]
    fn test_total_message_counter() {
        // テスト項目: メッセージカウンタの加算とリセット
        // given (前提条件):
        let mut registry = SessionRegistry::new();

        // when (操作):
        registry.increment_total_messages();
        let total = registry.increment_total_messages();

        // then (期待する結果):
        assert_eq!(total, 2);
        registry.reset_total_messages();
        assert_eq!(registry.stats().total_messages, 0);
    }

    #[test]
    fn test_identity_label_and_system_message() {
        // テスト項目: 入退室通知用のラベルとシステムメッセージの形
        // given (前提条件):
        let identity = identity("Ana");

        // when (操作):
        let notice = ChatMessage::system(
            format!("{} joined the chat", identity.label()),
            Timestamp::new(5),
        );

        // then (期待する結果):
        assert_eq!(notice.message, "[DEV] Ana joined the chat");
        assert_eq!(notice.username, SYSTEM_USERNAME);
        assert_eq!(notice.kind, MessageKind::System);
        assert_eq!(notice.avatar, None);
    }
}
