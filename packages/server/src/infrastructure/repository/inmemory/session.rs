//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! SessionRegistry エンティティをそのままプロセス内に保持します。
//! プロセスを再起動すると空に戻ります（永続化しない）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Identity, RepositoryError, Session, SessionId, SessionRegistry, SessionRepository, Stats,
    Timestamp,
};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    registry: Arc<Mutex<SessionRegistry>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(registry: Arc<Mutex<SessionRegistry>>) -> Self {
        Self { registry }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(SessionRegistry::new())))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn register(
        &self,
        session_id: SessionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.register(session_id, connected_at)
    }

    async fn unregister(&self, session_id: &SessionId) -> Result<Session, RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.unregister(session_id)
    }

    async fn join(&self, session_id: &SessionId, identity: Identity) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.join(session_id, identity)
    }

    async fn get_session(&self, session_id: &SessionId) -> Option<Session> {
        let registry = self.registry.lock().await;
        registry.get(session_id).cloned()
    }

    async fn count_sessions(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.count()
    }

    async fn stats(&self) -> Stats {
        let registry = self.registry.lock().await;
        registry.stats()
    }

    async fn increment_total_messages(&self) -> u64 {
        let mut registry = self.registry.lock().await;
        registry.increment_total_messages()
    }

    async fn reset_total_messages(&self) {
        let mut registry = self.registry.lock().await;
        registry.reset_total_messages();
    }
}
