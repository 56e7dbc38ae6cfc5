//! UseCase: 管理者によるチャット全削除
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AdminClearChatUseCase::execute() メソッド
//! - 認証 → 全削除 → カウンタのリセット → 通知の順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：正しいパスワード
//! - 異常系：誤ったパスワード、ハッシュ未設定、ストアの削除失敗

use std::sync::Arc;

use chatroom_shared::time::Clock;

use crate::domain::{
    ChatMessage, CommandKind, MessagePusher, MessageStore, OutboundEvent, SecretVerifier,
    SessionId, SessionRepository, StoreOperation, Timestamp,
};

use super::{
    CommandReporter, authorize::authorize, error::AdminClearError, get_stats::broadcast_stats,
};

/// チャット全削除のユースケース
pub struct AdminClearChatUseCase {
    repository: Arc<dyn SessionRepository>,
    store: Arc<dyn MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
    reporter: Arc<CommandReporter>,
    verifier: Arc<dyn SecretVerifier>,
    clock: Arc<dyn Clock>,
}

impl AdminClearChatUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
        reporter: Arc<CommandReporter>,
        verifier: Arc<dyn SecretVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            store,
            message_pusher,
            reporter,
            verifier,
            clock,
        }
    }

    /// 全削除を実行し、削除した件数を返す
    pub async fn execute(
        &self,
        session_id: &SessionId,
        password: &str,
    ) -> Result<u64, AdminClearError> {
        if !authorize(&self.verifier, password).await {
            tracing::warn!("Rejected clear-chat request from '{}'", session_id);
            return Err(AdminClearError::Unauthorized);
        }

        self.reporter
            .operation(
                CommandKind::Admin,
                "Admin clearing all messages",
                &StoreOperation::DeleteAll,
            )
            .await;

        let deleted = match self.store.delete_all_messages().await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::error!("Failed to clear chat: {}", e);
                self.reporter.failure("Failed to clear chat", &e).await;
                return Err(AdminClearError::PersistenceFailed(e));
            }
        };

        self.repository.reset_total_messages().await;
        tracing::info!("Chat cleared by '{}' ({} messages)", session_id, deleted);
        self.reporter
            .note(
                CommandKind::Result,
                "Delete result",
                &format!("// {deleted} messages removed"),
            )
            .await;

        let notice = ChatMessage::system(
            "Chat was cleared by an administrator",
            Timestamp::new(self.clock.now_millis()),
        );
        for event in [OutboundEvent::Message(notice), OutboundEvent::ChatCleared] {
            if let Err(e) = self.message_pusher.broadcast_all(&event).await {
                tracing::warn!("Failed to broadcast clear notice: {}", e);
            }
        }
        broadcast_stats(&self.repository, &self.message_pusher).await;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Identity, MessageContent, StoreError, message_store::MockMessageStore},
        infrastructure::{
            auth::{Argon2SecretVerifier, tests::fast_hash},
            store::InMemoryMessageStore,
        },
        usecase::test_support::{NOW, TestContext, chat_events, events_named},
    };

    fn create_usecase(
        ctx: &TestContext,
        store: Arc<dyn MessageStore>,
        verifier: Argon2SecretVerifier,
    ) -> AdminClearChatUseCase {
        AdminClearChatUseCase::new(
            ctx.repository.clone(),
            store,
            ctx.pusher.clone(),
            ctx.reporter.clone(),
            Arc::new(verifier),
            ctx.clock.clone(),
        )
    }

    fn verifier_for(secret: &str) -> Argon2SecretVerifier {
        Argon2SecretVerifier::new(Some(fast_hash(secret))).unwrap()
    }

    fn seeded_store() -> Arc<InMemoryMessageStore> {
        let message = ChatMessage::user(
            &Identity::anonymous(),
            MessageContent::new("old".to_string()),
            Timestamp::new(NOW - 1),
        );
        Arc::new(InMemoryMessageStore::with_messages(vec![message.clone(), message]))
    }

    #[tokio::test]
    async fn test_clear_with_correct_password() {
        // テスト項目: 正しいパスワードで全削除され、全員に通知と chat-cleared が届く
        // given (前提条件):
        let ctx = TestContext::new();
        let store = seeded_store();
        let usecase = create_usecase(&ctx, store.clone(), verifier_for("s3cret"));
        let (admin, mut admin_rx) = ctx.connect().await;
        let (_bob, mut bob_rx) = ctx.connect().await;
        ctx.repository.increment_total_messages().await;

        // when (操作):
        let result = usecase.execute(&admin, "s3cret").await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        assert!(store.is_empty().await);
        assert_eq!(ctx.repository.stats().await.total_messages, 0);

        for rx in [&mut admin_rx, &mut bob_rx] {
            let events = TestContext::drain(rx);
            let names: Vec<_> = chat_events(&events)
                .iter()
                .map(|e| e["event"].as_str().unwrap().to_string())
                .collect();
            assert_eq!(names, vec!["message", "chat-cleared", "stats-update"]);
            let notice = events_named(&events, "message")[0];
            assert_eq!(
                notice["data"]["message"],
                "Chat was cleared by an administrator"
            );
            assert_eq!(notice["data"]["type"], "system");
        }
    }

    #[tokio::test]
    async fn test_clear_with_wrong_password_changes_nothing() {
        // テスト項目: 誤ったパスワードでは何も削除されず、誰にも何も届かない
        // given (前提条件):
        let ctx = TestContext::new();
        let store = seeded_store();
        let usecase = create_usecase(&ctx, store.clone(), verifier_for("s3cret"));
        let (admin, mut rx) = ctx.connect().await;

        // when (操作):
        let result = usecase.execute(&admin, "guess").await;

        // then (期待する結果):
        assert_eq!(result, Err(AdminClearError::Unauthorized));
        assert_eq!(
            AdminClearError::Unauthorized.to_string(),
            "Incorrect admin password"
        );
        assert_eq!(store.len().await, 2);
        assert!(TestContext::drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_clear_disabled_without_configured_hash() {
        // テスト項目: ハッシュ未設定なら空パスワードでも拒否される
        // given (前提条件):
        let ctx = TestContext::new();
        let store = seeded_store();
        let usecase = create_usecase(&ctx, store.clone(), Argon2SecretVerifier::disabled());
        let (admin, _rx) = ctx.connect().await;

        // when (操作):
        let result = usecase.execute(&admin, "").await;

        // then (期待する結果):
        assert_eq!(result, Err(AdminClearError::Unauthorized));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_clear_store_failure() {
        // テスト項目: 削除に失敗した場合は chat-cleared を送らない
        // given (前提条件):
        let ctx = TestContext::new();
        let mut store = MockMessageStore::new();
        store
            .expect_delete_all_messages()
            .returning(|| Err(StoreError::Operation("not authorized".to_string())));
        let usecase = create_usecase(&ctx, Arc::new(store), verifier_for("s3cret"));
        let (admin, mut rx) = ctx.connect().await;

        // when (操作):
        let result = usecase.execute(&admin, "s3cret").await;

        // then (期待する結果):
        let error = result.unwrap_err();
        assert_eq!(error.to_string(), "Failed to clear chat");
        let events = TestContext::drain(&mut rx);
        assert!(events_named(&events, "chat-cleared").is_empty());
    }
}
