//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化してから全セッションへ配信する順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：join 済み / 未 join（Anonymous）セッションからの送信
//! - 正常系：空白だけの本文もそのまま保存・配信される
//! - 異常系：ストアへの書き込み失敗

use std::sync::Arc;

use chatroom_shared::time::Clock;

use crate::domain::{
    ChatMessage, CommandKind, Identity, MessageContent, MessagePusher, MessageStore,
    OutboundEvent, SessionId, SessionRepository, StoreOperation, Timestamp,
};

use super::{CommandReporter, error::SendMessageError, get_stats::broadcast_stats};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn SessionRepository>,
    store: Arc<dyn MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
    reporter: Arc<CommandReporter>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
        reporter: Arc<CommandReporter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            store,
            message_pusher,
            reporter,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// ストアへの書き込みが成功したメッセージだけが配信される。
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 配信したメッセージ
    /// * `Err(SendMessageError)` - 永続化の失敗
    pub async fn execute(
        &self,
        session_id: &SessionId,
        text: String,
    ) -> Result<ChatMessage, SendMessageError> {
        let content = MessageContent::new(text);

        // join 前の送信は Anonymous として扱う
        let identity = self
            .repository
            .get_session(session_id)
            .await
            .and_then(|session| session.identity)
            .unwrap_or_else(Identity::anonymous);
        let message = ChatMessage::user(
            &identity,
            content,
            Timestamp::new(self.clock.now_millis()),
        );

        self.reporter
            .operation(
                CommandKind::Insert,
                "Saving new message",
                &StoreOperation::Insert {
                    message: message.clone(),
                    session_id: session_id.clone(),
                },
            )
            .await;

        let inserted_id = match self.store.insert_message(&message).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to save message from '{}': {}", session_id, e);
                self.reporter.failure("Failed to save message", &e).await;
                return Err(SendMessageError::PersistenceFailed(e));
            }
        };

        let total = self.repository.increment_total_messages().await;
        tracing::debug!("Message '{}' persisted (total: {})", inserted_id, total);
        self.reporter
            .note(
                CommandKind::Result,
                "Insert result",
                &format!("// ID: {inserted_id}\n// Status: persisted"),
            )
            .await;

        if let Err(e) = self
            .message_pusher
            .broadcast_all(&OutboundEvent::Message(message.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast message: {}", e);
        }
        broadcast_stats(&self.repository, &self.message_pusher).await;

        Ok(message)
    }
}
