//! UseCase: セッション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 登録解除、退室通知、統計情報のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：join 済みセッションの切断（退室通知あり）
//! - 正常系：join 前のセッションの切断（退室通知なし）
//! - 異常系：存在しないセッション

use std::sync::Arc;

use chatroom_shared::time::Clock;

use crate::domain::{
    ChatMessage, CommandKind, MessagePusher, OutboundEvent, RepositoryError, Session, SessionId,
    SessionRepository, Timestamp,
};

use super::{CommandReporter, get_stats::broadcast_stats};

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    reporter: Arc<CommandReporter>,
    clock: Arc<dyn Clock>,
}

impl DisconnectSessionUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        reporter: Arc<CommandReporter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            reporter,
            clock,
        }
    }

    /// セッション切断を実行し、削除したセッションを返す
    pub async fn execute(&self, session_id: &SessionId) -> Result<Session, RepositoryError> {
        // 1. Registry と MessagePusher から削除
        let session = self.repository.unregister(session_id).await?;
        self.message_pusher.unregister_client(session_id).await;
        tracing::info!("Session '{}' disconnected", session_id);

        // 2. join 済みなら残りのセッションに退室を通知
        if let Some(identity) = &session.identity {
            self.reporter
                .note(
                    CommandKind::Connection,
                    "Connection closed",
                    &format!("// Connection closed: {}", identity.username.as_str()),
                )
                .await;

            let notice = ChatMessage::system(
                format!("{} left the chat", identity.label()),
                Timestamp::new(self.clock.now_millis()),
            );
            if let Err(e) = self
                .message_pusher
                .broadcast_all(&OutboundEvent::Message(notice))
                .await
            {
                tracing::warn!("Failed to broadcast leave notice: {}", e);
            }
        }

        // 3. 統計情報
        broadcast_stats(&self.repository, &self.message_pusher).await;

        Ok(session)
    }
}
