//! UseCase: チャットへの参加（join）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 履歴の送信、他セッションへの参加通知、統計情報のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：履歴ありの参加
//! - 正常系：クライアントが送った表示名・アバターがそのまま使われる
//! - 異常系：二重 join、履歴の読み込み失敗

use std::sync::Arc;

use chatroom_shared::time::Clock;

use crate::domain::{
    Avatar, ChatMessage, CommandKind, Identity, MessagePusher, MessageStore, OutboundEvent,
    SessionId, SessionRepository, StoreOperation, Timestamp, Username,
};

use super::{CommandReporter, error::JoinChatError, get_stats::broadcast_stats};

/// 参加時に送る履歴の最大件数
pub const HISTORY_LIMIT: usize = 50;

/// join のユースケース
pub struct JoinChatUseCase {
    repository: Arc<dyn SessionRepository>,
    store: Arc<dyn MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
    reporter: Arc<CommandReporter>,
    clock: Arc<dyn Clock>,
}

impl JoinChatUseCase {
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

    /// join を実行
    ///
    /// 履歴の読み込みに失敗しても join 自体は成功する（参加者には `error` を送る）。
    pub async fn execute(
        &self,
        session_id: &SessionId,
        username: String,
        avatar: Option<String>,
    ) -> Result<Identity, JoinChatError> {
        // 1. 表示名とアバターは送られたまま使う
        let identity = Identity::new(Username::new(username), Avatar::new(avatar));

        // 2. connected → joined
        self.repository.join(session_id, identity.clone()).await?;
        tracing::info!(
            "Session '{}' joined as '{}'",
            session_id,
            identity.username.as_str()
        );

        // 3. 履歴を参加者にだけ送る
        self.send_history(session_id).await;

        // 4. 他のセッションに参加を通知
        let notice = ChatMessage::system(
            format!("{} joined the chat", identity.label()),
            Timestamp::new(self.clock.now_millis()),
        );
        if let Err(e) = self
            .message_pusher
            .broadcast_others(session_id, &OutboundEvent::Message(notice))
            .await
        {
            tracing::warn!("Failed to broadcast join notice: {}", e);
        }

        broadcast_stats(&self.repository, &self.message_pusher).await;

        Ok(identity)
    }

    async fn send_history(&self, session_id: &SessionId) {
        let find = StoreOperation::FindRecent {
            limit: HISTORY_LIMIT,
        };
        self.reporter
            .operation(CommandKind::Query, "Loading recent messages", &find)
            .await;

        let event = match self.store.find_recent_messages(HISTORY_LIMIT).await {
            Ok(mut messages) => {
                self.reporter
                    .note(
                        CommandKind::Result,
                        "Query result",
                        &format!("// {} documents found", messages.len()),
                    )
                    .await;
                // newest first → oldest first
                messages.reverse();
                messages.sort_by_key(|m| m.timestamp);
                if messages.len() > HISTORY_LIMIT {
                    messages.drain(..messages.len() - HISTORY_LIMIT);
                }
                OutboundEvent::PreviousMessages(messages)
            }
            Err(e) => {
                tracing::error!("Failed to load message history: {}", e);
                self.reporter
                    .failure("Failed to load message history", &e)
                    .await;
                OutboundEvent::Error("Failed to load message history".to_string())
            }
        };
        let loaded = matches!(event, OutboundEvent::PreviousMessages(_));

        if let Err(e) = self.message_pusher.push_to(session_id, &event).await {
            tracing::warn!("Failed to push history to session '{}': {}", session_id, e);
        }

        if loaded {
            self.reporter
                .operation(
                    CommandKind::Aggregation,
                    "Counting messages",
                    &StoreOperation::CountMessages,
                )
                .await;
        }
    }
}
