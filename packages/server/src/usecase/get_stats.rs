//! UseCase: 統計情報の送信
//!
//! - `request-stats` に対して要求元セッションにだけ `stats-update` を送る
//! - 状態を変更した UseCase は `broadcast_stats` で全セッションに送る

use std::sync::Arc;

use crate::domain::{MessagePusher, OutboundEvent, SessionId, SessionRepository};

/// 全セッションに最新の統計情報を送信
pub(super) async fn broadcast_stats(
    repository: &Arc<dyn SessionRepository>,
    message_pusher: &Arc<dyn MessagePusher>,
) {
    let stats = repository.stats().await;
    if let Err(e) = message_pusher
        .broadcast_all(&OutboundEvent::StatsUpdate(stats))
        .await
    {
        tracing::warn!("Failed to broadcast stats: {}", e);
    }
}

/// 統計情報取得のユースケース
pub struct GetStatsUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetStatsUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 要求元セッションに統計情報を送信
    pub async fn execute(&self, session_id: &SessionId) {
        let stats = self.repository.stats().await;
        if let Err(e) = self
            .message_pusher
            .push_to(session_id, &OutboundEvent::StatsUpdate(stats))
            .await
        {
            tracing::warn!("Failed to push stats to session '{}': {}", session_id, e);
        }
    }
}
