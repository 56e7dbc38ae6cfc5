//! UseCase: セッション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - Registry と MessagePusher への登録、統計情報のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規セッションの接続
//! - 異常系：シャットダウン中の接続拒否

use std::sync::Arc;

use chatroom_shared::time::Clock;

use crate::domain::{
    CommandKind, MessagePusher, PusherChannel, SessionId, SessionRepository, ShutdownTrigger,
    StoreOperation, Timestamp,
};

use super::{CommandReporter, error::ConnectError, get_stats::broadcast_stats};

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    reporter: Arc<CommandReporter>,
    shutdown: Arc<dyn ShutdownTrigger>,
    clock: Arc<dyn Clock>,
}

impl ConnectSessionUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        reporter: Arc<CommandReporter>,
        shutdown: Arc<dyn ShutdownTrigger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            reporter,
            shutdown,
            clock,
        }
    }

    /// セッション接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続成功（接続時刻）
    /// * `Err(ConnectError)` - シャットダウン中、または登録失敗
    pub async fn execute(
        &self,
        session_id: SessionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        if self.shutdown.is_triggered() {
            return Err(ConnectError::ShuttingDown);
        }

        // 1. Registry に登録
        let connected_at = Timestamp::new(self.clock.now_millis());
        self.repository
            .register(session_id.clone(), connected_at)
            .await?;

        // 2. MessagePusher にセッションを登録
        self.message_pusher
            .register_client(session_id.clone(), sender)
            .await;
        tracing::info!("Session '{}' connected", session_id);

        // 3. 観測チャンネルと統計情報
        self.reporter
            .operation(
                CommandKind::Connection,
                "New connection established",
                &StoreOperation::ConnectionStatus,
            )
            .await;
        broadcast_stats(&self.repository, &self.message_pusher).await;

        Ok(connected_at)
    }
}
