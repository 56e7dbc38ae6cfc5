//! UseCase: 管理者によるサーバー再起動
//!
//! 再起動はプロセスを終了させず、遅延後に [`ShutdownTrigger`] を引くだけです。
//! 実際の再起動はプロセスを監視する側（systemd, コンテナランタイム等）に任せます。

use std::{sync::Arc, time::Duration};

use chatroom_shared::time::Clock;

use crate::domain::{
    ChatMessage, CommandKind, MessagePusher, OutboundEvent, SecretVerifier, SessionId,
    ShutdownTrigger, Timestamp,
};

use super::{CommandReporter, authorize::authorize, error::AdminRestartError};

/// サーバー再起動のユースケース
pub struct AdminRestartServerUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    reporter: Arc<CommandReporter>,
    verifier: Arc<dyn SecretVerifier>,
    shutdown: Arc<dyn ShutdownTrigger>,
    clock: Arc<dyn Clock>,
    delay: Duration,
}

impl AdminRestartServerUseCase {
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        reporter: Arc<CommandReporter>,
        verifier: Arc<dyn SecretVerifier>,
        shutdown: Arc<dyn ShutdownTrigger>,
        clock: Arc<dyn Clock>,
        delay: Duration,
    ) -> Self {
        Self {
            message_pusher,
            reporter,
            verifier,
            shutdown,
            clock,
            delay,
        }
    }

    /// 再起動を予約
    ///
    /// 全員に予告を送り、`delay` 経過後にシャットダウンを開始する。
    pub async fn execute(
        &self,
        session_id: &SessionId,
        password: &str,
    ) -> Result<(), AdminRestartError> {
        if !authorize(&self.verifier, password).await {
            tracing::warn!("Rejected restart request from '{}'", session_id);
            return Err(AdminRestartError::Unauthorized);
        }

        // 秒単位に切り上げ
        let secs = self.delay.as_millis().div_ceil(1000);
        tracing::warn!("Restart requested by '{}', shutting down in {}s", session_id, secs);

        let notice = ChatMessage::system(
            format!("Server will restart in {secs} seconds..."),
            Timestamp::new(self.clock.now_millis()),
        );
        if let Err(e) = self
            .message_pusher
            .broadcast_all(&OutboundEvent::Message(notice))
            .await
        {
            tracing::warn!("Failed to broadcast restart notice: {}", e);
        }
        self.reporter
            .note(
                CommandKind::Admin,
                "Server restart scheduled",
                &format!("// Restarting in {secs} seconds"),
            )
            .await;

        let shutdown = self.shutdown.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shutdown.trigger();
        });

        Ok(())
    }
}
