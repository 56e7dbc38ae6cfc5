//! Store-command observability channel.
//!
//! Every store operation is echoed to all sessions as a `mongodb-command`
//! event. Nothing depends on these events; dropping them would not change
//! any chat behavior.

use std::{fmt::Display, sync::Arc};

use chatroom_shared::time::Clock;

use crate::domain::{
    CommandFormatter, CommandKind, MessagePusher, OutboundEvent, StoreCommandLog, StoreOperation,
    Timestamp,
};

pub struct CommandReporter {
    message_pusher: Arc<dyn MessagePusher>,
    formatter: Arc<dyn CommandFormatter>,
    clock: Arc<dyn Clock>,
}

impl CommandReporter {
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        formatter: Arc<dyn CommandFormatter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            message_pusher,
            formatter,
            clock,
        }
    }

    /// `// description` followed by the rendered shell command.
    pub async fn operation(
        &self,
        kind: CommandKind,
        description: &str,
        operation: &StoreOperation,
    ) {
        let command = self.formatter.describe(operation);
        self.emit(kind, format!("// {description}\n{command}"), true).await;
    }

    /// `// description` followed by free-form detail lines (already commented).
    pub async fn note(&self, kind: CommandKind, description: &str, detail: &str) {
        self.emit(kind, format!("// {description}\n{detail}"), true).await;
    }

    pub async fn failure(&self, description: &str, error: &(dyn Display + Sync)) {
        self.emit(
            CommandKind::Error,
            format!("// {description}\n// Error: {error}"),
            false,
        )
        .await;
    }

    /// A single comment line, e.g. reconnect notices.
    pub async fn notice(&self, kind: CommandKind, text: &str, success: bool) {
        self.emit(kind, format!("// {text}"), success).await;
    }

    async fn emit(&self, kind: CommandKind, command: String, success: bool) {
        let event = OutboundEvent::StoreCommand(StoreCommandLog {
            command,
            timestamp: Timestamp::new(self.clock.now_millis()),
            kind,
            success,
        });
        if let Err(e) = self.message_pusher.broadcast_all(&event).await {
            tracing::warn!("Failed to broadcast store command log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{TestContext, events_named};

    #[tokio::test]
    async fn test_operation_is_broadcast_as_mongodb_command() {
        // テスト項目: ストア操作が mongodb-command として全セッションに送られる
        // given (前提条件):
        let ctx = TestContext::new();
        let (_alice, mut alice_rx) = ctx.connect().await;
        let (_bob, mut bob_rx) = ctx.connect().await;

        // when (操作):
        ctx.reporter
            .operation(CommandKind::Admin, "Clearing", &StoreOperation::DeleteAll)
            .await;

        // then (期待する結果):
        for rx in [&mut alice_rx, &mut bob_rx] {
            let events = TestContext::drain(rx);
            let commands = events_named(&events, "mongodb-command");
            assert_eq!(commands.len(), 1);
            assert_eq!(
                commands[0]["data"]["command"],
                "// Clearing\ndb.messages.deleteMany({})"
            );
            assert_eq!(commands[0]["data"]["type"], "admin");
            assert_eq!(commands[0]["data"]["success"], true);
        }
    }

    #[tokio::test]
    async fn test_failure_is_marked_unsuccessful() {
        // テスト項目: 失敗ログは type=error, success=false になる
        // given (前提条件):
        let ctx = TestContext::new();
        let (_alice, mut rx) = ctx.connect().await;

        // when (操作):
        ctx.reporter.failure("Failed to save message", &"timeout").await;

        // then (期待する結果):
        let events = TestContext::drain(&mut rx);
        let commands = events_named(&events, "mongodb-command");
        assert_eq!(commands[0]["data"]["type"], "error");
        assert_eq!(commands[0]["data"]["success"], false);
        assert_eq!(
            commands[0]["data"]["command"],
            "// Failed to save message\n// Error: timeout"
        );
    }
}
