//! Conversion logic between DTOs and domain entities.

use chatroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, MessageKind, OutboundEvent, Stats, StoreCommandLog};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<MessageKind> for dto::MessageType {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::System => dto::MessageType::System,
            MessageKind::User => dto::MessageType::User,
        }
    }
}

impl From<ChatMessage> for dto::MessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            username: model.username,
            message: model.message,
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
            r#type: model.kind.into(),
            avatar: model.avatar,
        }
    }
}

impl From<Stats> for dto::StatsDto {
    fn from(model: Stats) -> Self {
        Self {
            online_users: model.online_users,
            total_messages: model.total_messages,
        }
    }
}

impl From<StoreCommandLog> for dto::StoreCommandDto {
    fn from(model: StoreCommandLog) -> Self {
        Self {
            command: model.command,
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
            r#type: model.kind.as_str().to_string(),
            success: model.success,
        }
    }
}

impl From<OutboundEvent> for dto::ServerEvent {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::PreviousMessages(messages) => {
                dto::ServerEvent::PreviousMessages(messages.into_iter().map(Into::into).collect())
            }
            OutboundEvent::Message(message) => dto::ServerEvent::Message(message.into()),
            OutboundEvent::StatsUpdate(stats) => dto::ServerEvent::StatsUpdate(stats.into()),
            OutboundEvent::ChatCleared => dto::ServerEvent::ChatCleared,
            OutboundEvent::Error(text) => dto::ServerEvent::Error(text),
            OutboundEvent::StoreCommand(log) => dto::ServerEvent::StoreCommand(log.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommandKind, Timestamp};

    #[test]
    fn test_domain_user_message_to_dto() {
        // テスト項目: ユーザーメッセージが DTO に変換され、時刻が RFC 3339 になる
        // given (前提条件):
        let message = ChatMessage {
            username: "Ana".to_string(),
            message: "oi".to_string(),
            timestamp: Timestamp::new(1672531200000),
            kind: MessageKind::User,
            avatar: Some("USER".to_string()),
        };

        // when (操作):
        let dto_msg: dto::MessageDto = message.into();

        // then (期待する結果):
        assert_eq!(dto_msg.username, "Ana");
        assert_eq!(dto_msg.message, "oi");
        assert_eq!(dto_msg.timestamp, "2023-01-01T00:00:00.000Z");
        assert_eq!(dto_msg.r#type, dto::MessageType::User);
        assert_eq!(dto_msg.avatar.as_deref(), Some("USER"));
    }

    #[test]
    fn test_previous_messages_keep_order() {
        // テスト項目: 履歴の並び順が変換後も保たれる
        // given (前提条件):
        let messages = vec![
            ChatMessage::system("first", Timestamp::new(1)),
            ChatMessage::system("second", Timestamp::new(2)),
        ];

        // when (操作):
        let event: dto::ServerEvent = OutboundEvent::PreviousMessages(messages).into();

        // then (期待する結果):
        let dto::ServerEvent::PreviousMessages(dtos) = event else {
            panic!("expected previous-messages");
        };
        let texts: Vec<&str> = dtos.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_store_command_log_to_dto() {
        // テスト項目: コマンドログの種別が小文字の文字列になる
        // given (前提条件):
        let log = StoreCommandLog {
            command: "// Saving message\ndb.messages.insertOne({})".to_string(),
            timestamp: Timestamp::new(0),
            kind: CommandKind::Insert,
            success: true,
        };

        // when (操作):
        let dto_log: dto::StoreCommandDto = log.into();

        // then (期待する結果):
        assert_eq!(dto_log.r#type, "insert");
        assert!(dto_log.success);
        assert_eq!(dto_log.timestamp, "1970-01-01T00:00:00.000Z");
    }
}
