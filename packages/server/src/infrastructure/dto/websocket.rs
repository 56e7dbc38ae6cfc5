//! WebSocket message DTOs.
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": <payload>}`;
//! `data` is absent for events without payload.

use serde::{Deserialize, Serialize};

/// `join-chat` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinChatPayload {
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// `send-message` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub message: String,
}

/// `admin-clear-chat` / `admin-restart-server` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPayload {
    pub password: String,
}

/// Client → server events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinChat(JoinChatPayload),
    SendMessage(SendMessagePayload),
    AdminClearChat(AdminPayload),
    AdminRestartServer(AdminPayload),
    RequestStats,
}

/// Message type on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    System,
    User,
}

/// A chat message as clients see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub username: String,
    pub message: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub r#type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// `stats-update` payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub online_users: usize,
    pub total_messages: u64,
}

/// `mongodb-command` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCommandDto {
    pub command: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub r#type: String,
    pub success: bool,
}

/// Server → client events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    PreviousMessages(Vec<MessageDto>),
    Message(MessageDto),
    StatsUpdate(StatsDto),
    ChatCleared,
    Error(String),
    #[serde(rename = "mongodb-command")]
    StoreCommand(StoreCommandDto),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_join_chat_with_and_without_avatar() {
        // テスト項目: join-chat はアバター省略でも受け付ける
        // given (前提条件):
        let with_avatar = r#"{"event":"join-chat","data":{"username":"Ana","avatar":"USER"}}"#;
        let without_avatar = r#"{"event":"join-chat","data":{"username":"Ana"}}"#;

        // when (操作):
        let parsed1: ClientEvent = serde_json::from_str(with_avatar).unwrap();
        let parsed2: ClientEvent = serde_json::from_str(without_avatar).unwrap();

        // then (期待する結果):
        assert_eq!(
            parsed1,
            ClientEvent::JoinChat(JoinChatPayload {
                username: "Ana".to_string(),
                avatar: Some("USER".to_string()),
            })
        );
        assert_eq!(
            parsed2,
            ClientEvent::JoinChat(JoinChatPayload {
                username: "Ana".to_string(),
                avatar: None,
            })
        );
    }

    #[test]
    fn test_parse_join_chat_rejects_bare_string() {
        // テスト項目: join-chat の payload が文字列の場合は拒否される（型付きの形のみ受け付ける）
        // given (前提条件):
        let text = r#"{"event":"join-chat","data":"Ana"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_request_stats_without_data() {
        // テスト項目: payload のないイベントは data なしで受け付ける
        // given (前提条件):
        let text = r#"{"event":"request-stats"}"#;

        // when (操作):
        let parsed: ClientEvent = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(parsed, ClientEvent::RequestStats);
    }

    #[test]
    fn test_parse_unknown_event_fails() {
        // テスト項目: 未知のイベント名はエラーになる
        // given (前提条件):
        let text = r#"{"event":"drop-database","data":{}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_wire_shape() {
        // テスト項目: サーバーイベントが {event, data} 形式でシリアライズされる
        // given (前提条件):
        let stats = ServerEvent::StatsUpdate(StatsDto {
            online_users: 2,
            total_messages: 7,
        });
        let command = ServerEvent::StoreCommand(StoreCommandDto {
            command: "// Ping\ndb.adminCommand({ping: 1})".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            r#type: "reconnect".to_string(),
            success: false,
        });

        // when (操作):
        let stats_json = serde_json::to_value(&stats).unwrap();
        let cleared_json = serde_json::to_value(ServerEvent::ChatCleared).unwrap();
        let command_json = serde_json::to_value(&command).unwrap();

        // then (期待する結果):
        assert_eq!(
            stats_json,
            json!({"event": "stats-update", "data": {"onlineUsers": 2, "totalMessages": 7}})
        );
        assert_eq!(cleared_json, json!({"event": "chat-cleared"}));
        assert_eq!(command_json["event"], "mongodb-command");
        assert_eq!(command_json["data"]["type"], "reconnect");
        assert_eq!(command_json["data"]["success"], false);
    }

    #[test]
    fn test_system_message_omits_avatar() {
        // テスト項目: アバターのないメッセージは avatar フィールドを出力しない
        // given (前提条件):
        let message = MessageDto {
            username: "System".to_string(),
            message: "[USER] Ana joined the chat".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            r#type: MessageType::System,
            avatar: None,
        };

        // when (操作):
        let value = serde_json::to_value(ServerEvent::Message(message)).unwrap();

        // then (期待する結果):
        assert_eq!(value["data"]["type"], "system");
        assert!(value["data"].get("avatar").is_none());
    }
}
