//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - セッションごとの `UnboundedSender` を管理
//! - イベントを JSON に変換し、セッションへ送信（push_to, broadcast_all, broadcast_others）
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、送信にだけ使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePushError, MessagePusher, OutboundEvent, PusherChannel, SessionId},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())));
/// pusher.register_client(session_id.clone(), tx).await;
/// pusher.push_to(&session_id, &OutboundEvent::ChatCleared).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のセッションの送信チャンネル
    clients: Arc<Mutex<HashMap<SessionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<SessionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    /// イベントを 1 回だけシリアライズする（ブロードキャストでも全員に同じ文字列を送る）
    fn serialize(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event.clone()))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))
    }

    async fn push_to_many(&self, exclude: Option<&SessionId>, content: String) {
        let clients = self.clients.lock().await;

        for (session_id, sender) in clients.iter() {
            if exclude == Some(session_id) {
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(content.clone()) {
                tracing::warn!("Failed to push event to session '{}': {}", session_id, e);
            }
        }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Session '{}' registered to MessagePusher", session_id);
        clients.insert(session_id, sender);
    }

    async fn unregister_client(&self, session_id: &SessionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(session_id);
        tracing::debug!("Session '{}' unregistered from MessagePusher", session_id);
    }

    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::serialize(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(session_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(session_id.as_str().to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed event to session '{}'", session_id);
        Ok(())
    }

    async fn broadcast_all(&self, event: &OutboundEvent) -> Result<(), MessagePushError> {
        let content = Self::serialize(event)?;
        self.push_to_many(None, content).await;
        Ok(())
    }

    async fn broadcast_others(
        &self,
        sender_id: &SessionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::serialize(event)?;
        self.push_to_many(Some(sender_id), content).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionIdFactory;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定のセッションへの送信
    // - broadcast_all / broadcast_others: 複数セッションへの送信
    // - エラーハンドリング（存在しないセッション、切断済みのチャンネル）
    // ========================================

    type Receiver = mpsc::UnboundedReceiver<String>;

    async fn create_test_pusher_with_sessions(
        count: usize,
    ) -> (WebSocketMessagePusher, Vec<(SessionId, Receiver)>) {
        let pusher = WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())));
        let mut sessions = Vec::new();
        for _ in 0..count {
            let (tx, rx) = mpsc::unbounded_channel();
            let id = SessionIdFactory::generate();
            pusher.register_client(id.clone(), tx).await;
            sessions.push((id, rx));
        }
        (pusher, sessions)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のセッションに JSON が送信される
        // given (前提条件):
        let (pusher, mut sessions) = create_test_pusher_with_sessions(2).await;

        // when (操作):
        let result = pusher
            .push_to(&sessions[0].0, &OutboundEvent::Error("oops".to_string()))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            sessions[0].1.recv().await,
            Some(r#"{"event":"error","data":"oops"}"#.to_string())
        );
        assert!(sessions[1].1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないセッションへの送信はエラーを返す
        // given (前提条件):
        let (pusher, _sessions) = create_test_pusher_with_sessions(0).await;
        let unknown = SessionIdFactory::generate();

        // when (操作):
        let result = pusher.push_to(&unknown, &OutboundEvent::ChatCleared).await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ClientNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_session() {
        // テスト項目: 全セッションに同じイベントが届く
        // given (前提条件):
        let (pusher, mut sessions) = create_test_pusher_with_sessions(3).await;

        // when (操作):
        let result = pusher.broadcast_all(&OutboundEvent::ChatCleared).await;

        // then (期待する結果):
        assert!(result.is_ok());
        for (_, rx) in sessions.iter_mut() {
            assert_eq!(
                rx.recv().await,
                Some(r#"{"event":"chat-cleared"}"#.to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_broadcast_others_skips_sender() {
        // テスト項目: 送信者以外にだけ届く
        // given (前提条件):
        let (pusher, mut sessions) = create_test_pusher_with_sessions(3).await;
        let sender_id = sessions[0].0.clone();

        // when (操作):
        let result = pusher
            .broadcast_others(&sender_id, &OutboundEvent::ChatCleared)
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(sessions[0].1.try_recv().is_err());
        assert!(sessions[1].1.recv().await.is_some());
        assert!(sessions[2].1.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_closed_channel() {
        // テスト項目: 切断済みのチャンネルがあってもブロードキャストは成功する
        // given (前提条件):
        let (pusher, mut sessions) = create_test_pusher_with_sessions(2).await;
        let (_, closed_rx) = sessions.remove(0);
        drop(closed_rx);

        // when (操作):
        let result = pusher.broadcast_all(&OutboundEvent::ChatCleared).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(sessions[0].1.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregistered_session_receives_nothing() {
        // テスト項目: 登録解除したセッションには届かない
        // given (前提条件):
        let (pusher, mut sessions) = create_test_pusher_with_sessions(1).await;
        pusher.unregister_client(&sessions[0].0).await;

        // when (操作):
        pusher
            .broadcast_all(&OutboundEvent::ChatCleared)
            .await
            .unwrap();

        // then (期待する結果): 送信側が破棄されたのでチャンネルは閉じている
        assert_eq!(sessions[0].1.recv().await, None);
    }
}
