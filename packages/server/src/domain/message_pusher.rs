//! MessagePusher trait 定義
//!
//! セッションへのイベント送信（通知）のインターフェース。
//! WebSocket の具体的な送信処理は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, OutboundEvent, SessionId};

/// セッションごとの送信チャンネル（シリアライズ済み JSON を流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Broadcast hub.
///
/// 配信はベストエフォート：切断済みのセッションへの送信は捨てられ、再送しない。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// セッションの送信チャンネルを登録
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel);

    /// セッションの送信チャンネルを登録解除
    async fn unregister_client(&self, session_id: &SessionId);

    /// 特定のセッションに送信
    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// 全セッションに送信
    async fn broadcast_all(&self, event: &OutboundEvent) -> Result<(), MessagePushError>;

    /// 送信者以外の全セッションに送信
    async fn broadcast_others(
        &self,
        sender_id: &SessionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;
}
