//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Identity, RepositoryError, Session, SessionId, Stats, Timestamp};

/// Session Repository trait
///
/// 接続中のセッションとメッセージカウンタへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを登録
    async fn register(
        &self,
        session_id: SessionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// セッションを削除し、削除したセッションを返す
    async fn unregister(&self, session_id: &SessionId) -> Result<Session, RepositoryError>;

    /// セッションに表示名とアバターを設定（connected → joined）
    async fn join(&self, session_id: &SessionId, identity: Identity) -> Result<(), RepositoryError>;

    /// セッションを取得
    async fn get_session(&self, session_id: &SessionId) -> Option<Session>;

    /// 接続中のセッション数を取得
    async fn count_sessions(&self) -> usize;

    /// 統計情報（接続数・メッセージ総数）を取得
    async fn stats(&self) -> Stats;

    /// メッセージ総数を 1 増やし、新しい値を返す
    async fn increment_total_messages(&self) -> u64;

    /// メッセージ総数を 0 に戻す
    async fn reset_total_messages(&self);
}
