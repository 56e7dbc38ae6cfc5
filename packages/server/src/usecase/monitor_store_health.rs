//! UseCase: ストアのヘルスチェック
//!
//! 起動時はストアに届くまで待ち、その後は一定間隔で ping を送ります。
//! ping が失敗すると観測チャンネルに再接続中の通知を流します。
//! 再接続そのものはドライバの接続プールが行います。

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;

use crate::domain::{CommandKind, MessageStore, StoreError, StoreOperation};

use super::CommandReporter;

/// ヘルスチェックのユースケース
pub struct MonitorStoreHealthUseCase {
    store: Arc<dyn MessageStore>,
    reporter: Arc<CommandReporter>,
    interval: Duration,
    reconnect_delay: Duration,
}

impl MonitorStoreHealthUseCase {
    pub fn new(
        store: Arc<dyn MessageStore>,
        reporter: Arc<CommandReporter>,
        interval: Duration,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            store,
            reporter,
            interval,
            reconnect_delay,
        }
    }

    /// ストアに届くまで `reconnect_delay` 間隔で再試行し、インデックスを作成する
    pub async fn wait_until_available(&self) {
        let mut attempt: u32 = 1;
        while let Err(e) = self.store.ping().await {
            tracing::warn!(
                "Store unavailable (attempt {}): {}; retrying in {:?}",
                attempt,
                e,
                self.reconnect_delay
            );
            attempt += 1;
            tokio::time::sleep(self.reconnect_delay).await;
        }
        tracing::info!("Connected to message store");

        self.reporter
            .operation(
                CommandKind::Connection,
                "Connected to MongoDB",
                &StoreOperation::Connect,
            )
            .await;

        match self.store.ensure_indexes().await {
            Ok(()) => {
                self.reporter
                    .operation(
                        CommandKind::Index,
                        "Creating indexes",
                        &StoreOperation::CreateIndexes,
                    )
                    .await;
            }
            Err(e) => tracing::warn!("Failed to create indexes: {}", e),
        }
    }

    /// ping を 1 回送る
    pub async fn check_once(&self) -> Result<(), StoreError> {
        match self.store.ping().await {
            Ok(()) => {
                tracing::debug!("Store health check passed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                self.reporter
                    .notice(CommandKind::Reconnect, "Reconnecting to MongoDB...", false)
                    .await;
                Err(e)
            }
        }
    }

    /// `shutdown` が完了するまで `interval` ごとにヘルスチェックを行う
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 最初の tick は即時に完了するので読み捨てる
        ticker.tick().await;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::debug!("Store health monitor stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let _ = self.check_once().await;
                }
            }
        }
    }
}
