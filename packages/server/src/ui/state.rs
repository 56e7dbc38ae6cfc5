//! Server state and dependency wiring.

use std::{collections::HashMap, sync::Arc};

use argon2::password_hash;
use chatroom_shared::time::{Clock, SystemClock};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    config::ServerConfig,
    domain::{MessagePusher, MessageStore, SessionRepository},
    infrastructure::{
        auth::Argon2SecretVerifier, message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionRepository, shutdown::WatchShutdown,
        store::MongoShellFormatter,
    },
    usecase::{
        AdminClearChatUseCase, AdminRestartServerUseCase, CommandReporter,
        ConnectSessionUseCase, DisconnectSessionUseCase, GetStatsUseCase, JoinChatUseCase,
        MonitorStoreHealthUseCase, SendMessageUseCase,
    },
};

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid admin hash for {action}: {source}")]
    InvalidAdminHash {
        action: &'static str,
        #[source]
        source: password_hash::Error,
    },
    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

/// Shared application state
///
/// One instance per server; nothing lives in globals, so several servers
/// can run side by side in one process.
pub struct AppState {
    /// Repository（接続中のセッションとメッセージカウンタ）
    pub repository: Arc<dyn SessionRepository>,
    /// MessagePusher（イベント送信の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub admin_clear_chat_usecase: Arc<AdminClearChatUseCase>,
    pub admin_restart_server_usecase: Arc<AdminRestartServerUseCase>,
    pub get_stats_usecase: Arc<GetStatsUseCase>,
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    pub monitor_store_health_usecase: Arc<MonitorStoreHealthUseCase>,
    pub shutdown: Arc<WatchShutdown>,
}

impl AppState {
    /// Initialize dependencies in order:
    /// 1. Repository
    /// 2. MessagePusher
    /// 3. UseCases
    pub fn new(config: &ServerConfig, store: Arc<dyn MessageStore>) -> Result<Self, ConfigError> {
        let clear_verifier = verifier("admin-clear-chat", config.admin_clear_hash.clone())?;
        let restart_verifier =
            verifier("admin-restart-server", config.admin_restart_hash.clone())?;

        // 1. Repository
        let repository: Arc<dyn SessionRepository> =
            Arc::new(InMemorySessionRepository::default());

        // 2. MessagePusher
        let message_pusher: Arc<dyn MessagePusher> =
            Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new()))));

        // 3. UseCases
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let shutdown = Arc::new(WatchShutdown::new());
        let reporter = Arc::new(CommandReporter::new(
            message_pusher.clone(),
            Arc::new(MongoShellFormatter::new(
                config.mongo.db_name.clone(),
                config.mongo.collection_name.clone(),
            )),
            clock.clone(),
        ));

        Ok(Self {
            connect_session_usecase: Arc::new(ConnectSessionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                reporter.clone(),
                shutdown.clone(),
                clock.clone(),
            )),
            join_chat_usecase: Arc::new(JoinChatUseCase::new(
                repository.clone(),
                store.clone(),
                message_pusher.clone(),
                reporter.clone(),
                clock.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                store.clone(),
                message_pusher.clone(),
                reporter.clone(),
                clock.clone(),
            )),
            admin_clear_chat_usecase: Arc::new(AdminClearChatUseCase::new(
                repository.clone(),
                store.clone(),
                message_pusher.clone(),
                reporter.clone(),
                Arc::new(clear_verifier),
                clock.clone(),
            )),
            admin_restart_server_usecase: Arc::new(AdminRestartServerUseCase::new(
                message_pusher.clone(),
                reporter.clone(),
                Arc::new(restart_verifier),
                shutdown.clone(),
                clock.clone(),
                config.restart_delay,
            )),
            get_stats_usecase: Arc::new(GetStatsUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                reporter.clone(),
                clock,
            )),
            monitor_store_health_usecase: Arc::new(MonitorStoreHealthUseCase::new(
                store,
                reporter,
                config.health_check_interval,
                config.reconnect_delay,
            )),
            repository,
            message_pusher,
            shutdown,
        })
    }
}

fn verifier(
    action: &'static str,
    phc_hash: Option<String>,
) -> Result<Argon2SecretVerifier, ConfigError> {
    let verifier = Argon2SecretVerifier::new(phc_hash)
        .map_err(|source| ConfigError::InvalidAdminHash { action, source })?;
    if !verifier.is_configured() {
        tracing::warn!("No admin hash configured for {}; the action is disabled", action);
    }
    Ok(verifier)
}
