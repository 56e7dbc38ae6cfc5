//! Server execution logic.

use std::{error::Error, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    config::ServerConfig, domain::MessageStore, infrastructure::shutdown::WatchShutdown,
};

use super::{
    handler::websocket_handler,
    signal::shutdown_signal,
    state::{AppState, ConfigError},
};

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub type ServerError = Box<dyn Error + Send + Sync>;

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryMessageStore::new());
/// let server = Server::new(ServerConfig::default(), store)?;
/// server.run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    config: ServerConfig,
    cors_origin: HeaderValue,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Errors
    ///
    /// Returns an error if an admin hash or the CORS origin is malformed.
    pub fn new(config: ServerConfig, store: Arc<dyn MessageStore>) -> Result<Self, ConfigError> {
        let cors_origin = HeaderValue::from_str(&config.cors_origin)
            .map_err(|_| ConfigError::InvalidCorsOrigin(config.cors_origin.clone()))?;
        let state = Arc::new(AppState::new(&config, store)?);
        Ok(Self {
            state,
            config,
            cors_origin,
        })
    }

    /// Handle for triggering shutdown from outside (tests, embedding).
    pub fn shutdown_handle(&self) -> Arc<WatchShutdown> {
        self.state.shutdown.clone()
    }

    /// Wait for the store, bind to the configured address and serve until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        self.state
            .monitor_store_health_usecase
            .wait_until_available()
            .await;

        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        self.accept(listener).await
    }

    /// Same as [`Server::run`] on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        self.state
            .monitor_store_health_usecase
            .wait_until_available()
            .await;
        self.accept(listener).await
    }

    async fn accept(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!("Chat server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let monitor = self.state.monitor_store_health_usecase.clone();
        let monitor_shutdown = self.state.shutdown.clone();
        let monitor_task =
            tokio::spawn(async move { monitor.run(monitor_shutdown.wait()).await });

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal(self.state.shutdown.clone()))
            .await?;

        // upgraded WebSocket connections are not tracked by graceful shutdown
        self.drain_sessions().await;
        if let Err(e) = monitor_task.await {
            tracing::warn!("Store health monitor task failed: {}", e);
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(self.cors_origin.clone())
            .allow_methods([Method::GET, Method::POST]);

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // Web クライアント（静的ファイル）
            .fallback_service(ServeDir::new(&self.config.static_dir))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    async fn drain_sessions(&self) {
        let deadline = tokio::time::Instant::now() + self.config.drain_timeout;
        loop {
            let remaining = self.state.repository.count_sessions().await;
            if remaining == 0 {
                tracing::info!("All sessions closed");
                return;
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(
                    "{} session(s) still open after {:?}; giving up",
                    remaining,
                    self.config.drain_timeout
                );
                return;
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    }
}
