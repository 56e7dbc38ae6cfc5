//! Shutdown signal handling.

use std::sync::Arc;

use crate::{domain::ShutdownTrigger, infrastructure::shutdown::WatchShutdown};

/// Resolves on Ctrl+C, SIGTERM or an internal trigger (admin restart).
///
/// Whatever the cause, the shared trigger is set on the way out so the
/// session loops see it too.
pub(super) async fn shutdown_signal(shutdown: Arc<WatchShutdown>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
        _ = shutdown.wait() => tracing::info!("Shutdown requested, shutting down..."),
    }

    shutdown.trigger();
}
