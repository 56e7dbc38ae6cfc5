//! Server configuration.
//!
//! Plain data; the binary fills it from flags and the environment.

use std::{path::PathBuf, time::Duration};

use crate::infrastructure::store::MongoSettings;

/// Backing store for messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageKind {
    Mongo,
    /// Process-local, lost on exit.
    Memory,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS, e.g. `http://localhost:3000`.
    pub cors_origin: String,
    /// Directory served at `/`.
    pub static_dir: PathBuf,
    pub storage: StorageKind,
    pub mongo: MongoSettings,
    /// Argon2 PHC hash for `admin-clear-chat`; `None` disables the action.
    pub admin_clear_hash: Option<String>,
    /// Argon2 PHC hash for `admin-restart-server`; `None` disables the action.
    pub admin_restart_hash: Option<String>,
    pub health_check_interval: Duration,
    pub reconnect_delay: Duration,
    pub restart_delay: Duration,
    /// Upper bound on waiting for sessions to close during shutdown.
    pub drain_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origin: "http://localhost:3000".to_string(),
            static_dir: PathBuf::from("public"),
            storage: StorageKind::Mongo,
            mongo: MongoSettings {
                url: "mongodb://localhost:27017".to_string(),
                db_name: "chatroom".to_string(),
                collection_name: "messages".to_string(),
            },
            admin_clear_hash: None,
            admin_restart_hash: None,
            health_check_interval: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(5),
            restart_delay: Duration::from_secs(5),
            drain_timeout: Duration::from_secs(5),
        }
    }
}
