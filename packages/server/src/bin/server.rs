//! Realtime chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatroom-server
//! cargo run --bin chatroom-server -- --storage memory --port 3000
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use chatroom_server::{
    config::{ServerConfig, StorageKind},
    domain::MessageStore,
    infrastructure::store::{InMemoryMessageStore, MongoMessageStore, MongoSettings},
    ui::{Server, ServerError},
};
use chatroom_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chatroom-server")]
#[command(about = "Realtime chat server backed by MongoDB", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "CHATROOM_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Origin allowed to call the server from a browser
    #[arg(long, env = "SOCKET_CORS_ORIGIN", default_value = "http://localhost:3000")]
    cors_origin: String,

    /// Directory with the web client
    #[arg(long, env = "CHATROOM_STATIC_DIR", default_value = "public")]
    static_dir: PathBuf,

    /// Where messages are stored
    #[arg(long, env = "CHATROOM_STORAGE", value_enum, default_value_t = StorageKind::Mongo)]
    storage: StorageKind,

    #[arg(long, env = "MONGO_URL", default_value = "mongodb://localhost:27017")]
    mongo_url: String,

    #[arg(long, env = "MONGO_DB_NAME", default_value = "chatroom")]
    mongo_db_name: String,

    #[arg(long, env = "MONGO_COLLECTION_NAME", default_value = "messages")]
    mongo_collection_name: String,

    /// Argon2 PHC hash of the clear-chat password (see `chatroom-hash-secret`)
    #[arg(long, env = "CHATROOM_ADMIN_CLEAR_HASH", hide_env_values = true)]
    admin_clear_hash: Option<String>,

    /// Argon2 PHC hash of the restart password
    #[arg(long, env = "CHATROOM_ADMIN_RESTART_HASH", hide_env_values = true)]
    admin_restart_hash: Option<String>,

    #[arg(long, default_value_t = 30)]
    health_check_interval_secs: u64,

    #[arg(long, default_value_t = 5)]
    reconnect_delay_secs: u64,

    #[arg(long, default_value_t = 5)]
    restart_delay_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            cors_origin: args.cors_origin,
            static_dir: args.static_dir,
            storage: args.storage,
            mongo: MongoSettings {
                url: args.mongo_url,
                db_name: args.mongo_db_name,
                collection_name: args.mongo_collection_name,
            },
            admin_clear_hash: args.admin_clear_hash,
            admin_restart_hash: args.admin_restart_hash,
            health_check_interval: Duration::from_secs(args.health_check_interval_secs),
            reconnect_delay: Duration::from_secs(args.reconnect_delay_secs),
            restart_delay: Duration::from_secs(args.restart_delay_secs),
            ..ServerConfig::default()
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let store: Arc<dyn MessageStore> = match config.storage {
        StorageKind::Mongo => Arc::new(MongoMessageStore::connect(&config.mongo).await?),
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; messages are lost on exit");
            Arc::new(InMemoryMessageStore::new())
        }
    };

    Server::new(config, store)?.run().await
}

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());
    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
