//! UseCase 層
//!
//! セッションのライフサイクル（接続・join・送信・管理操作・切断）と
//! ストアのヘルスチェックを実装します。

mod admin_clear_chat;
mod admin_restart_server;
mod authorize;
mod command_reporter;
mod connect_session;
mod disconnect_session;
mod error;
mod get_stats;
mod join_chat;
mod monitor_store_health;
mod send_message;

#[cfg(test)]
mod test_support;

pub use admin_clear_chat::AdminClearChatUseCase;
pub use admin_restart_server::AdminRestartServerUseCase;
pub use command_reporter::CommandReporter;
pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{AdminClearError, AdminRestartError, ConnectError, JoinChatError, SendMessageError};
pub use get_stats::GetStatsUseCase;
pub use join_chat::{HISTORY_LIMIT, JoinChatUseCase};
pub use monitor_store_health::MonitorStoreHealthUseCase;
pub use send_message::SendMessageUseCase;
