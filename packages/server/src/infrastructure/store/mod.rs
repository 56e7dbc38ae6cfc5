//! MessageStore 実装
//!
//! - `mongo`: MongoDB コレクション
//! - `memory`: プロセス内の Vec（テスト・デモ用）
//! - `shell`: 観測チャンネル向けの MongoDB シェルコマンド表示

pub mod memory;
pub mod mongo;
pub mod shell;

pub use memory::InMemoryMessageStore;
pub use mongo::{MongoMessageStore, MongoSettings};
pub use shell::MongoShellFormatter;
