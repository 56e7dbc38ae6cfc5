//! ドメイン層
//!
//! エンティティ・値オブジェクトと、外部に依存するインターフェース（trait）を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod auth;
pub mod entity;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod message_pusher;
pub mod message_store;
pub mod repository;
pub mod value_object;

pub use auth::SecretVerifier;
pub use entity::{
    ChatMessage, Identity, MessageKind, Session, SessionRegistry, SessionState, Stats,
};
pub use error::{MessagePushError, RepositoryError, StoreError, ValueObjectError};
pub use event::{CommandKind, OutboundEvent, StoreCommandLog};
pub use lifecycle::ShutdownTrigger;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use message_store::{CommandFormatter, MessageStore, StoreOperation};
pub use repository::SessionRepository;
pub use value_object::{Avatar, MessageContent, SessionId, SessionIdFactory, Timestamp, Username};
