//! MongoDB message store.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, IndexModel,
    bson::{self, Bson, doc, oid::ObjectId},
    error::{Error as MongoError, ErrorKind},
    options::ClientOptions,
};
use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, MessageKind, MessageStore, StoreError, Timestamp};

/// Fail fast when the server is down instead of the driver's 30 s default,
/// so startup retries and health checks stay on their own schedule.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub url: String,
    pub db_name: String,
    pub collection_name: String,
}

/// Stored document shape, compatible with the bootstrap script.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    username: String,
    message: String,
    timestamp: bson::DateTime,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
}

impl From<&ChatMessage> for MessageDocument {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: None,
            username: message.username.clone(),
            message: message.message.clone(),
            timestamp: bson::DateTime::from_millis(message.timestamp.value()),
            kind: message.kind.as_str().to_string(),
            avatar: message.avatar.clone(),
        }
    }
}

impl From<MessageDocument> for ChatMessage {
    fn from(document: MessageDocument) -> Self {
        Self {
            username: document.username,
            message: document.message,
            timestamp: Timestamp::new(document.timestamp.timestamp_millis()),
            kind: MessageKind::parse(&document.kind),
            avatar: document.avatar,
        }
    }
}

/// Connectivity problems are retried by the health monitor; everything
/// else is a failed operation.
fn classify(error: MongoError) -> StoreError {
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => StoreError::Unavailable(error.to_string()),
        _ => StoreError::Operation(error.to_string()),
    }
}

pub struct MongoMessageStore {
    client: Client,
    collection: Collection<MessageDocument>,
}

impl MongoMessageStore {
    /// Build the client. No network round-trip happens here; the first
    /// `ping` tells whether the server is reachable.
    pub async fn connect(settings: &MongoSettings) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&settings.url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        options.app_name = Some("chatroom-server".to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options).map_err(classify)?;
        let collection = client
            .database(&settings.db_name)
            .collection::<MessageDocument>(&settings.collection_name);

        tracing::info!(
            "MongoDB client configured (db: {}, collection: {})",
            settings.db_name,
            settings.collection_name
        );
        Ok(Self { client, collection })
    }
}

#[async_trait]
impl MessageStore for MongoMessageStore {
    async fn insert_message(&self, message: &ChatMessage) -> Result<String, StoreError> {
        let result = self
            .collection
            .insert_one(MessageDocument::from(message))
            .await
            .map_err(classify)?;

        Ok(match result.inserted_id {
            Bson::ObjectId(id) => id.to_hex(),
            other => other.to_string(),
        })
    }

    async fn delete_all_messages(&self) -> Result<u64, StoreError> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(classify)?;
        Ok(result.deleted_count)
    }

    async fn find_recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "timestamp": -1 })
            .limit(limit)
            .await
            .map_err(classify)?;

        let documents: Vec<MessageDocument> = cursor.try_collect().await.map_err(classify)?;
        Ok(documents.into_iter().map(ChatMessage::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "timestamp": -1 }).build(),
            IndexModel::builder().keys(doc! { "username": 1 }).build(),
            IndexModel::builder().keys(doc! { "type": 1 }).build(),
        ];
        self.collection
            .create_indexes(indexes)
            .await
            .map_err(classify)?;
        Ok(())
    }
}
