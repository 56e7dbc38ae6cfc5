//! In-process message store.
//!
//! Same contract as the MongoDB store, without the network. Used by the
//! tests and by `--storage memory`.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{ChatMessage, MessageStore, StoreError};

#[derive(Default)]
pub struct InMemoryMessageStore {
    /// (id, message) in insertion order
    messages: Mutex<Vec<(String, ChatMessage)>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with history, as the bootstrap script does for MongoDB.
    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        let messages = messages
            .into_iter()
            .map(|message| (Uuid::new_v4().simple().to_string(), message))
            .collect();
        Self {
            messages: Mutex::new(messages),
        }
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert_message(&self, message: &ChatMessage) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.messages
            .lock()
            .await
            .push((id.clone(), message.clone()));
        Ok(id)
    }

    async fn delete_all_messages(&self) -> Result<u64, StoreError> {
        let mut messages = self.messages.lock().await;
        let deleted = messages.len() as u64;
        messages.clear();
        Ok(deleted)
    }

    async fn find_recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.lock().await;
        // newest insertion first, then a stable sort keeps it as the tie-breaker
        let mut recent: Vec<ChatMessage> =
            messages.iter().rev().map(|(_, m)| m.clone()).collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
