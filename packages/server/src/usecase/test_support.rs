//! Shared fixtures for the use case tests.

use std::{collections::HashMap, sync::Arc};

use chatroom_shared::time::FixedClock;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        Avatar, Identity, MessagePusher, SessionId, SessionIdFactory, SessionRepository,
        Timestamp, Username,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        store::MongoShellFormatter,
    },
};

use super::CommandReporter;

pub(crate) const NOW: i64 = 1_700_000_000_000;

pub(crate) struct TestContext {
    pub repository: Arc<InMemorySessionRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub reporter: Arc<CommandReporter>,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    pub fn new() -> Self {
        let repository = Arc::new(InMemorySessionRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let clock = Arc::new(FixedClock::new(NOW));
        let reporter = Arc::new(CommandReporter::new(
            pusher.clone(),
            Arc::new(MongoShellFormatter::new("chatroom", "messages")),
            clock.clone(),
        ));
        Self {
            repository,
            pusher,
            reporter,
            clock,
        }
    }

    /// Registers a session directly, bypassing the connect use case.
    pub async fn connect(&self) -> (SessionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SessionIdFactory::generate();
        self.repository
            .register(id.clone(), Timestamp::new(NOW))
            .await
            .unwrap();
        self.pusher.register_client(id.clone(), tx).await;
        (id, rx)
    }

    /// Sets the identity directly, bypassing the join use case.
    pub async fn join(&self, id: &SessionId, username: &str) {
        let identity = Identity::new(Username::new(username.to_string()), Avatar::default());
        self.repository.join(id, identity).await.unwrap();
    }

    /// Everything pushed so far, parsed.
    pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
        let mut events = Vec::new();
        while let Ok(text) = rx.try_recv() {
            events.push(serde_json::from_str(&text).unwrap());
        }
        events
    }
}

pub(crate) fn events_named<'a>(events: &'a [Value], name: &str) -> Vec<&'a Value> {
    events.iter().filter(|e| e["event"] == name).collect()
}

/// Only the functional events, without the store-command channel.
pub(crate) fn chat_events(events: &[Value]) -> Vec<&Value> {
    events
        .iter()
        .filter(|e| e["event"] != "mongodb-command")
        .collect()
}
