//! MongoDB shell rendering of store operations.
//!
//! Purely for display on the `mongodb-command` channel; nothing here is
//! ever executed. String values are JSON-escaped so message text cannot
//! break the rendered command.

use chatroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{CommandFormatter, StoreOperation};

pub struct MongoShellFormatter {
    db_name: String,
    collection_name: String,
}

impl MongoShellFormatter {
    pub fn new(db_name: impl Into<String>, collection_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            collection_name: collection_name.into(),
        }
    }
}

fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

impl CommandFormatter for MongoShellFormatter {
    fn describe(&self, operation: &StoreOperation) -> String {
        let coll = &self.collection_name;
        match operation {
            StoreOperation::Connect => format!("use {}\ndb.{}.stats()", self.db_name, coll),
            StoreOperation::ConnectionStatus => "db.runCommand({connectionStatus: 1})".to_string(),
            StoreOperation::CreateIndexes => format!(
                "db.{coll}.createIndex({{\"timestamp\": -1}})\n\
                 db.{coll}.createIndex({{\"username\": 1}})\n\
                 db.{coll}.createIndex({{\"type\": 1}})"
            ),
            StoreOperation::FindRecent { limit } => {
                format!("db.{coll}.find({{}}).sort({{timestamp: -1}}).limit({limit})")
            }
            StoreOperation::CountMessages => format!(
                "db.{coll}.aggregate([\n  \
                 {{ $group: {{ _id: null, total: {{ $sum: 1 }} }} }},\n  \
                 {{ $project: {{ _id: 0, totalMessages: \"$total\" }} }}\n])"
            ),
            StoreOperation::Insert {
                message,
                session_id,
            } => {
                let avatar = message
                    .avatar
                    .as_deref()
                    .map(|a| format!("\n  avatar: {},", quoted(a)))
                    .unwrap_or_default();
                format!(
                    "db.{coll}.insertOne({{\n  \
                     username: {},\n  \
                     message: {},\n  \
                     timestamp: ISODate(\"{}\"),\n  \
                     type: \"{}\",{}\n  \
                     metadata: {{\n    socketId: \"{}\",\n    userAgent: \"WebSocket Client\"\n  }}\n}})",
                    quoted(&message.username),
                    quoted(&message.message),
                    timestamp_to_rfc3339(message.timestamp.value()),
                    message.kind.as_str(),
                    avatar,
                    session_id,
                )
            }
            StoreOperation::DeleteAll => format!("db.{coll}.deleteMany({{}})"),
        }
    }
}
