use mongodb::bson::oid::ObjectId;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

/// Length of the payload seeded by the store initialization.
pub const PAYLOAD_LEN: usize = 8;

/// A stored record: an identifier plus an opaque string payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Data {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub data: String,
}

impl Data {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            id: None,
            data: data.into(),
        }
    }

    /// Assigns a fresh id unless one was supplied, and returns it.
    pub fn ensure_id(&mut self) -> ObjectId {
        *self.id.get_or_insert_with(ObjectId::new)
    }
}

/// Random ASCII letters, `len` long.
pub fn random_payload(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .filter(u8::is_ascii_alphabetic)
        .take(len)
        .map(char::from)
        .collect()
}
