use serde::{Deserialize, Serialize};

/// A single object as it's kept on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub object_id: String,
    pub version: u32,
    pub data: serde_json::Value,
}

impl StoredRecord {
    pub fn new(object_id: impl Into<String>, version: u32, data: serde_json::Value) -> Self {
        Self {
            object_id: object_id.into(),
            version,
            data,
        }
    }
}
