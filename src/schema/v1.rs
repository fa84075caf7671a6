//! Generation 1 of the configuration schema.
//!
//! Kept only so that documents written by the first release can still be
//! decoded and upgraded. Do not add fields here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generation 1 document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    pub version: u64,
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Listen address as a single `host:port` string
    pub address: String,
    pub log: Logging,
    pub storage: Storage,
}

/// Logging section as written by generation 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub max_lines: u64,
}

/// Storage section as written by generation 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    /// Maximum storage size in mebibytes, 0 meaning unlimited
    pub max_size_mbytes: u64,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            version: 1,
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            created_at: Utc::now(),
            address: "127.0.0.1:8080".to_string(),
            log: Logging::default(),
            storage: Storage::default(),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            max_lines: 1000,
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self { max_size_mbytes: 0 }
    }
}
