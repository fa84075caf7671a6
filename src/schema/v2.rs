//! Generation 2 of the configuration schema.
//!
//! Differences from generation 1: the storage limit is counted in bytes
//! instead of mebibytes, and the `update_check` switch exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::v1;
use crate::error::StoreError;

/// Generation 2 document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    pub version: u64,
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Listen address as a single `host:port` string
    pub address: String,
    pub update_check: bool,
    pub log: Logging,
    pub storage: Storage,
}

/// Logging section as written by generation 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub max_lines: u64,
}

/// Storage section as written by generation 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    /// Maximum storage size in bytes, 0 meaning unlimited
    pub max_size_bytes: u64,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            version: 2,
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            created_at: Utc::now(),
            address: "127.0.0.1:8080".to_string(),
            update_check: true,
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
        Self { max_size_bytes: 0 }
    }
}

/// Upgrade a generation 1 document to generation 2.
///
/// The storage limit changes units from mebibytes to bytes; a value that
/// would overflow the byte count is rejected. The input is not modified.
pub fn upgrade_from_v1(old: &v1::Data) -> Result<Data, StoreError> {
    let max_size_bytes = old
        .storage
        .max_size_mbytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| {
            StoreError::upgrade(
                1,
                2,
                format!(
                    "storage.max_size_mbytes {} overflows a byte count",
                    old.storage.max_size_mbytes
                ),
            )
        })?;

    Ok(Data {
        version: 2,
        id: old.id.clone(),
        name: old.name.clone(),
        created_at: old.created_at,
        address: old.address.clone(),
        update_check: true,
        log: Logging {
            level: old.log.level.clone(),
            max_lines: old.log.max_lines,
        },
        storage: Storage { max_size_bytes },
    })
}
