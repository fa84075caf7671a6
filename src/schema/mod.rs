//! Configuration schema definitions.
//!
//! The current generation lives here; historical generations and the upgrade
//! step into each of them live in the [`v1`] and [`v2`] submodules. Every
//! generation's structs carry `#[serde(default)]` so partial documents decode
//! over a fresh default rather than failing on missing fields.

pub mod v1;
pub mod v2;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Current schema generation number.
pub const VERSION: u64 = 3;

/// Log levels accepted by validation.
const LOG_LEVELS: &[&str] = &["silent", "error", "warn", "info", "debug"];

/// Current-generation document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    pub version: u64,
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub host: String,
    pub port: u16,
    pub update_check: bool,
    pub log: Logging,
    pub storage: Storage,
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Log level: "silent", "error", "warn", "info", "debug"
    pub level: String,
    /// Number of log lines kept in the ring buffer
    pub max_lines: u64,
    /// Topics to restrict logging to; empty means all
    pub topics: Vec<String>,
}

/// Storage section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    /// Maximum storage size in bytes, 0 meaning unlimited
    pub max_size_bytes: u64,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            version: VERSION,
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            created_at: Utc::now(),
            host: "127.0.0.1".to_string(),
            port: 8080,
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
            topics: Vec::new(),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self { max_size_bytes: 0 }
    }
}

/// Upgrade a generation 2 document to the current generation.
///
/// The single `host:port` address string is split into separate fields; an
/// address that does not parse is rejected. The input is not modified.
pub fn upgrade_from_v2(old: &v2::Data) -> Result<Data, StoreError> {
    let (host, port) = split_address(&old.address).ok_or_else(|| {
        StoreError::upgrade(
            2,
            VERSION,
            format!("address '{}' is not a valid host:port", old.address),
        )
    })?;

    Ok(Data {
        version: VERSION,
        id: old.id.clone(),
        name: old.name.clone(),
        created_at: old.created_at,
        host,
        port,
        update_check: old.update_check,
        log: Logging {
            level: old.log.level.clone(),
            max_lines: old.log.max_lines,
            topics: Vec::new(),
        },
        storage: Storage {
            max_size_bytes: old.storage.max_size_bytes,
        },
    })
}

fn split_address(address: &str) -> Option<(String, u16)> {
    let (host, port) = address.rsplit_once(':')?;
    let port: u16 = port.parse().ok()?;
    if host.is_empty() || port == 0 {
        return None;
    }
    Some((host.to_string(), port))
}

/// A current-generation document together with its entry metadata.
///
/// `created_at` travels inside the document and is set once, when a fresh
/// default is constructed. `updated_at` belongs to the entry: loading from
/// disk mirrors it from the loaded document's creation time, and only the
/// caller-facing mutation path advances it.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: Data,
    /// Findings from the last `validate` call, never serialized
    #[serde(skip)]
    errors: Vec<String>,
}

impl Config {
    /// Fresh entry with default current-generation content.
    pub fn new() -> Self {
        let data = Data::default();
        Self {
            updated_at: data.created_at,
            data,
            errors: Vec::new(),
        }
    }

    /// When the wrapped document was first constructed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.data.created_at
    }

    /// Replace the payload with data loaded from disk.
    ///
    /// Loading does not advance `updated_at`; it mirrors the loaded
    /// document's creation time.
    pub(crate) fn set_loaded_data(&mut self, data: Data) {
        self.data = data;
        self.updated_at = self.data.created_at;
    }

    /// Recompute the validation error list from scratch.
    pub fn validate(&mut self) {
        self.errors.clear();

        if !LOG_LEVELS.contains(&self.data.log.level.as_str()) {
            self.errors.push(format!(
                "log.level '{}' is not one of {}",
                self.data.log.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if self.data.log.max_lines == 0 {
            self.errors
                .push("log.max_lines must be at least 1".to_string());
        }

        if self.data.port == 0 {
            self.errors.push("port must be non-zero".to_string());
        }
    }

    /// Whether the last validation pass recorded any findings.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Findings recorded by the last validation pass.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
