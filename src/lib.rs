//! confstore - Persisted JSON Configuration Store
//!
//! This library loads a structured configuration document from a file,
//! transparently upgrades it across historical schema generations, serves it
//! to callers, and writes changes back atomically.
//!
//! # Modules
//!
//! - `schema`: Document layouts per generation and the upgrade steps
//! - `migrate`: Version-tag probing and dispatch through the upgrade chain
//! - `store`: The dual-layer (base/override) store with atomic write-back
//! - `error`: Unified error handling
//!
//! # Example
//!
//! ```rust,no_run
//! use confstore::Store;
//!
//! # fn main() -> Result<(), confstore::StoreError> {
//! let store = Store::new(Some("config.json".into()), None)?;
//!
//! let mut config = store.get();
//! config.data.name = "edge-node".to_string();
//! config.validate();
//! store.set(&config)?;
//! store.reload()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod migrate;
mod persist;
pub mod schema;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{StoreError, StoreResult};
pub use migrate::migrate;
pub use schema::{Config, Data, Logging, Storage, VERSION};
pub use store::{ReloadFn, Store};
