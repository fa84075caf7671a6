//! The configuration store: dual-layer state, migrate-on-load, and atomic
//! write-back.
//!
//! The store owns two named slots. `base` is the persisted configuration and
//! always exists; `merged` is an optional in-memory override that never
//! reaches disk and is discarded on restart. A single lock guards both
//! slots; serialization and file I/O happen outside the lock on private
//! copies, so readers always see a complete document.

use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrate::migrate;
use crate::persist::{read_document, to_pretty_json, write_atomic};
use crate::schema::Config;

/// Callback invoked by [`Store::reload`] to notify the consuming process
/// that the configuration has changed.
pub type ReloadFn = Box<dyn Fn() + Send + Sync>;

/// The two state slots, guarded by the store's lock.
struct Slots {
    /// Persisted configuration; source of truth for `get`/`set`
    base: Config,
    /// Runtime override layer; never persisted
    merged: Option<Config>,
}

/// Persisted configuration store with an in-memory override layer.
pub struct Store {
    /// Backing file path; `None` selects in-memory-only mode
    path: Option<PathBuf>,
    slots: Mutex<Slots>,
    reload_fn: Option<ReloadFn>,
}

impl Store {
    /// Open the store backed by `path`.
    ///
    /// A fresh default document becomes `base`; if a document of any known
    /// generation exists at `path` it is migrated and replaces the default.
    /// `base` is then written back, which normalizes older on-disk
    /// generations to the current one. The store is unusable if either step
    /// fails.
    ///
    /// With `path` set to `None` the store is purely in-memory: nothing is
    /// read and nothing is ever written.
    pub fn new(path: Option<PathBuf>, reload_fn: Option<ReloadFn>) -> StoreResult<Self> {
        let mut base = Config::new();

        if let Some(p) = path.as_deref() {
            if let Some(raw) = read_document(p)? {
                base.set_loaded_data(migrate(&raw)?);
                debug!(path = %p.display(), "configuration loaded");
            }
        }

        Self::persist(path.as_deref(), &base)?;

        info!(path = ?path, "configuration store ready");

        Ok(Self {
            path,
            slots: Mutex::new(Slots { base, merged: None }),
            reload_fn,
        })
    }

    /// Deep copy of the persisted configuration.
    pub fn get(&self) -> Config {
        self.slots.lock().base.clone()
    }

    /// Persist `config` and adopt it as the new base layer.
    ///
    /// `config` must currently report no validation errors; validation is
    /// not re-run here. The in-memory swap happens only after the file write
    /// succeeds, so a failed write leaves both the previous base and the
    /// on-disk file untouched.
    pub fn set(&self, config: &Config) -> StoreResult<()> {
        if config.has_errors() {
            return Err(StoreError::validation(config.errors()));
        }

        let copy = config.clone();
        Self::persist(self.path.as_deref(), &copy)?;

        self.slots.lock().base = copy;
        Ok(())
    }

    /// Deep copy of the effective configuration: the override layer when one
    /// is set, the base layer otherwise.
    pub fn get_active(&self) -> Config {
        let slots = self.slots.lock();
        slots.merged.as_ref().unwrap_or(&slots.base).clone()
    }

    /// Re-validate `config` and adopt it as the override layer.
    ///
    /// Unlike [`Store::set`] this runs full validation itself. The override
    /// never touches disk and is gone after a restart.
    pub fn set_active(&self, config: &Config) -> StoreResult<()> {
        let mut copy = config.clone();
        copy.validate();
        if copy.has_errors() {
            return Err(StoreError::validation(copy.errors()));
        }

        self.slots.lock().merged = Some(copy);
        Ok(())
    }

    /// Notify the consuming process that configuration has changed.
    ///
    /// Succeeds as a no-op when no callback was registered.
    pub fn reload(&self) -> StoreResult<()> {
        if let Some(reload_fn) = &self.reload_fn {
            debug!("invoking reload callback");
            reload_fn();
        }
        Ok(())
    }

    fn persist(path: Option<&Path>, config: &Config) -> StoreResult<()> {
        let Some(path) = path else {
            return Ok(());
        };

        let bytes = to_pretty_json(config)?;
        write_atomic(path, &bytes)
    }
}

// Not derivable: the reload callback has no `Debug`.
impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
