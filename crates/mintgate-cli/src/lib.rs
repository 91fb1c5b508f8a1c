//! # mintgate-cli: Command-Line Tool for mintgate
//!
//! Provides the `mintgate` binary.
//!
//! ## Subcommands
//!
//! - `mintgate allowlist`: build a root and per-account proofs, verify or
//!   extract a proof.
//! - `mintgate init` / `status` / `admin`: create and operate a collection
//!   backed by a local snapshot file.
//! - `mintgate mint` / `item` / `royalty`: issue and query against that
//!   snapshot.
//!
//! Every command that changes the engine locks the snapshot, loads it,
//! applies one operation, and writes it back atomically before releasing the
//! lock. A second `mintgate` process (or an API server) on the same state
//! file is refused while the lock is held. A rejected operation leaves the
//! file untouched and exits with status 1.

pub mod allowlist;
pub mod collection;
pub mod mint;

use std::path::Path;

use anyhow::{Context, Result};

use mintgate_core::IssuanceError;
use mintgate_state::{AdminCapability, IssuanceEngine, SnapshotStore, StoreLock};

/// Snapshot location used when `--state` is not given.
pub const DEFAULT_STATE_PATH: &str = ".mintgate/state.json";

/// An engine loaded from a snapshot file, with its capability. The snapshot
/// stays locked until the session is dropped.
pub struct Session {
    store: SnapshotStore,
    _lock: StoreLock,
    pub engine: IssuanceEngine,
    pub admin: AdminCapability,
}

impl Session {
    /// Lock and load the engine stored at `state`. Fails if no collection
    /// was initialized there or another process holds the lock.
    pub fn open(state: &Path) -> Result<Self> {
        let store = SnapshotStore::new(state);
        let lock = store.lock()?;
        let (engine, admin) = store
            .load_engine()
            .with_context(|| format!("failed to load {}", state.display()))?
            .with_context(|| {
                format!(
                    "no collection at {}; run `mintgate init` first",
                    state.display()
                )
            })?;
        tracing::debug!(path = %state.display(), issued = engine.issued(), "engine loaded");
        Ok(Self {
            store,
            _lock: lock,
            engine,
            admin,
        })
    }

    /// Write the engine back to its snapshot file.
    pub fn commit(&self) -> Result<()> {
        self.store
            .save(&self.engine.snapshot())
            .with_context(|| format!("failed to write {}", self.store.path().display()))
    }
}

/// Print a rejection with its machine code and return exit status 1.
pub fn report_rejection(err: &IssuanceError) -> u8 {
    eprintln!("REJECTED [{}]: {err}", err.code());
    tracing::warn!(code = err.code(), "operation rejected");
    1
}
