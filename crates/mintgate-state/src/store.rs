//! # Snapshot Persistence
//!
//! The engine survives restarts as a single JSON document. `save` writes a
//! sibling temp file, flushes it to disk, and renames it over the target, so
//! readers see either the old snapshot or the new one, never a torn write.
//!
//! One process at a time may own a snapshot. [`SnapshotStore::lock`] takes an
//! exclusive advisory lock on a sibling `.lock` file; a host holds the
//! returned [`StoreLock`] for as long as it loads, mutates and saves.
//!
//! Restore re-validates what the type system cannot: the policy (through
//! `Policy`'s validating deserializer), `issued <= supply_ceiling`, and a
//! registry holding exactly the ids `1..=issued`.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use mintgate_core::{AccountId, Amount, Count, Hash256, ItemId, PhaseState, Policy};

use crate::admin::AdminCapability;
use crate::engine::IssuanceEngine;
use crate::ledger::AllowanceLedger;
use crate::registry::InMemoryRegistry;
use crate::supply::SupplyCounter;

/// Current snapshot layout version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Errors from snapshot persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Snapshot is not valid JSON for the expected layout.
    #[error("snapshot serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Snapshot parsed but violates an engine invariant.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    /// Refused to overwrite an existing snapshot.
    #[error("snapshot already exists at {0}")]
    AlreadyExists(PathBuf),

    /// Another process holds the snapshot lock.
    #[error("snapshot is locked by another process ({path}): {source}")]
    Locked {
        /// Lock file involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Exclusive ownership of a snapshot. Released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// The lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to release snapshot lock");
        }
    }
}

/// Every persisted field of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub name: String,
    pub symbol: String,
    pub policy: Policy,
    pub phase: PhaseState,
    pub allowlist_root: Option<Hash256>,
    pub ledger: BTreeMap<AccountId, Count>,
    pub issued: Count,
    pub owners: BTreeMap<ItemId, AccountId>,
    pub royalty_receiver: AccountId,
    pub proceeds: Amount,
    pub capability_id: Uuid,
}

impl IssuanceEngine<InMemoryRegistry> {
    /// Capture the full engine state.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            policy: self.policy.clone(),
            phase: self.phase.clone(),
            allowlist_root: self.allowlist_root,
            ledger: self.ledger.entries().clone(),
            issued: self.supply.issued(),
            owners: self.registry.owners().clone(),
            royalty_receiver: self.royalty_receiver,
            proceeds: self.proceeds,
            capability_id: self.admin.id(),
        }
    }

    /// Rebuild an engine and its capability from a snapshot.
    pub fn restore(snapshot: EngineSnapshot) -> Result<(Self, AdminCapability), StoreError> {
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported schema version {} (expected {SNAPSHOT_SCHEMA_VERSION})",
                snapshot.schema_version
            )));
        }
        let supply = SupplyCounter::restore(snapshot.issued, snapshot.policy.supply_ceiling())
            .ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "issued {} exceeds supply ceiling {}",
                    snapshot.issued,
                    snapshot.policy.supply_ceiling()
                ))
            })?;
        let registry = InMemoryRegistry::from_owners(snapshot.owners);
        if !registry.is_contiguous_to(snapshot.issued) {
            return Err(StoreError::Corrupt(format!(
                "registry does not hold exactly ids 1..={}",
                snapshot.issued
            )));
        }

        let admin = AdminCapability::from_uuid(snapshot.capability_id);
        let engine = Self {
            name: snapshot.name,
            symbol: snapshot.symbol,
            policy: snapshot.policy,
            phase: snapshot.phase,
            allowlist_root: snapshot.allowlist_root,
            ledger: AllowanceLedger::from_entries(snapshot.ledger),
            supply,
            registry,
            royalty_receiver: snapshot.royalty_receiver,
            proceeds: snapshot.proceeds,
            admin: admin.clone(),
        };
        Ok((engine, admin))
    }
}

/// JSON file holding one [`EngineSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// A store at `path`. Nothing is touched until `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the snapshot, or `None` when the file does not exist.
    pub fn load(&self) -> Result<Option<EngineSnapshot>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Load and restore an engine, or `None` when no snapshot exists.
    pub fn load_engine(
        &self,
    ) -> Result<Option<(IssuanceEngine<InMemoryRegistry>, AdminCapability)>, StoreError> {
        self.load()?.map(IssuanceEngine::restore).transpose()
    }

    /// Take the exclusive lock guarding this snapshot. Fails immediately
    /// if another holder has it.
    pub fn lock(&self) -> Result<StoreLock, StoreError> {
        self.ensure_parent()?;
        let path = self.sibling_path(".lock");
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        file.try_lock_exclusive()
            .map_err(|source| StoreError::Locked {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "snapshot lock acquired");
        Ok(StoreLock { file, path })
    }

    /// Atomically replace the snapshot.
    pub fn save(&self, snapshot: &EngineSnapshot) -> Result<(), StoreError> {
        self.ensure_parent()?;
        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.sibling_path(".tmp");

        let mut file = File::create(&tmp).map_err(io_error(&tmp))?;
        file.write_all(&json).map_err(io_error(&tmp))?;
        file.sync_all().map_err(io_error(&tmp))?;
        drop(file);

        std::fs::rename(&tmp, &self.path).map_err(io_error(&self.path))?;
        self.sync_parent()?;
        tracing::debug!(path = %self.path.display(), issued = snapshot.issued, "snapshot saved");
        Ok(())
    }

    /// Save a fresh snapshot, refusing to overwrite an existing one.
    pub fn create(&self, snapshot: &EngineSnapshot) -> Result<(), StoreError> {
        if self.exists() {
            return Err(StoreError::AlreadyExists(self.path.clone()));
        }
        self.save(snapshot)
    }

    fn parent(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Make the rename itself durable.
    #[cfg(unix)]
    fn sync_parent(&self) -> Result<(), StoreError> {
        let parent = self.parent().unwrap_or_else(|| Path::new("."));
        File::open(parent)
            .and_then(|dir| dir.sync_all())
            .map_err(io_error(parent))
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(b: u8) -> AccountId {
        AccountId::new([b; 20])
    }

    fn engine() -> (IssuanceEngine, AdminCapability) {
        let policy = Policy::new(Amount(10), 5, 3, 250).unwrap();
        let phase = PhaseState {
            issuance_enabled: true,
            public_sale_open: true,
            ..PhaseState::default()
        };
        IssuanceEngine::new("Snap", "SNP", policy, phase, acct(0xaa))
    }

    #[test]
    fn test_save_load_restores_engine_and_capability() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested/state.json"));
        assert!(store.load().unwrap().is_none());

        let (mut e, cap) = engine();
        e.issue_public(acct(1), 2, Amount(20)).unwrap();
        e.set_allowlist_root(&cap, Hash256::ZERO).unwrap();
        store.save(&e.snapshot()).unwrap();

        let (mut back, back_cap) = store.load_engine().unwrap().unwrap();
        assert_eq!(back.status(), e.status());
        assert_eq!(back.owned_items(&acct(1)), vec![ItemId(1), ItemId(2)]);
        assert_eq!(back_cap.id(), cap.id());
        // The original capability still works against the restored engine.
        back.reveal(&cap).unwrap();
        assert_eq!(back.issue_public(acct(2), 1, Amount(10)).unwrap().ids, vec![ItemId(3)]);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = SnapshotStore::new(&path);
        let (e, _) = engine();
        store.save(&e.snapshot()).unwrap();
        store.save(&e.snapshot()).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|d| d.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn test_save_replaces_stale_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(dir.path().join("state.json.tmp"), b"{\"partial\":").unwrap();
        let store = SnapshotStore::new(&path);
        let (mut e, _) = engine();
        e.issue_public(acct(1), 1, Amount(10)).unwrap();
        store.save(&e.snapshot()).unwrap();

        assert!(!dir.path().join("state.json.tmp").exists());
        assert_eq!(store.load().unwrap().unwrap().issued, 1);
    }

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested/state.json"));
        let held = store.lock().unwrap();
        assert!(held.path().ends_with("state.json.lock"));

        let other = SnapshotStore::new(store.path());
        assert!(matches!(other.lock(), Err(StoreError::Locked { .. })));

        drop(held);
        assert!(other.lock().is_ok());
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("state.json"));
        let (e, _) = engine();
        store.create(&e.snapshot()).unwrap();
        assert!(matches!(
            store.create(&e.snapshot()),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_restore_rejects_issued_over_ceiling() {
        let (e, _) = engine();
        let mut snap = e.snapshot();
        snap.issued = 6;
        assert!(matches!(
            IssuanceEngine::restore(snap),
            Err(StoreError::Corrupt(msg)) if msg.contains("ceiling")
        ));
    }

    #[test]
    fn test_restore_rejects_registry_mismatch() {
        let (mut e, _) = engine();
        e.issue_public(acct(1), 2, Amount(20)).unwrap();
        let mut snap = e.snapshot();
        snap.owners.remove(&ItemId(1));
        snap.owners.insert(ItemId(3), acct(1));
        assert!(matches!(
            IssuanceEngine::restore(snap),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_invalid_policy_in_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("state.json"));
        let (e, _) = engine();
        store.save(&e.snapshot()).unwrap();
        let text = std::fs::read_to_string(store.path()).unwrap();
        std::fs::write(
            store.path(),
            text.replace("\"supply_ceiling\": 5", "\"supply_ceiling\": 0"),
        )
        .unwrap();
        assert!(matches!(store.load(), Err(StoreError::Serde(_))));
    }
}
