//! # Collection Bootstrap
//!
//! Builds the [`AppState`] at startup.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Lock**: when `MINTGATE_STATE` is set, take the snapshot's exclusive
//!    lock and keep it for the life of the process. Startup fails if another
//!    server or a `mintgate` CLI session holds it.
//! 2. **Snapshot**: if `MINTGATE_STATE` points at an existing snapshot,
//!    restore the engine and its capability from it.
//! 3. **Collection config**: otherwise parse `MINTGATE_CONFIG` and create a
//!    fresh engine, writing the first snapshot when a state path is set.
//! 4. Neither available → startup fails.

use std::path::PathBuf;

use mintgate_core::{CollectionConfig, ValidationError};
use mintgate_state::{IssuanceEngine, SnapshotStore, StoreError};

use crate::state::{AppConfig, AppState};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors during startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Collection YAML could not be read or parsed.
    #[error("collection config {path}: {source}")]
    Config {
        path: PathBuf,
        source: ValidationError,
    },

    /// Snapshot could not be loaded or written.
    #[error("snapshot store: {0}")]
    Store(#[from] StoreError),

    /// No snapshot and no collection config.
    #[error("no snapshot found and MINTGATE_CONFIG is not set")]
    MissingCollection,
}

/// Restore or initialize the engine described by `config`.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let store = config.state_path.clone().map(SnapshotStore::new);
    let lock = store.as_ref().map(SnapshotStore::lock).transpose()?;
    let with_lock = |state: AppState| match lock {
        Some(lock) => state.with_store_lock(lock),
        None => state,
    };

    if let Some(store) = &store {
        if let Some((engine, admin)) = store.load_engine()? {
            tracing::info!(
                path = %store.path().display(),
                issued = engine.issued(),
                "engine restored from snapshot"
            );
            return Ok(with_lock(AppState::new(
                engine,
                admin,
                Some(store.clone()),
                config,
            )));
        }
    }

    let path = config
        .collection_config
        .clone()
        .ok_or(BootstrapError::MissingCollection)?;
    let collection = CollectionConfig::from_path(&path)
        .map_err(|source| BootstrapError::Config { path, source })?;
    let (engine, admin) = IssuanceEngine::from_config(&collection);

    match &store {
        Some(store) => {
            store.create(&engine.snapshot())?;
            tracing::info!(path = %store.path().display(), "initial snapshot written");
        }
        None => tracing::warn!("MINTGATE_STATE not set; state will not survive a restart"),
    }

    Ok(with_lock(AppState::new(engine, admin, store, config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"
name: Boot
symbol: BOOT
policy:
  unit_cost: "10"
  supply_ceiling: 5
  max_per_request: 3
royalty_receiver: "0x00000000000000000000000000000000000000aa"
issuance_enabled: true
public_sale_open: true
"#;

    #[test]
    fn missing_everything_fails() {
        assert!(matches!(
            bootstrap(AppConfig::default()),
            Err(BootstrapError::MissingCollection)
        ));
    }

    #[tokio::test]
    async fn initializes_then_restores() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("collection.yaml");
        std::fs::write(&yaml, COLLECTION).unwrap();
        let config = AppConfig {
            state_path: Some(dir.path().join("state.json")),
            collection_config: Some(yaml),
            ..AppConfig::default()
        };

        let first = bootstrap(config.clone()).unwrap();
        assert!(first.holds_store_lock());
        first
            .mutate(|e, _| {
                e.issue_public(mintgate_core::AccountId::new([1; 20]), 2, 20u64.into())
            })
            .await
            .unwrap();

        assert!(matches!(
            bootstrap(config.clone()),
            Err(BootstrapError::Store(StoreError::Locked { .. }))
        ));
        drop(first);

        let second = bootstrap(config).unwrap();
        assert_eq!(second.read(|e| e.issued()), 2);
        assert_eq!(second.read(|e| e.status().name), "Boot");
    }

    #[test]
    fn bad_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("collection.yaml");
        std::fs::write(&yaml, "name: [").unwrap();
        let err = bootstrap(AppConfig {
            collection_config: Some(yaml),
            ..AppConfig::default()
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("collection.yaml"));
    }
}
