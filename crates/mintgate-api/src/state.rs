//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor.
//!
//! The engine sits behind one `parking_lot::RwLock`, and readers only ever
//! see committed state. Mutations are serialized by a `tokio::sync::Mutex`
//! commit gate held for the whole admit → verify → consume → issue → persist
//! sequence: the request runs against a staged copy of the engine, the
//! snapshot is written on the blocking pool, and only then is the staged
//! engine swapped in. The `parking_lot` lock is never held across an
//! `.await`.
//!
//! A file-backed state also holds the snapshot's [`StoreLock`] for the life
//! of the process, so a `mintgate` CLI session cannot write the same file
//! underneath the server.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use mintgate_core::IssuanceError;
use mintgate_state::{AdminCapability, IssuanceEngine, SnapshotStore, StoreLock};

use crate::error::AppError;

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer secret. If `None`, authentication is disabled.
    pub auth_token: Option<String>,
    /// Snapshot file. If `None`, state lives in memory only.
    pub state_path: Option<PathBuf>,
    /// Collection YAML used when no snapshot exists yet.
    pub collection_config: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("state_path", &self.state_path)
            .field("collection_config", &self.collection_config)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            state_path: None,
            collection_config: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from `PORT`, `AUTH_TOKEN`, `MINTGATE_STATE` and
    /// `MINTGATE_CONFIG`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        Self {
            port,
            auth_token: std::env::var("AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
            state_path: std::env::var_os("MINTGATE_STATE").map(PathBuf::from),
            collection_config: std::env::var_os("MINTGATE_CONFIG").map(PathBuf::from),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<IssuanceEngine>>,
    admin: Arc<AdminCapability>,
    store: Option<SnapshotStore>,
    commit_gate: Arc<Mutex<()>>,
    store_lock: Option<Arc<StoreLock>>,
    pub config: AppConfig,
}

impl AppState {
    /// Wrap an engine and its capability. With a `store`, every successful
    /// mutation is persisted before the response is sent.
    pub fn new(
        engine: IssuanceEngine,
        admin: AdminCapability,
        store: Option<SnapshotStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            admin: Arc::new(admin),
            store,
            commit_gate: Arc::new(Mutex::new(())),
            store_lock: None,
            config,
        }
    }

    /// Keep `lock` alive for as long as any clone of this state exists.
    pub fn with_store_lock(mut self, lock: StoreLock) -> Self {
        self.store_lock = Some(Arc::new(lock));
        self
    }

    /// Whether this state owns its snapshot's lock.
    pub fn holds_store_lock(&self) -> bool {
        self.store_lock.is_some()
    }

    /// Run `f` under the shared read lock.
    pub fn read<R>(&self, f: impl FnOnce(&IssuanceEngine) -> R) -> R {
        let engine = self.engine.read();
        f(&*engine)
    }

    /// Apply `f` and, with a store, persist before publishing the result.
    ///
    /// A rejection from `f` leaves the engine untouched and skips the save.
    /// If the save fails, the staged engine is discarded and the request is
    /// reported as an internal error.
    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut IssuanceEngine, &AdminCapability) -> Result<R, IssuanceError>,
    ) -> Result<R, AppError> {
        let Some(store) = &self.store else {
            let mut engine = self.engine.write();
            return Ok(f(&mut *engine, &*self.admin)?);
        };

        let _gate = self.commit_gate.lock().await;
        let mut staged = self.engine.read().clone();
        let out = f(&mut staged, &*self.admin)?;

        let snapshot = staged.snapshot();
        let store = store.clone();
        tokio::task::spawn_blocking(move || store.save(&snapshot))
            .await
            .map_err(|err| AppError::Internal(format!("snapshot writer failed: {err}")))?
            .map_err(|err| {
                tracing::error!(error = %err, "snapshot persist failed, request discarded");
                AppError::from(err)
            })?;

        *self.engine.write() = staged;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintgate_core::{AccountId, Amount, PhaseState, Policy};

    fn state(store: Option<SnapshotStore>) -> AppState {
        let policy = Policy::new(Amount(10), 5, 3, 0).unwrap();
        let phase = PhaseState {
            issuance_enabled: true,
            public_sale_open: true,
            ..PhaseState::default()
        };
        let (engine, admin) =
            IssuanceEngine::new("T", "T", policy, phase, AccountId::new([0xaa; 20]));
        AppState::new(engine, admin, store, AppConfig::default())
    }

    #[test]
    fn config_debug_redacts_token() {
        let cfg = AppConfig {
            auth_token: Some("hunter2".into()),
            ..AppConfig::default()
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("REDACTED"));
    }

    #[tokio::test]
    async fn mutate_persists_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("state.json"));
        let st = state(Some(store.clone()));
        st.mutate(|e, _| e.issue_public(AccountId::new([1; 20]), 1, Amount(10)))
            .await
            .unwrap();
        assert_eq!(store.load().unwrap().unwrap().issued, 1);
        assert_eq!(st.read(|e| e.issued()), 1);
    }

    #[tokio::test]
    async fn rejected_mutation_leaves_engine_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("state.json"));
        let st = state(Some(store.clone()));
        let result = st
            .mutate(|e, _| e.issue_public(AccountId::new([1; 20]), 1, Amount(9)))
            .await;
        assert!(matches!(result, Err(AppError::Rejected(_))));
        assert_eq!(st.read(|e| e.issued()), 0);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_mutations_assign_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("state.json"));
        let st = state(Some(store.clone()));

        let tasks: Vec<_> = (1..=5u8)
            .map(|b| {
                let st = st.clone();
                tokio::spawn(async move {
                    st.mutate(move |e, _| e.issue_public(AccountId::new([b; 20]), 1, Amount(10)))
                        .await
                })
            })
            .collect();
        let mut ids = Vec::new();
        for task in tasks {
            ids.extend(task.await.unwrap().unwrap().ids);
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 5);
        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.issued, 5);
        assert_eq!(saved.owners.len(), 5);
    }

    #[tokio::test]
    async fn mutate_rolls_back_when_persist_fails() {
        let dir = tempfile::tempdir().unwrap();
        // The target is a directory, so the rename cannot succeed.
        let target = dir.path().join("state.json");
        std::fs::create_dir_all(target.join("occupied")).unwrap();
        let st = state(Some(SnapshotStore::new(&target)));

        let result = st
            .mutate(|e, _| e.issue_public(AccountId::new([1; 20]), 1, Amount(10)))
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(st.read(|e| e.issued()), 0);
    }

    #[tokio::test]
    async fn mutate_passes_capability() {
        let st = state(None);
        st.mutate(|e, cap| e.reveal(cap)).await.unwrap();
        assert!(st.read(|e| e.phase().revealed));
    }
}
