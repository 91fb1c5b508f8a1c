//! # mintgate-state: Capped Issuance Engine
//!
//! Owns every piece of mutable issuance state and the rules that guard it.
//!
//! ## Components
//!
//! - **Gate** (`gate.rs`): admission of a public or presale request against
//!   the phase flags and policy constants, before any mutation.
//!
//! - **Ledger** (`ledger.rs`): per-account cumulative presale consumption.
//!
//! - **Supply** (`supply.rs`): the issued counter and its immutable ceiling.
//!
//! - **Executor** (`executor.rs`): sequential id assignment. The only code
//!   path that advances the supply counter.
//!
//! - **Registry** (`registry.rs`): the `TokenRegistry` seam to the external
//!   ownership records, plus an in-memory implementation.
//!
//! - **Admin** (`admin.rs`): the `AdminCapability` every privileged mutator
//!   demands.
//!
//! - **Metadata / Royalty** (`metadata.rs`, `royalty.rs`): pure read-side
//!   helpers.
//!
//! - **Engine** (`engine.rs`): `IssuanceEngine` ties the components together.
//!   A request runs admit → verify → consume → issue inside one `&mut self`
//!   call, so callers serialize mutations with a single lock.
//!
//! - **Store** (`store.rs`): JSON snapshots with atomic replace.
//!
//! ## Atomicity
//!
//! Every check runs before the first write. A rejected request leaves the
//! engine byte-for-byte unchanged.

pub mod admin;
pub mod engine;
pub mod executor;
pub mod gate;
pub mod ledger;
pub mod metadata;
pub mod registry;
pub mod royalty;
pub mod store;
pub mod supply;

// ─── Engine re-exports ──────────────────────────────────────────────

pub use engine::{EngineStatus, Issuance, IssuanceEngine};

// ─── Component re-exports ───────────────────────────────────────────

pub use admin::AdminCapability;
pub use gate::{admit, Admission, RequestKind};
pub use ledger::AllowanceLedger;
pub use metadata::{resolve_uri, METADATA_SUFFIX};
pub use registry::{InMemoryRegistry, TokenRegistry};
pub use royalty::royalty_amount;
pub use supply::SupplyCounter;

// ─── Persistence re-exports ─────────────────────────────────────────

pub use store::{EngineSnapshot, SnapshotStore, StoreError, StoreLock, SNAPSHOT_SCHEMA_VERSION};
