//! # mintgate-core: Foundational Types
//!
//! The leaf crate of the mintgate workspace. Every other crate depends on
//! `mintgate-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AccountId`, `ItemId`,
//!    `Amount`, `Hash256`: no bare strings or integers crossing crate
//!    boundaries where a typed identifier is meant.
//!
//! 2. **Validated policy.** `Policy::new()` is the only way to obtain a
//!    `Policy`, so a zero supply ceiling or zero per-request cap cannot be
//!    represented.
//!
//! 3. **Single rejection taxonomy.** `IssuanceError` enumerates every
//!    request-rejection outcome, each with a stable machine code.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mintgate-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;
pub mod policy;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use config::CollectionConfig;
pub use digest::{sha256, Hash256};
pub use error::{CryptoError, IssuanceError, ValidationError};
pub use identity::{AccountId, ItemId};
pub use policy::{Phase, PhaseState, Policy, ROYALTY_BPS_DENOMINATOR};

/// Count of items (issued, requested, allowed).
pub type Count = u64;
