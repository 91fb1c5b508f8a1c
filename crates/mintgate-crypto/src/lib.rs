//! # mintgate-crypto: Allowance Commitment
//!
//! Commits a set of `(account, allowance)` pairs to a single 32-byte root so
//! the allowlist can grow without storing every entry alongside the engine.
//!
//! - **Leaf**: `SHA256(0x00 || account[20] || allowance_be[8])`.
//! - **Node**: `SHA256(0x01 || min(a, b) || max(a, b))`.
//! - **Proof**: ordered sibling hashes, leaf level first.
//!
//! The distinct leaf and node prefixes (and input lengths) keep a leaf from
//! ever colliding with an internal node of the same tree.
//!
//! ## Crate Policy
//!
//! - Depends only on `mintgate-core` internally.
//! - Verification never errors: malformed or mismatched input is `false`.

pub mod merkle;

pub use merkle::{
    leaf_hash, node_hash, parse_proof, verify_allowance, AllowlistBundle, AllowlistEntry,
    AllowlistTree, BundleEntry, MAX_PROOF_LEN,
};
