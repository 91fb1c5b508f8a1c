//! # API Route Modules
//!
//! - `status`: collection summary and request counters.
//! - `mint`: public and presale issuance for the authenticated caller.
//! - `allowlist`: read-only proof verification against the current root.
//! - `items`: metadata URIs, holdings, allowance consumption, royalties.
//! - `admin`: owner-only mutators backed by the engine's capability.

pub mod admin;
pub mod allowlist;
pub mod items;
pub mod mint;
pub mod status;
