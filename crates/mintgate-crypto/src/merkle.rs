//! # Allowlist Merkle Tree
//!
//! Builds a binary Merkle tree over `(account, allowance)` leaves and
//! produces/verifies inclusion proofs against its root.
//!
//! ## Algorithm
//!
//! Domain-separated SHA-256:
//! - Leaf: `SHA256(0x00 || account[20] || allowance as u64 big-endian)`.
//! - Node: `SHA256(0x01 || min(left, right) || max(left, right))`.
//!
//! Children are ordered byte-wise before hashing, so a proof carries no
//! left/right markers: it is the list of siblings from the leaf level up.
//! Levels are built left to right; a trailing unpaired node is promoted to
//! the next level unchanged and contributes no proof element.
//!
//! ## Security Invariant
//!
//! Leaf preimages are 29 bytes with prefix `0x00`; node preimages are 65
//! bytes with prefix `0x01`. An internal node can therefore never be
//! presented as a leaf (second-preimage hardening), and a proof is bound to
//! both the account and the exact allowance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mintgate_core::{sha256, AccountId, Count, CryptoError, Hash256};

/// Longest proof accepted by [`verify_allowance`]. A balanced tree of this
/// depth holds 2^256 leaves, so no honest proof comes close.
pub const MAX_PROOF_LEN: usize = 256;

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

// ---------------------------------------------------------------------------
// Core hashing
// ---------------------------------------------------------------------------

/// Compute the leaf hash for `(account, allowance)`.
pub fn leaf_hash(account: &AccountId, allowance: Count) -> Hash256 {
    let mut input = Vec::with_capacity(1 + 20 + 8);
    input.push(LEAF_PREFIX);
    input.extend_from_slice(account.as_bytes());
    input.extend_from_slice(&allowance.to_be_bytes());
    sha256(&input)
}

/// Compute a parent node hash. Commutative in its arguments.
pub fn node_hash(a: &Hash256, b: &Hash256) -> Hash256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut input = Vec::with_capacity(1 + 32 + 32);
    input.push(NODE_PREFIX);
    input.extend_from_slice(lo.as_bytes());
    input.extend_from_slice(hi.as_bytes());
    sha256(&input)
}

fn next_level(level: &[Hash256]) -> Vec<Hash256> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [a, b] => node_hash(a, b),
            [single] => *single,
            _ => unreachable!("chunks(2) yields one or two elements"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Decide whether `(account, claimed_allowance)` is committed under `root`.
///
/// Pure: reads nothing but its arguments. Returns `true` iff folding the
/// proof from the leaf reproduces `root` byte-for-byte. Over-long proofs are
/// rejected before any hashing.
pub fn verify_allowance(
    account: &AccountId,
    claimed_allowance: Count,
    proof: &[Hash256],
    root: &Hash256,
) -> bool {
    if proof.len() > MAX_PROOF_LEN {
        tracing::debug!(len = proof.len(), "allowlist proof rejected: too long");
        return false;
    }
    let computed = proof
        .iter()
        .fold(leaf_hash(account, claimed_allowance), |acc, sibling| {
            node_hash(&acc, sibling)
        });
    computed == *root
}

/// Parse textual proof elements.
///
/// Returns `None` if any element is not a 32-byte hex digest or the proof
/// exceeds [`MAX_PROOF_LEN`]. Callers treat `None` as an invalid proof.
pub fn parse_proof<S: AsRef<str>>(elements: &[S]) -> Option<Vec<Hash256>> {
    if elements.len() > MAX_PROOF_LEN {
        return None;
    }
    elements
        .iter()
        .map(|e| Hash256::from_hex(e.as_ref()).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Tree construction and proof generation
// ---------------------------------------------------------------------------

/// One committed allowlist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistEntry {
    /// Allowlisted account.
    pub account: AccountId,
    /// Maximum cumulative presale quantity for the account.
    pub allowance: Count,
}

/// A fully materialized allowlist tree.
#[derive(Debug, Clone)]
pub struct AllowlistTree {
    entries: Vec<AllowlistEntry>,
    /// `levels[0]` are the leaf hashes, the last level holds only the root.
    levels: Vec<Vec<Hash256>>,
    index: BTreeMap<AccountId, usize>,
}

impl AllowlistTree {
    /// Build a tree over `entries`, preserving their order.
    ///
    /// Fails on an empty list or when an account appears more than once.
    pub fn build(entries: Vec<AllowlistEntry>) -> Result<Self, CryptoError> {
        if entries.is_empty() {
            return Err(CryptoError::EmptyAllowlist);
        }
        let mut index = BTreeMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.account, i).is_some() {
                return Err(CryptoError::DuplicateAccount(entry.account.to_string()));
            }
        }

        let leaves: Vec<Hash256> = entries
            .iter()
            .map(|e| leaf_hash(&e.account, e.allowance))
            .collect();
        let mut levels = vec![leaves];
        while levels.last().map_or(0, Vec::len) > 1 {
            let next = next_level(&levels[levels.len() - 1]);
            levels.push(next);
        }

        Ok(Self {
            entries,
            levels,
            index,
        })
    }

    /// The commitment root.
    pub fn root(&self) -> Hash256 {
        // `build` guarantees at least one level with exactly one node on top.
        self.levels
            .last()
            .and_then(|top| top.first())
            .copied()
            .unwrap_or(Hash256::ZERO)
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no entries (never true for a built tree).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The committed entries in leaf order.
    pub fn entries(&self) -> &[AllowlistEntry] {
        &self.entries
    }

    /// The committed allowance of `account`, if present.
    pub fn allowance_of(&self, account: &AccountId) -> Option<Count> {
        self.index.get(account).map(|&i| self.entries[i].allowance)
    }

    /// Sibling path for `account`, leaf level first.
    pub fn proof_for(&self, account: &AccountId) -> Result<Vec<Hash256>, CryptoError> {
        let mut pos = *self
            .index
            .get(account)
            .ok_or_else(|| CryptoError::NotInAllowlist(account.to_string()))?;

        let mut proof = Vec::with_capacity(self.levels.len());
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = pos ^ 1;
            if let Some(hash) = level.get(sibling) {
                proof.push(*hash);
            }
            pos /= 2;
        }
        Ok(proof)
    }

    /// Export the root together with every entry's proof.
    pub fn bundle(&self) -> AllowlistBundle {
        let entries = self
            .entries
            .iter()
            .map(|e| BundleEntry {
                account: e.account,
                allowance: e.allowance,
                proof: self.proof_for(&e.account).unwrap_or_default(),
            })
            .collect();
        AllowlistBundle {
            root: self.root(),
            entries,
        }
    }
}

/// Distributable allowlist: the root plus every entry's proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistBundle {
    /// Commitment root to install on the engine.
    pub root: Hash256,
    /// Per-account proofs.
    pub entries: Vec<BundleEntry>,
}

impl AllowlistBundle {
    /// Find the bundle entry of `account`.
    pub fn entry_for(&self, account: &AccountId) -> Option<&BundleEntry> {
        self.entries.iter().find(|e| e.account == *account)
    }
}

/// One account's allowance and proof inside an [`AllowlistBundle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    /// Allowlisted account.
    pub account: AccountId,
    /// Committed allowance.
    pub allowance: Count,
    /// Sibling path, leaf level first.
    pub proof: Vec<Hash256>,
}
