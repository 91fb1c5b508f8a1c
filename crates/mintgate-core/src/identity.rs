//! # Identifier Newtypes
//!
//! `AccountId` (a 20-byte account address) and `ItemId` (the sequential id
//! of an issued item). Keeping them distinct types prevents passing an item
//! id where a quantity or an account is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::{decode_hex_fixed, encode_hex};
use crate::error::ValidationError;

/// A 20-byte account address, rendered as `0x` + 40 lowercase hex chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 20]);

impl AccountId {
    /// Wrap raw address bytes.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        decode_hex_fixed::<20>(s)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidAccount(s.to_string()))
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", encode_hex(&self.0))
    }
}

impl std::str::FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Sequential item identifier. The first issued item is `ItemId(1)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Access the inner value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
