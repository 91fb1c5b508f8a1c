//! # Collection Configuration
//!
//! The YAML document an operator writes once to create a collection.
//! It fixes the [`Policy`] and seeds the initial phase flags, metadata URI,
//! royalty receiver and (optionally) the allowlist root.
//!
//! ```yaml
//! name: Example Collection
//! symbol: EXC
//! policy:
//!   unit_cost: "10000000000000000"
//!   supply_ceiling: 5000
//!   max_per_request: 5
//!   royalty_bps: 500
//! base_uri: ipfs://placeholder/hidden.json
//! royalty_receiver: "0x00000000000000000000000000000000000000aa"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::digest::Hash256;
use crate::error::ValidationError;
use crate::identity::AccountId;
use crate::policy::{PhaseState, Policy};

/// Configuration used to initialize a fresh collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Human-readable collection name.
    pub name: String,
    /// Short ticker symbol.
    pub symbol: String,
    /// Immutable issuance policy.
    pub policy: Policy,
    /// Initial metadata base URI.
    #[serde(default)]
    pub base_uri: String,
    /// Initial royalty receiver.
    pub royalty_receiver: AccountId,
    /// Initial allowlist commitment root, if the allowlist is already built.
    #[serde(default)]
    pub allowlist_root: Option<Hash256>,
    /// Initial issuance switch.
    #[serde(default)]
    pub issuance_enabled: bool,
    /// Initial public sale switch.
    #[serde(default)]
    pub public_sale_open: bool,
}

impl CollectionConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ValidationError> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| ValidationError::InvalidConfig(e.to_string()))?;
        if config.name.trim().is_empty() {
            return Err(ValidationError::InvalidConfig(
                "name must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Initial phase flags described by this configuration.
    pub fn initial_phase(&self) -> PhaseState {
        PhaseState {
            issuance_enabled: self.issuance_enabled,
            public_sale_open: self.public_sale_open,
            revealed: false,
            base_uri: self.base_uri.clone(),
        }
    }
}
