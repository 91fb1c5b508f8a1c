//! # Issuance Policy and Phase Flags
//!
//! `Policy` holds the constants fixed at construction: unit cost, supply
//! ceiling, per-request cap, royalty fraction. `PhaseState` holds the
//! mutable, privileged-write-only flags. No invariant couples the phase
//! flags; any combination is legal.
//!
//! ## Phases
//!
//! ```text
//! issuance_enabled = false                          ──▶ Inactive
//! issuance_enabled = true,  public_sale_open = false ──▶ Presale
//! issuance_enabled = true,  public_sale_open = true  ──▶ Public
//! ```

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::ValidationError;
use crate::Count;

/// Denominator of the royalty fraction (basis points).
pub const ROYALTY_BPS_DENOMINATOR: u16 = 10_000;

/// Immutable issuance policy.
///
/// Fields are private; [`Policy::new`] enforces `supply_ceiling > 0`,
/// `max_per_request > 0` and `royalty_bps <= 10_000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    unit_cost: Amount,
    supply_ceiling: Count,
    max_per_request: Count,
    royalty_bps: u16,
}

impl Policy {
    /// Construct a validated policy.
    pub fn new(
        unit_cost: Amount,
        supply_ceiling: Count,
        max_per_request: Count,
        royalty_bps: u16,
    ) -> Result<Self, ValidationError> {
        if supply_ceiling == 0 {
            return Err(ValidationError::InvalidPolicy(
                "supply_ceiling must be greater than zero".to_string(),
            ));
        }
        if max_per_request == 0 {
            return Err(ValidationError::InvalidPolicy(
                "max_per_request must be greater than zero".to_string(),
            ));
        }
        if royalty_bps > ROYALTY_BPS_DENOMINATOR {
            return Err(ValidationError::InvalidPolicy(format!(
                "royalty_bps must not exceed {ROYALTY_BPS_DENOMINATOR}, got {royalty_bps}"
            )));
        }
        Ok(Self {
            unit_cost,
            supply_ceiling,
            max_per_request,
            royalty_bps,
        })
    }

    /// Price of one item.
    pub fn unit_cost(&self) -> Amount {
        self.unit_cost
    }

    /// Maximum number of items ever issuable.
    pub fn supply_ceiling(&self) -> Count {
        self.supply_ceiling
    }

    /// Maximum quantity of a single public request.
    pub fn max_per_request(&self) -> Count {
        self.max_per_request
    }

    /// Royalty fraction in basis points.
    pub fn royalty_bps(&self) -> u16 {
        self.royalty_bps
    }
}

#[derive(Deserialize)]
struct RawPolicy {
    unit_cost: Amount,
    supply_ceiling: Count,
    max_per_request: Count,
    #[serde(default)]
    royalty_bps: u16,
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPolicy::deserialize(deserializer)?;
        Policy::new(
            raw.unit_cost,
            raw.supply_ceiling,
            raw.max_per_request,
            raw.royalty_bps,
        )
        .map_err(serde::de::Error::custom)
    }
}

/// Derived view of the phase flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Issuance disabled; every issuance request is rejected.
    Inactive,
    /// Only allowlisted (proof-carrying) requests are admissible.
    Presale,
    /// Public requests are admissible as well.
    Public,
}

impl Phase {
    /// Return the string representation of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "INACTIVE",
            Self::Presale => "PRESALE",
            Self::Public => "PUBLIC",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable phase flags and metadata base URI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseState {
    /// Master switch for all issuance paths except the administrative batch.
    pub issuance_enabled: bool,
    /// Whether public (proof-less) requests are admissible.
    pub public_sale_open: bool,
    /// One-way reveal flag for metadata resolution.
    pub revealed: bool,
    /// Metadata base URI (placeholder URI while unrevealed).
    #[serde(default)]
    pub base_uri: String,
}

impl PhaseState {
    /// Current phase derived from the flags.
    pub fn phase(&self) -> Phase {
        match (self.issuance_enabled, self.public_sale_open) {
            (false, _) => Phase::Inactive,
            (true, false) => Phase::Presale,
            (true, true) => Phase::Public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejects_zero_ceiling() {
        let err = Policy::new(Amount(10), 0, 3, 0).unwrap_err();
        assert!(err.to_string().contains("supply_ceiling"));
    }

    #[test]
    fn policy_rejects_zero_per_request() {
        let err = Policy::new(Amount(10), 5, 0, 0).unwrap_err();
        assert!(err.to_string().contains("max_per_request"));
    }

    #[test]
    fn policy_rejects_royalty_above_denominator() {
        assert!(Policy::new(Amount(10), 5, 3, 10_001).is_err());
        assert!(Policy::new(Amount(10), 5, 3, 10_000).is_ok());
    }

    #[test]
    fn policy_deserialize_validates() {
        let ok: Policy = serde_json::from_str(
            r#"{"unit_cost":"10","supply_ceiling":5,"max_per_request":3,"royalty_bps":500}"#,
        )
        .unwrap();
        assert_eq!(ok.unit_cost(), Amount(10));
        assert_eq!(ok.royalty_bps(), 500);

        let bad = serde_json::from_str::<Policy>(
            r#"{"unit_cost":"10","supply_ceiling":0,"max_per_request":3}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn phase_derivation() {
        let mut flags = PhaseState::default();
        assert_eq!(flags.phase(), Phase::Inactive);
        flags.public_sale_open = true;
        assert_eq!(flags.phase(), Phase::Inactive);
        flags.issuance_enabled = true;
        assert_eq!(flags.phase(), Phase::Public);
        flags.public_sale_open = false;
        assert_eq!(flags.phase(), Phase::Presale);
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Inactive.to_string(), "INACTIVE");
        assert_eq!(Phase::Presale.to_string(), "PRESALE");
        assert_eq!(Phase::Public.to_string(), "PUBLIC");
    }
}
