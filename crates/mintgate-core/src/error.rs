//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - `IssuanceError` is the request-rejection taxonomy. Every variant is a
//!   deterministic outcome that recurs until preconditions change; none is
//!   transient. Each carries a stable machine code via [`IssuanceError::code`].
//! - `ValidationError` covers parsing of identifiers, amounts, digests and
//!   configuration.
//! - `CryptoError` covers allowlist tree construction.

use thiserror::Error;

/// Rejection outcome of an issuance, query, or administrative request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssuanceError {
    /// Issuance is switched off.
    #[error("issuance is disabled")]
    IssuanceDisabled,

    /// A request for zero items.
    #[error("quantity must be greater than zero")]
    ZeroQuantity,

    /// Public request while the public sale is closed.
    #[error("public sale is closed")]
    PublicSaleClosed,

    /// Public request above the per-request cap.
    #[error("quantity {requested} exceeds the per-request limit of {limit}")]
    PerRequestLimitExceeded {
        /// Quantity asked for.
        requested: u64,
        /// Policy cap.
        limit: u64,
    },

    /// Payment offered does not cover `unit_cost * quantity`.
    #[error("insufficient payment: offered {offered}, required {required}")]
    InsufficientPayment {
        /// Payment offered (base units).
        offered: String,
        /// Required payment, or `"overflow"` when the cost is unrepresentable.
        required: String,
    },

    /// The request would push issued supply past the ceiling.
    #[error("supply ceiling exceeded: {requested} requested, {remaining} remaining")]
    SupplyCeilingExceeded {
        /// Quantity asked for.
        requested: u64,
        /// Items still issuable.
        remaining: u64,
    },

    /// The (account, allowance) pair is not in the committed allowlist.
    #[error("allowlist proof is invalid")]
    AllowlistProofInvalid,

    /// Cumulative presale consumption would exceed the proven allowance.
    #[error("allowance exceeded: {consumed} already consumed, {requested} requested, allowance {allowance}")]
    AllowanceExceeded {
        /// Quantity already consumed by the account.
        consumed: u64,
        /// Quantity asked for.
        requested: u64,
        /// Proven allowance.
        allowance: u64,
    },

    /// Item id was never issued.
    #[error("unknown item {0}")]
    UnknownItem(u64),

    /// Administrative call without the gateway capability.
    #[error("privileged caller required")]
    PrivilegeDenied,

    /// The same recipient appears twice in an administrative batch.
    #[error("duplicate recipient {0} in batch")]
    DuplicateRecipient(String),
}

impl IssuanceError {
    /// Stable machine-readable code for this rejection.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IssuanceDisabled => "ISSUANCE_DISABLED",
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::PublicSaleClosed => "PUBLIC_SALE_CLOSED",
            Self::PerRequestLimitExceeded { .. } => "PER_REQUEST_LIMIT_EXCEEDED",
            Self::InsufficientPayment { .. } => "INSUFFICIENT_PAYMENT",
            Self::SupplyCeilingExceeded { .. } => "SUPPLY_CEILING_EXCEEDED",
            Self::AllowlistProofInvalid => "ALLOWLIST_PROOF_INVALID",
            Self::AllowanceExceeded { .. } => "ALLOWANCE_EXCEEDED",
            Self::UnknownItem(_) => "UNKNOWN_ITEM",
            Self::PrivilegeDenied => "PRIVILEGE_DENIED",
            Self::DuplicateRecipient(_) => "DUPLICATE_RECIPIENT",
        }
    }
}

/// Error parsing or validating an input value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account address is not 20 bytes of hex.
    #[error("invalid account id '{0}': expected 40 hex chars with optional 0x prefix")]
    InvalidAccount(String),

    /// Digest is not 32 bytes of hex.
    #[error("invalid digest '{0}': expected 64 hex chars with optional 0x prefix")]
    InvalidDigest(String),

    /// Amount is not a non-negative base-10 integer that fits in 128 bits.
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// Policy constants violate their invariants.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// Collection configuration could not be parsed.
    #[error("invalid collection config: {0}")]
    InvalidConfig(String),
}

/// Error in allowlist commitment construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// No entries to commit to.
    #[error("allowlist must contain at least one entry")]
    EmptyAllowlist,

    /// The same account appears twice.
    #[error("duplicate allowlist account {0}")]
    DuplicateAccount(String),

    /// The requested account is not part of the tree.
    #[error("account {0} is not in the allowlist")]
    NotInAllowlist(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(IssuanceError::IssuanceDisabled.code(), "ISSUANCE_DISABLED");
        assert_eq!(IssuanceError::ZeroQuantity.code(), "ZERO_QUANTITY");
        assert_eq!(IssuanceError::PublicSaleClosed.code(), "PUBLIC_SALE_CLOSED");
        assert_eq!(
            IssuanceError::SupplyCeilingExceeded {
                requested: 3,
                remaining: 2
            }
            .code(),
            "SUPPLY_CEILING_EXCEEDED"
        );
        assert_eq!(IssuanceError::UnknownItem(7).code(), "UNKNOWN_ITEM");
        assert_eq!(IssuanceError::PrivilegeDenied.code(), "PRIVILEGE_DENIED");
    }

    #[test]
    fn display_carries_context() {
        let err = IssuanceError::AllowanceExceeded {
            consumed: 1,
            requested: 2,
            allowance: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("1 already consumed"));
        assert!(msg.contains("allowance 2"));

        let err = IssuanceError::PerRequestLimitExceeded {
            requested: 4,
            limit: 3,
        };
        assert!(err.to_string().contains("limit of 3"));
    }
}
