//! # Phase & Policy Gate
//!
//! Decides whether a request is admissible before any state is touched.
//! Pure: reads the policy, the phase flags and the issued count; returns the
//! required cost on success.
//!
//! ## Check Order
//!
//! 1. `IssuanceDisabled`
//! 2. `ZeroQuantity`
//! 3. Public only: `PublicSaleClosed`, then `PerRequestLimitExceeded`
//! 4. `InsufficientPayment`
//! 5. `SupplyCeilingExceeded` (early exit; the executor re-checks)
//!
//! Presale quantity has no per-request cap: it is bounded by the proven
//! allowance alone.

use mintgate_core::{Amount, Count, IssuanceError, PhaseState, Policy};

/// The issuance path a request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Proof-less request, open only during the public sale.
    Public,
    /// Allowlisted request carrying an allowance proof.
    Presale,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Presale => f.write_str("presale"),
        }
    }
}

/// Outcome of a successful admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// `unit_cost * quantity`.
    pub cost: Amount,
}

/// Admit or reject a request.
pub fn admit(
    policy: &Policy,
    phase: &PhaseState,
    issued: Count,
    kind: RequestKind,
    quantity: Count,
    payment_offered: Amount,
) -> Result<Admission, IssuanceError> {
    if !phase.issuance_enabled {
        return Err(IssuanceError::IssuanceDisabled);
    }
    if quantity == 0 {
        return Err(IssuanceError::ZeroQuantity);
    }
    if kind == RequestKind::Public {
        if !phase.public_sale_open {
            return Err(IssuanceError::PublicSaleClosed);
        }
        if quantity > policy.max_per_request() {
            return Err(IssuanceError::PerRequestLimitExceeded {
                requested: quantity,
                limit: policy.max_per_request(),
            });
        }
    }

    let cost = match policy.unit_cost().checked_mul(quantity) {
        Some(cost) if payment_offered >= cost => cost,
        Some(cost) => {
            return Err(IssuanceError::InsufficientPayment {
                offered: payment_offered.to_string(),
                required: cost.to_string(),
            })
        }
        None => {
            return Err(IssuanceError::InsufficientPayment {
                offered: payment_offered.to_string(),
                required: "overflow".to_string(),
            })
        }
    };

    let remaining = policy.supply_ceiling().saturating_sub(issued);
    if quantity > remaining {
        return Err(IssuanceError::SupplyCeilingExceeded {
            requested: quantity,
            remaining,
        });
    }

    Ok(Admission { cost })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> Policy {
        Policy::new(Amount(10), 5, 3, 0).unwrap()
    }

    fn open() -> PhaseState {
        PhaseState {
            issuance_enabled: true,
            public_sale_open: true,
            ..PhaseState::default()
        }
    }

    #[test]
    fn test_disabled_rejects_everything_first() {
        let phase = PhaseState::default();
        for kind in [RequestKind::Public, RequestKind::Presale] {
            assert_eq!(
                admit(&policy(), &phase, 0, kind, 0, Amount::ZERO),
                Err(IssuanceError::IssuanceDisabled)
            );
        }
    }

    #[test]
    fn test_zero_quantity() {
        assert_eq!(
            admit(&policy(), &open(), 0, RequestKind::Public, 0, Amount(100)),
            Err(IssuanceError::ZeroQuantity)
        );
    }

    #[test]
    fn test_public_closed_regardless_of_payment() {
        let phase = PhaseState {
            issuance_enabled: true,
            ..PhaseState::default()
        };
        assert_eq!(
            admit(&policy(), &phase, 0, RequestKind::Public, 1, Amount(1_000_000)),
            Err(IssuanceError::PublicSaleClosed)
        );
    }

    #[test]
    fn test_public_per_request_limit() {
        assert_eq!(
            admit(&policy(), &open(), 0, RequestKind::Public, 4, Amount(40)),
            Err(IssuanceError::PerRequestLimitExceeded {
                requested: 4,
                limit: 3
            })
        );
    }

    #[test]
    fn test_presale_has_no_per_request_limit() {
        let phase = PhaseState {
            issuance_enabled: true,
            ..PhaseState::default()
        };
        let admission = admit(&policy(), &phase, 0, RequestKind::Presale, 4, Amount(40)).unwrap();
        assert_eq!(admission.cost, Amount(40));
    }

    #[test]
    fn test_insufficient_payment() {
        let err = admit(&policy(), &open(), 0, RequestKind::Public, 3, Amount(29)).unwrap_err();
        assert_eq!(
            err,
            IssuanceError::InsufficientPayment {
                offered: "29".into(),
                required: "30".into()
            }
        );
    }

    #[test]
    fn test_cost_overflow_is_insufficient_payment() {
        let policy = Policy::new(Amount(u128::MAX), 5, 3, 0).unwrap();
        let err = admit(&policy, &open(), 0, RequestKind::Public, 2, Amount(u128::MAX)).unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_PAYMENT");
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn test_ceiling_early_exit() {
        assert_eq!(
            admit(&policy(), &open(), 3, RequestKind::Public, 3, Amount(30)),
            Err(IssuanceError::SupplyCeilingExceeded {
                requested: 3,
                remaining: 2
            })
        );
        assert!(admit(&policy(), &open(), 3, RequestKind::Public, 2, Amount(20)).is_ok());
    }

    #[test]
    fn test_overpayment_admitted() {
        let admission = admit(&policy(), &open(), 0, RequestKind::Public, 1, Amount(99)).unwrap();
        assert_eq!(admission.cost, Amount(10));
    }
}
