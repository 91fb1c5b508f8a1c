//! # Supply Counter
//!
//! Total items ever issued, bounded by the immutable ceiling. Starts at 0,
//! never decreases. Only the executor may advance it.

use mintgate_core::{Count, IssuanceError};

/// Issued count and its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyCounter {
    issued: Count,
    ceiling: Count,
}

impl SupplyCounter {
    /// A fresh counter at zero.
    pub fn new(ceiling: Count) -> Self {
        Self { issued: 0, ceiling }
    }

    /// Rebuild a counter from persisted state. `None` if `issued > ceiling`.
    pub fn restore(issued: Count, ceiling: Count) -> Option<Self> {
        (issued <= ceiling).then_some(Self { issued, ceiling })
    }

    /// Items issued so far.
    pub fn issued(&self) -> Count {
        self.issued
    }

    /// The immutable ceiling.
    pub fn ceiling(&self) -> Count {
        self.ceiling
    }

    /// Items still issuable.
    pub fn remaining(&self) -> Count {
        self.ceiling - self.issued
    }

    /// Reject `quantity` if it does not fit under the ceiling.
    pub fn check(&self, quantity: Count) -> Result<(), IssuanceError> {
        if quantity > self.remaining() {
            return Err(IssuanceError::SupplyCeilingExceeded {
                requested: quantity,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Advance after a checked mint.
    pub(crate) fn advance(&mut self, quantity: Count) {
        debug_assert!(quantity <= self.remaining());
        self.issued += quantity;
    }
}
