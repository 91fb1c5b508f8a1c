//! # Allowance Ledger
//!
//! Per-account cumulative presale consumption. Values only grow; there is
//! no reset, and replacing the allowlist root does not clear them.
//!
//! The bound `consumed <= allowance` is enforced when consuming, against
//! whatever allowance the caller has just proven. It is not stored.

use std::collections::BTreeMap;

use mintgate_core::{AccountId, Count, IssuanceError};

/// Consumed presale quantity per account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowanceLedger {
    consumed: BTreeMap<AccountId, Count>,
}

impl AllowanceLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted entries.
    pub fn from_entries(consumed: BTreeMap<AccountId, Count>) -> Self {
        Self { consumed }
    }

    /// Quantity already consumed by `account`.
    pub fn consumed(&self, account: &AccountId) -> Count {
        self.consumed.get(account).copied().unwrap_or(0)
    }

    /// Check that `quantity` more fits under `allowance`, without recording.
    pub fn ensure_within(
        &self,
        account: &AccountId,
        allowance: Count,
        quantity: Count,
    ) -> Result<(), IssuanceError> {
        let consumed = self.consumed(account);
        match consumed.checked_add(quantity) {
            Some(total) if total <= allowance => Ok(()),
            _ => Err(IssuanceError::AllowanceExceeded {
                consumed,
                requested: quantity,
                allowance,
            }),
        }
    }

    /// Record consumption already cleared by [`Self::ensure_within`].
    pub(crate) fn record(&mut self, account: AccountId, quantity: Count) {
        let entry = self.consumed.entry(account).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Check and record in one step.
    pub fn try_consume(
        &mut self,
        account: AccountId,
        allowance: Count,
        quantity: Count,
    ) -> Result<(), IssuanceError> {
        self.ensure_within(&account, allowance, quantity)?;
        self.record(account, quantity);
        Ok(())
    }

    /// All non-zero entries, ordered by account.
    pub fn entries(&self) -> &BTreeMap<AccountId, Count> {
        &self.consumed
    }
}
