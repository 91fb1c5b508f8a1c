//! # Issuance Executor
//!
//! Assigns ids `issued+1 ..= issued+quantity` and advances the supply
//! counter. The ceiling is re-checked here on every call; the gate's check
//! is only an early exit. Nothing is minted unless the whole request fits.

use std::collections::BTreeSet;

use mintgate_core::{AccountId, Count, IssuanceError, ItemId};

use crate::registry::TokenRegistry;
use crate::supply::SupplyCounter;

/// Mint `quantity` sequential ids to `recipient`.
pub fn issue<R: TokenRegistry>(
    supply: &mut SupplyCounter,
    registry: &mut R,
    recipient: AccountId,
    quantity: Count,
) -> Result<Vec<ItemId>, IssuanceError> {
    if quantity == 0 {
        return Err(IssuanceError::ZeroQuantity);
    }
    supply.check(quantity)?;

    let ids: Vec<ItemId> = (0..quantity).map(|_| registry.mint_next(recipient)).collect();
    supply.advance(quantity);
    debug_assert_eq!(ids.last().map(ItemId::get), Some(supply.issued()));
    Ok(ids)
}

/// Mint one id to each of `recipients`, in order.
///
/// Skips phase, payment and allowance checks; callers must hold the admin
/// capability. Rejects an empty batch and repeated recipients.
pub fn issue_batch<R: TokenRegistry>(
    supply: &mut SupplyCounter,
    registry: &mut R,
    recipients: &[AccountId],
) -> Result<Vec<ItemId>, IssuanceError> {
    if recipients.is_empty() {
        return Err(IssuanceError::ZeroQuantity);
    }
    let mut seen = BTreeSet::new();
    for r in recipients {
        if !seen.insert(r) {
            return Err(IssuanceError::DuplicateRecipient(r.to_string()));
        }
    }
    let quantity = recipients.len() as Count;
    supply.check(quantity)?;

    let ids: Vec<ItemId> = recipients.iter().map(|r| registry.mint_next(*r)).collect();
    supply.advance(quantity);
    Ok(ids)
}
