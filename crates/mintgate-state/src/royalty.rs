//! # Royalty Query
//!
//! `amount = floor(sale_value * bps / 10_000)`, split into quotient and
//! remainder so the product never overflows `u128`.

use mintgate_core::{Amount, ROYALTY_BPS_DENOMINATOR};

/// Royalty owed on a sale of `sale_value` at `bps` basis points.
pub fn royalty_amount(sale_value: Amount, bps: u16) -> Amount {
    let denom = u128::from(ROYALTY_BPS_DENOMINATOR);
    let bps = u128::from(bps.min(ROYALTY_BPS_DENOMINATOR));
    let v = sale_value.get();
    Amount((v / denom) * bps + (v % denom) * bps / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fraction() {
        assert_eq!(royalty_amount(Amount(10_000), 500), Amount(500));
        assert_eq!(royalty_amount(Amount(199), 500), Amount(9));
        assert_eq!(royalty_amount(Amount(1_000), 0), Amount::ZERO);
        assert_eq!(royalty_amount(Amount(1_000), 10_000), Amount(1_000));
    }

    #[test]
    fn test_no_overflow_at_max() {
        assert_eq!(royalty_amount(Amount(u128::MAX), 10_000), Amount(u128::MAX));
        let half = royalty_amount(Amount(u128::MAX), 5_000);
        assert_eq!(half, Amount(u128::MAX / 2));
    }
}
