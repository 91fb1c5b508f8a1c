//! # Base-Unit Amounts
//!
//! `Amount` is a payment or price in indivisible base units. Serialized as a
//! decimal string so values above 2^53 survive JSON consumers; plain integers
//! are accepted on input.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A non-negative amount in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub u128);

impl Amount {
    /// Zero base units.
    pub const ZERO: Amount = Amount(0);

    /// Wrap a raw base-unit value.
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    /// Access the raw value.
    pub fn get(&self) -> u128 {
        self.0
    }

    /// `self * quantity`, or `None` on overflow.
    pub fn checked_mul(self, quantity: u64) -> Option<Amount> {
        self.0.checked_mul(u128::from(quantity)).map(Amount)
    }

    /// `self + other`, clamped at `u128::MAX`.
    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Parse a base-10 integer string.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidAmount(s.to_string()));
        }
        trimmed
            .parse::<u128>()
            .map(Amount)
            .map_err(|_| ValidationError::InvalidAmount(s.to_string()))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for Amount {
    fn from(v: u64) -> Self {
        Self(u128::from(v))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a non-negative integer or decimal integer string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
        Ok(Amount(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        u64::try_from(v)
            .map(Amount::from)
            .map_err(|_| E::custom(format!("amount must be non-negative, got {v}")))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_digits_only() {
        assert_eq!(Amount::parse("30").unwrap(), Amount(30));
        assert_eq!(Amount::parse(" 7 ").unwrap(), Amount(7));
        assert!(Amount::parse("-1").is_err());
        assert!(Amount::parse("1.5").is_err());
        assert!(Amount::parse("").is_err());
        assert!(Amount::parse("+3").is_err());
    }

    #[test]
    fn checked_mul_detects_overflow() {
        assert_eq!(Amount(10).checked_mul(3), Some(Amount(30)));
        assert_eq!(Amount(u128::MAX).checked_mul(2), None);
        assert_eq!(Amount(u128::MAX).checked_mul(0), Some(Amount::ZERO));
    }

    #[test]
    fn serde_string_and_integer_forms() {
        let a = Amount(340_282_366_920_938_463_463_374_607_431_768_211_455);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"340282366920938463463374607431768211455\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);

        let from_int: Amount = serde_json::from_str("25").unwrap();
        assert_eq!(from_int, Amount(25));
        assert!(serde_json::from_str::<Amount>("-4").is_err());
    }
}
