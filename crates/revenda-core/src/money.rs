//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing sale prices as floats:                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A KPI fold over thousands of sold units accumulates that drift.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents, Decimal at the Boundary                   │
//! │    Stored and summed as i64 cents                                       │
//! │    Crossed over the wire as an exact decimal number (10.5)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use revenda_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let cost = Money::from_cents(1050); // 10.50
//! assert_eq!(cost.to_decimal(), Decimal::new(1050, 2));
//!
//! let parsed = Money::from_decimal(Decimal::new(105, 1)).unwrap();
//! assert_eq!(parsed, cost);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Profit can be negative when a unit sells below cost
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Wire format**: JSON number in major units, never a string
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  IntakeBatch.unit_cost ──► StockUnit.cost_price (× N units)            │
/// │                                                                         │
/// │  SellRequest.sale_price ──► StockUnit.sale_price                       │
/// │                                                                         │
/// │  Σ sale_price ──► revenue    Σ cost_price ──► cost    revenue − cost   │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use revenda_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from an exact decimal amount in major units.
    ///
    /// Amounts with more than two decimal places are rounded half-to-even
    /// (banker's rounding), so `10.005` becomes `10.00` and `10.015`
    /// becomes `10.02`.
    ///
    /// ## Returns
    /// * `Err(ValidationError::OutOfRange)` - the amount does not fit in i64 cents
    pub fn from_decimal(amount: Decimal) -> Result<Self, ValidationError> {
        let out_of_range = || ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: i64::MIN / 100,
            max: i64::MAX / 100,
        };

        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(out_of_range)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .ok_or_else(out_of_range)?;

        Ok(Money(cents))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the exact decimal value in major units (`1050` → `10.50`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Serialization
// =============================================================================

/// Serializes as a JSON number in major units (`1050` cents → `10.5`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

/// Deserializes from a JSON number in major units.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money with two decimal places.
///
/// ## Note
/// This is for logs. Currency symbols and localization belong to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the i64 bounds. Validated inputs are capped at
// MAX_AMOUNT_CENTS, so real folds stay far below them.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// Summing an iterator of Money (used by every KPI fold).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_decimal_exact() {
        assert_eq!(Money::from_decimal(dec!(10.00)).unwrap().cents(), 1000);
        assert_eq!(Money::from_decimal(dec!(0.01)).unwrap().cents(), 1);
        assert_eq!(Money::from_decimal(dec!(-5.5)).unwrap().cents(), -550);
    }

    #[test]
    fn test_from_decimal_bankers_rounding() {
        assert_eq!(Money::from_decimal(dec!(10.005)).unwrap().cents(), 1000);
        assert_eq!(Money::from_decimal(dec!(10.015)).unwrap().cents(), 1002);
        assert_eq!(Money::from_decimal(dec!(10.0051)).unwrap().cents(), 1001);
    }

    #[test]
    fn test_from_decimal_out_of_range() {
        assert!(Money::from_decimal(Decimal::MAX).is_err());
    }

    #[test]
    fn test_sum_of_huge_amounts_does_not_panic() {
        let huge: Money = serde_json::from_str("90000000000000000").unwrap();
        let total: Money = [huge, huge].iter().sum();
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - huge).cents(), i64::MIN);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((b - a).cents(), -500);
        assert!((b - a).is_negative());

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_json_is_a_number() {
        let json = serde_json::to_value(Money::from_cents(1050)).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(10.5));

        let parsed: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(parsed.cents(), 1050);

        let integral: Money = serde_json::from_str("30").unwrap();
        assert_eq!(integral.cents(), 3000);
    }
}
