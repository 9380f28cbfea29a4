//! # Money Module
//!
//! Provides the `Money` type for monetary values.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floating point:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A line of 7 × 3.35 at 10% off must total exactly 21.105.             │
//! │  Totals are sums of many such lines, so drift accumulates.             │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal (rust_decimal)                           │
//! │    7 × 3.35 × 0.90 = 21.105 exactly                                     │
//! │    No rounding step in the core. Storage keeps full precision.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal_macros::dec;
//! use salesdesk_core::money::Money;
//!
//! let price = Money::new(dec!(10.00));
//! let line = price.multiply_quantity(3).unwrap();
//! assert_eq!(line, Money::from_cents(3000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use crate::discount::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount with exact decimal precision.
///
/// ## Design Decisions
/// - **Decimal, not cents**: discounts of 10% and 20% on arbitrary prices
///   produce fractional cents; the core keeps them instead of rounding
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Equality is numeric**: `45.00 == 45.0000`
///
/// ## Where Money is Used
/// ```text
/// SaleItem.unit_price ──► multiply_quantity ──► apply_discount ──► SaleItem.total_amount
///                                                                        │
///                                              Σ active items ◄──────────┘
///                                                     │
///                                                     ▼
///                                              Sale.total_amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from an integer number of cents.
    ///
    /// ## Example
    /// ```rust
    /// use salesdesk_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal amount at full precision.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies money by a quantity.
    ///
    /// Returns `None` when the product leaves the `Decimal` range.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use salesdesk_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3), Some(Money::from_cents(897)));
    ///
    /// assert_eq!(Money::new(Decimal::MAX).multiply_quantity(2), None);
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// `amount × (1 − rate)`, exact, no rounding. `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use salesdesk_core::{DiscountRate, Money};
    ///
    /// let subtotal = Money::from_cents(5000);
    /// let discounted = subtotal.apply_discount(DiscountRate::STANDARD);
    /// assert_eq!(discounted, Some(Money::from_cents(4500)));
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Option<Money> {
        let factor = Decimal::ONE.checked_sub(rate.value())?;
        self.0.checked_mul(factor).map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rendering for logs and debugging. Storage uses `amount()`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}${:.2}", sign, self.0.abs())
    }
}

/// Parses the full-precision string form written by `amount().to_string()`.
impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
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
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(Money::new(dec!(45.00)), Money::new(dec!(45.0000)));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(a.multiply_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));

        let mut c = a;
        c += b;
        assert_eq!(c, Money::from_cents(1500));
    }

    #[test]
    fn test_apply_discount_keeps_fractional_cents() {
        // 7 × 3.35 = 23.45, minus 10% = 21.105
        let line = Money::new(dec!(3.35)).multiply_quantity(7).unwrap();
        let discounted = line.apply_discount(DiscountRate::STANDARD).unwrap();
        assert_eq!(discounted.amount(), dec!(21.105));
    }

    #[test]
    fn test_overflow_is_reported_not_raised() {
        let huge = Money::new(Decimal::MAX / Decimal::from(10));

        assert_eq!(huge.multiply_quantity(20), None);
        assert!(huge.multiply_quantity(1).is_some());
        assert_eq!(Money::new(Decimal::MAX).checked_add(Money::from_cents(100)), None);
        assert_eq!(Money::new(Decimal::MIN).multiply_quantity(20), None);
    }

    #[test]
    fn test_sum() {
        let values = [Money::from_cents(3000), Money::from_cents(9000)];
        let total: Money = values.iter().sum();
        assert_eq!(total, Money::from_cents(12000));

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_parse_round_trip_preserves_precision() {
        let original = Money::new(dec!(21.105));
        let parsed: Money = original.amount().to_string().parse().unwrap();
        assert_eq!(parsed.amount().to_string(), "21.105");
        assert!("not money".parse::<Money>().is_err());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }
}
