//! # Discount Tiers
//!
//! The quantity → discount table applied to every sale line.
//!
//! ## Tier Table
//! ```text
//! ┌──────────────────┬─────────────┬──────────┐
//! │ Quantity         │ Tier        │ Discount │
//! ├──────────────────┼─────────────┼──────────┤
//! │ 1 – 3            │ None        │   0%     │
//! │ 4 – 9            │ Standard    │  10%     │
//! │ 10 – 20          │ Bulk        │  20%     │
//! │ ≤ 0 or > 20      │ rejected by Sale before reaching this table │
//! └──────────────────┴─────────────┴──────────┘
//! ```
//!
//! The tier is a pure function of quantity. `SaleItem` never derives it on
//! its own: `Sale` computes it and hands it down.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Lowest quantity that earns the standard discount.
pub const STANDARD_TIER_MIN: i64 = 4;

/// Lowest quantity that earns the bulk discount.
pub const BULK_TIER_MIN: i64 = 10;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount expressed as a fraction (0.10 = 10%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountRate(Decimal);

impl DiscountRate {
    /// No discount.
    pub const NONE: DiscountRate = DiscountRate(Decimal::ZERO);

    /// 10% off, quantities 4 – 9.
    pub const STANDARD: DiscountRate = DiscountRate(dec!(0.10));

    /// 20% off, quantities 10 – 20.
    pub const BULK: DiscountRate = DiscountRate(dec!(0.20));

    /// Wraps an arbitrary fraction.
    ///
    /// Used when rehydrating stored items; range checks belong to validation.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        DiscountRate(value)
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a percentage (10 for 10%).
    pub fn percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// Checks if no discount applies.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::NONE
    }
}

// =============================================================================
// Discount Tier
// =============================================================================

/// Quantity band determining the discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTier {
    /// 1 – 3 items.
    None,
    /// 4 – 9 items.
    Standard,
    /// 10 – 20 items.
    Bulk,
}

impl DiscountTier {
    /// Returns the tier for a quantity.
    ///
    /// Only meaningful for `1..=MAX_ITEM_QUANTITY`; callers reject anything
    /// else first.
    pub const fn for_quantity(quantity: i64) -> Self {
        if quantity >= BULK_TIER_MIN {
            DiscountTier::Bulk
        } else if quantity >= STANDARD_TIER_MIN {
            DiscountTier::Standard
        } else {
            DiscountTier::None
        }
    }

    /// Returns the discount rate for this tier.
    pub const fn rate(&self) -> DiscountRate {
        match self {
            DiscountTier::None => DiscountRate::NONE,
            DiscountTier::Standard => DiscountRate::STANDARD,
            DiscountTier::Bulk => DiscountRate::BULK,
        }
    }
}

/// Returns the discount rate for a quantity.
///
/// ## Example
/// ```rust
/// use salesdesk_core::{discount_for_quantity, DiscountRate};
///
/// assert_eq!(discount_for_quantity(3), DiscountRate::NONE);
/// assert_eq!(discount_for_quantity(4), DiscountRate::STANDARD);
/// assert_eq!(discount_for_quantity(10), DiscountRate::BULK);
/// ```
pub const fn discount_for_quantity(quantity: i64) -> DiscountRate {
    DiscountTier::for_quantity(quantity).rate()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};
    use proptest::prelude::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(DiscountTier::for_quantity(1), DiscountTier::None);
        assert_eq!(DiscountTier::for_quantity(3), DiscountTier::None);
        assert_eq!(DiscountTier::for_quantity(4), DiscountTier::Standard);
        assert_eq!(DiscountTier::for_quantity(9), DiscountTier::Standard);
        assert_eq!(DiscountTier::for_quantity(10), DiscountTier::Bulk);
        assert_eq!(DiscountTier::for_quantity(20), DiscountTier::Bulk);
    }

    #[test]
    fn test_rates() {
        assert_eq!(DiscountRate::NONE.value(), dec!(0));
        assert_eq!(DiscountRate::STANDARD.value(), dec!(0.10));
        assert_eq!(DiscountRate::BULK.value(), dec!(0.2));
        assert_eq!(DiscountRate::BULK.percentage(), dec!(20));
        assert!(DiscountRate::default().is_zero());
    }

    proptest! {
        #[test]
        fn prop_tier_matches_table(q in MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY) {
            let expected = if q >= 10 {
                dec!(0.20)
            } else if q >= 4 {
                dec!(0.10)
            } else {
                dec!(0)
            };
            prop_assert_eq!(discount_for_quantity(q).value(), expected);
        }

        #[test]
        fn prop_tier_is_monotonic(a in 1i64..=20, b in 1i64..=20) {
            prop_assume!(a <= b);
            prop_assert!(discount_for_quantity(a) <= discount_for_quantity(b));
        }
    }
}
