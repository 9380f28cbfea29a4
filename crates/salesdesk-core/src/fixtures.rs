//! # Test Fixtures
//!
//! Builders that assemble sales field by field, including states the
//! public mutators would never produce (wrong discount, stale total,
//! duplicate products). Everything goes through snapshots, so `Sale` keeps
//! no test-only setters.
//!
//! Compiled for this crate's tests and, behind the `test-support` feature,
//! for other crates' test suites.
//!
//! ```rust,ignore
//! use rust_decimal_macros::dec;
//! use salesdesk_core::fixtures::{SaleFixture, SaleItemFixture};
//!
//! let sale = SaleFixture::new()
//!     .item(SaleItemFixture::new(5, dec!(10.00)))
//!     .build();
//!
//! assert_eq!(sale.total_amount().amount(), dec!(45.00));
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::discount::{discount_for_quantity, DiscountRate};
use crate::money::Money;
use crate::sale::Sale;
use crate::types::{SaleItemSnapshot, SaleSnapshot, SaleStatus};

// =============================================================================
// Sale Item Fixture
// =============================================================================

/// Builder for one line. Discount defaults to the tier for the quantity and
/// the total to what that discount yields.
#[derive(Debug, Clone)]
pub struct SaleItemFixture {
    product_id: Uuid,
    product_name: String,
    quantity: i64,
    unit_price: Decimal,
    discount: Option<DiscountRate>,
    total_amount: Option<Decimal>,
    is_cancelled: bool,
}

impl SaleItemFixture {
    pub fn new(quantity: i64, unit_price: Decimal) -> Self {
        SaleItemFixture {
            product_id: Uuid::new_v4(),
            product_name: "Test Product".to_string(),
            quantity,
            unit_price,
            discount: None,
            total_amount: None,
            is_cancelled: false,
        }
    }

    pub fn product_id(mut self, product_id: Uuid) -> Self {
        self.product_id = product_id;
        self
    }

    pub fn product_name(mut self, name: &str) -> Self {
        self.product_name = name.to_string();
        self
    }

    pub fn discount(mut self, discount: DiscountRate) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Overrides the computed total.
    pub fn total_amount(mut self, total: Decimal) -> Self {
        self.total_amount = Some(total);
        self
    }

    pub fn cancelled(mut self) -> Self {
        self.is_cancelled = true;
        self
    }

    fn build(self, sale_id: Uuid, created_at: DateTime<Utc>) -> SaleItemSnapshot {
        let discount = self
            .discount
            .unwrap_or_else(|| discount_for_quantity(self.quantity));
        let unit_price = Money::new(self.unit_price);
        let total_amount = match (self.total_amount, self.is_cancelled) {
            (Some(total), _) => Money::new(total),
            (None, true) => Money::zero(),
            (None, false) => unit_price
                .multiply_quantity(self.quantity)
                .and_then(|subtotal| subtotal.apply_discount(discount))
                .expect("fixture line total out of range"),
        };

        SaleItemSnapshot {
            id: Uuid::new_v4(),
            sale_id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price,
            discount,
            total_amount,
            is_cancelled: self.is_cancelled,
            created_at,
            updated_at: None,
        }
    }
}

// =============================================================================
// Sale Fixture
// =============================================================================

/// Builder for a whole sale. Defaults describe a valid, active sale with no
/// items; the total defaults to the sum of active item totals.
#[derive(Debug, Clone)]
pub struct SaleFixture {
    id: Uuid,
    sale_number: Option<String>,
    sale_date: DateTime<Utc>,
    customer_id: Uuid,
    customer_name: String,
    branch_id: Uuid,
    branch_name: String,
    total_amount: Option<Decimal>,
    status: SaleStatus,
    items: Vec<SaleItemFixture>,
}

impl Default for SaleFixture {
    fn default() -> Self {
        SaleFixture::new()
    }
}

impl SaleFixture {
    pub fn new() -> Self {
        SaleFixture {
            id: Uuid::new_v4(),
            sale_number: None,
            sale_date: Utc::now(),
            customer_id: Uuid::new_v4(),
            customer_name: "Test Customer".to_string(),
            branch_id: Uuid::new_v4(),
            branch_name: "Test Branch".to_string(),
            total_amount: None,
            status: SaleStatus::Active,
            items: Vec::new(),
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn sale_number(mut self, number: &str) -> Self {
        self.sale_number = Some(number.to_string());
        self
    }

    pub fn sale_date(mut self, date: DateTime<Utc>) -> Self {
        self.sale_date = date;
        self
    }

    pub fn customer_id(mut self, customer_id: Uuid) -> Self {
        self.customer_id = customer_id;
        self
    }

    pub fn customer_name(mut self, name: &str) -> Self {
        self.customer_name = name.to_string();
        self
    }

    pub fn branch_id(mut self, branch_id: Uuid) -> Self {
        self.branch_id = branch_id;
        self
    }

    pub fn branch_name(mut self, name: &str) -> Self {
        self.branch_name = name.to_string();
        self
    }

    /// Overrides the computed total.
    pub fn total_amount(mut self, total: Decimal) -> Self {
        self.total_amount = Some(total);
        self
    }

    /// Sets the status without touching items.
    pub fn status(mut self, status: SaleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn item(mut self, item: SaleItemFixture) -> Self {
        self.items.push(item);
        self
    }

    pub fn snapshot(self) -> SaleSnapshot {
        let created_at = self.sale_date;
        let items: Vec<SaleItemSnapshot> = self
            .items
            .into_iter()
            .map(|item| item.build(self.id, created_at))
            .collect();
        let total_amount = match self.total_amount {
            Some(total) => Money::new(total),
            None => items
                .iter()
                .filter(|item| !item.is_cancelled)
                .map(|item| item.total_amount)
                .sum(),
        };

        SaleSnapshot {
            id: self.id,
            sale_number: self
                .sale_number
                .unwrap_or_else(|| format!("TEST-{}", self.id.simple())),
            sale_date: self.sale_date,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            branch_id: self.branch_id,
            branch_name: self.branch_name,
            total_amount,
            status: self.status,
            created_at,
            updated_at: None,
            items,
        }
    }

    pub fn build(self) -> Sale {
        Sale::from_snapshot(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_produce_consistent_totals() {
        let sale = SaleFixture::new()
            .item(SaleItemFixture::new(3, dec!(10.00)))
            .item(SaleItemFixture::new(5, dec!(20.00)))
            .item(SaleItemFixture::new(2, dec!(7.00)).cancelled())
            .build();

        assert_eq!(sale.total_amount(), Money::new(dec!(120.00)));
        assert_eq!(sale.items()[1].discount(), DiscountRate::STANDARD);
        assert!(sale.items()[2].total_amount().is_zero());
        assert!(sale.items().iter().all(|i| i.sale_id() == sale.id()));
        assert!(sale.validate().is_valid);
    }

    #[test]
    fn test_overrides_are_kept_verbatim() {
        let sale = SaleFixture::new()
            .sale_number("CUSTOM-1")
            .status(SaleStatus::Cancelled)
            .total_amount(dec!(1.23))
            .item(SaleItemFixture::new(1, dec!(1.00)).discount(DiscountRate::BULK))
            .build();

        assert_eq!(sale.sale_number(), "CUSTOM-1");
        assert!(sale.is_cancelled());
        assert_eq!(sale.total_amount(), Money::new(dec!(1.23)));
        assert_eq!(sale.items()[0].discount(), DiscountRate::BULK);
    }
}
