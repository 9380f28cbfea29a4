//! # Sale Item
//!
//! A single line of a sale: product, quantity, price, discount and the
//! derived line total.
//!
//! Items are created and mutated only through their owning
//! [`Sale`](crate::Sale); callers outside the aggregate see them through
//! `Sale::items()` as shared references.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::discount::DiscountRate;
use crate::error::{DomainError, DomainResult};
use crate::money::Money;
use crate::types::SaleItemSnapshot;
use crate::validation::{self, ValidationReport};
use crate::{MAX_ITEM_QUANTITY, MAX_UNIT_PRICE, MIN_ITEM_QUANTITY};

/// A line item in a sale.
///
/// Product name and unit price are frozen at the time the line is added.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleItem {
    id: Uuid,
    sale_id: Uuid,
    product_id: Uuid,
    product_name: String,
    quantity: i64,
    unit_price: Money,
    discount: DiscountRate,
    total_amount: Money,
    is_cancelled: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl SaleItem {
    /// Creates an active line and computes its total.
    ///
    /// The caller has already validated quantity and price and chosen the
    /// discount tier; the item does not re-derive it.
    ///
    /// ## Errors
    /// `AmountOverflow` if the line total cannot be represented.
    pub fn new(
        sale_id: Uuid,
        product_id: Uuid,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        discount: DiscountRate,
    ) -> DomainResult<Self> {
        let total_amount = line_total(unit_price, quantity, discount)?;
        Ok(SaleItem {
            id: Uuid::new_v4(),
            sale_id,
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
            discount,
            total_amount,
            is_cancelled: false,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Rebuilds an item from stored data without recomputing anything.
    pub fn from_snapshot(snapshot: SaleItemSnapshot) -> Self {
        SaleItem {
            id: snapshot.id,
            sale_id: snapshot.sale_id,
            product_id: snapshot.product_id,
            product_name: snapshot.product_name,
            quantity: snapshot.quantity,
            unit_price: snapshot.unit_price,
            discount: snapshot.discount,
            total_amount: snapshot.total_amount,
            is_cancelled: snapshot.is_cancelled,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    /// Copies every field into a snapshot.
    pub fn snapshot(&self) -> SaleItemSnapshot {
        SaleItemSnapshot {
            id: self.id,
            sale_id: self.sale_id,
            product_id: self.product_id,
            product_name: self.product_name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            total_amount: self.total_amount,
            is_cancelled: self.is_cancelled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sale_id(&self) -> Uuid {
        self.sale_id
    }

    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn discount(&self) -> DiscountRate {
        self.discount
    }

    /// Line total after discount; zero once cancelled.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replaces quantity and discount, then recomputes the total.
    ///
    /// ## Errors
    /// - `ItemCancelled` if the line was cancelled (checked first)
    /// - `InvalidQuantity` / `QuantityLimitExceeded` if the quantity is
    ///   outside `1..=20`
    /// - `AmountOverflow` if the new total cannot be represented
    ///
    /// Nothing changes unless every check passes.
    pub fn update_quantity(&mut self, quantity: i64, discount: DiscountRate) -> DomainResult<()> {
        if self.is_cancelled {
            return Err(DomainError::ItemCancelled { item_id: self.id });
        }
        ensure_quantity_in_range(quantity)?;
        let total_amount = line_total(self.unit_price, quantity, discount)?;

        self.quantity = quantity;
        self.discount = discount;
        self.total_amount = total_amount;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Cancels the line and zeroes its total.
    ///
    /// Not guarded: cancelling twice is allowed here and leaves the item
    /// cancelled.
    pub fn cancel(&mut self) {
        self.is_cancelled = true;
        self.total_amount = Money::zero();
        self.updated_at = Some(Utc::now());
    }

    /// Runs the declarative item rules.
    pub fn validate(&self) -> ValidationReport {
        ValidationReport::from_errors(validation::sale_item_errors(self, None))
    }
}

/// `unit_price × quantity × (1 − discount)`, exact.
fn line_total(unit_price: Money, quantity: i64, discount: DiscountRate) -> DomainResult<Money> {
    unit_price
        .multiply_quantity(quantity)
        .and_then(|subtotal| subtotal.apply_discount(discount))
        .ok_or(DomainError::AmountOverflow)
}

/// Rejects unit prices above `MAX_UNIT_PRICE` in magnitude.
pub(crate) fn ensure_unit_price_in_range(unit_price: Money) -> DomainResult<()> {
    if unit_price.amount().abs() > MAX_UNIT_PRICE.amount() {
        return Err(DomainError::UnitPriceLimitExceeded {
            unit_price,
            max: MAX_UNIT_PRICE,
        });
    }
    Ok(())
}

/// Rejects quantities outside `1..=MAX_ITEM_QUANTITY`.
pub(crate) fn ensure_quantity_in_range(quantity: i64) -> DomainResult<()> {
    if quantity < MIN_ITEM_QUANTITY {
        return Err(DomainError::InvalidQuantity { quantity });
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(DomainError::QuantityLimitExceeded {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
