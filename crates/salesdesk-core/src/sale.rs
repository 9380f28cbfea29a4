//! # Sale Aggregate
//!
//! The `Sale` owns its line items and is the only way to change them.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Sale Lifecycle                                 │
//! │                                                                         │
//! │   Sale::new()                                                           │
//! │      │   status = Active, items = [], total = 0                         │
//! │      ▼                                                                  │
//! │   ┌──────────┐  add_item / update_item / cancel_item                    │
//! │   │  Active  │◄─────────────────────────────┐                           │
//! │   └────┬─────┘  update_customer_info        │                           │
//! │        │        update_branch_info ─────────┘                           │
//! │        │ cancel()                                                       │
//! │        ▼                                                                │
//! │   ┌───────────┐                                                         │
//! │   │ Cancelled │  every mutation → SaleCancelled                         │
//! │   └───────────┘  cancel() again  → AlreadyCancelled                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Total Invariant
//! After every successful mutation:
//! `total_amount == Σ item.total_amount for active items`.
//!
//! Every method checks all of its preconditions before touching a field,
//! so a failed call leaves the sale exactly as it was.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::discount::discount_for_quantity;
use crate::error::{DomainError, DomainResult};
use crate::money::Money;
use crate::sale_item::{ensure_quantity_in_range, ensure_unit_price_in_range, SaleItem};
use crate::types::{SaleSnapshot, SaleStatus};
use crate::validation::{self, ValidationReport};

/// A sales transaction and its line items.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    id: Uuid,
    sale_number: String,
    sale_date: DateTime<Utc>,
    customer_id: Uuid,
    customer_name: String,
    branch_id: Uuid,
    branch_name: String,
    total_amount: Money,
    status: SaleStatus,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    items: Vec<SaleItem>,
}

impl Sale {
    /// Creates an empty, active sale.
    ///
    /// Identifier and sale number come from the caller; the sale only
    /// records them. `sale_date` and `created_at` are stamped now.
    pub fn new(
        id: Uuid,
        sale_number: impl Into<String>,
        customer_id: Uuid,
        customer_name: impl Into<String>,
        branch_id: Uuid,
        branch_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Sale {
            id,
            sale_number: sale_number.into(),
            sale_date: now,
            customer_id,
            customer_name: customer_name.into(),
            branch_id,
            branch_name: branch_name.into(),
            total_amount: Money::zero(),
            status: SaleStatus::Active,
            created_at: now,
            updated_at: None,
            items: Vec::new(),
        }
    }

    /// Rebuilds a sale from stored data.
    ///
    /// Stored values are trusted as-is, including the total. Run
    /// [`Sale::validate`] afterwards if the source is not.
    pub fn from_snapshot(snapshot: SaleSnapshot) -> Self {
        Sale {
            id: snapshot.id,
            sale_number: snapshot.sale_number,
            sale_date: snapshot.sale_date,
            customer_id: snapshot.customer_id,
            customer_name: snapshot.customer_name,
            branch_id: snapshot.branch_id,
            branch_name: snapshot.branch_name,
            total_amount: snapshot.total_amount,
            status: snapshot.status,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
            items: snapshot
                .items
                .into_iter()
                .map(SaleItem::from_snapshot)
                .collect(),
        }
    }

    /// Copies every field, items included, into a snapshot.
    pub fn snapshot(&self) -> SaleSnapshot {
        SaleSnapshot {
            id: self.id,
            sale_number: self.sale_number.clone(),
            sale_date: self.sale_date,
            customer_id: self.customer_id,
            customer_name: self.customer_name.clone(),
            branch_id: self.branch_id,
            branch_name: self.branch_name.clone(),
            total_amount: self.total_amount,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items: self.items.iter().map(SaleItem::snapshot).collect(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sale_number(&self) -> &str {
        &self.sale_number
    }

    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    pub fn customer_id(&self) -> Uuid {
        self.customer_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn branch_id(&self) -> Uuid {
        self.branch_id
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    /// Sum of active line totals.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Line items in the order they were added.
    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SaleStatus::Cancelled
    }

    /// Finds the line for a product, cancelled or not.
    pub fn find_item(&self, product_id: Uuid) -> Option<&SaleItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    /// Number of lines that are not cancelled.
    pub fn active_item_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_cancelled()).count()
    }

    // =========================================================================
    // Item Mutations
    // =========================================================================

    /// Adds a new line for a product.
    ///
    /// ## Errors
    /// Checked in this order, first failure wins:
    /// 1. `SaleCancelled`
    /// 2. `InvalidQuantity` (quantity ≤ 0)
    /// 3. `QuantityLimitExceeded` (quantity > 20)
    /// 4. `UnitPriceLimitExceeded` (|unit price| > `MAX_UNIT_PRICE`)
    /// 5. `DuplicateProduct`
    /// 6. `AmountOverflow` (line or sale total not representable)
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use salesdesk_core::{DiscountRate, Money, Sale};
    /// use uuid::Uuid;
    ///
    /// let mut sale = Sale::new(Uuid::new_v4(), "S-1", Uuid::new_v4(), "Ana", Uuid::new_v4(), "Centro");
    /// let item = sale.add_item(Uuid::new_v4(), "Soda", 10, Money::new(dec!(2.50))).unwrap();
    ///
    /// assert_eq!(item.discount(), DiscountRate::BULK);
    /// assert_eq!(item.total_amount(), Money::new(dec!(20.00)));
    /// ```
    pub fn add_item(
        &mut self,
        product_id: Uuid,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> DomainResult<&SaleItem> {
        self.ensure_active("add items")?;
        ensure_quantity_in_range(quantity)?;
        ensure_unit_price_in_range(unit_price)?;
        if self.find_item(product_id).is_some() {
            return Err(DomainError::DuplicateProduct { product_id });
        }

        let item = SaleItem::new(
            self.id,
            product_id,
            product_name,
            quantity,
            unit_price,
            discount_for_quantity(quantity),
        )?;
        let total = sum_active_totals(self.items.iter().chain(std::iter::once(&item)))?;

        self.items.push(item);
        self.total_amount = total;
        self.touch();

        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// Changes the quantity of an existing line and re-derives its discount.
    ///
    /// Product name and unit price stay as they were when the line was added.
    ///
    /// ## Errors
    /// `SaleCancelled`, then `InvalidQuantity` / `QuantityLimitExceeded`,
    /// then `ProductNotFound`. `ItemCancelled` if the line itself was
    /// cancelled, `AmountOverflow` if the new totals are not representable.
    pub fn update_item(&mut self, product_id: Uuid, quantity: i64) -> DomainResult<()> {
        self.ensure_active("update items")?;
        ensure_quantity_in_range(quantity)?;

        let index = self
            .item_index(product_id)
            .ok_or(DomainError::ProductNotFound { product_id })?;
        let mut updated = self.items[index].clone();
        updated.update_quantity(quantity, discount_for_quantity(quantity))?;
        let total = sum_active_totals(
            self.items
                .iter()
                .enumerate()
                .map(|(i, item)| if i == index { &updated } else { item }),
        )?;

        self.items[index] = updated;
        self.total_amount = total;
        self.touch();
        Ok(())
    }

    /// Cancels the line for a product.
    ///
    /// Cancelling a line that is already cancelled succeeds and changes
    /// nothing but `updated_at`.
    ///
    /// ## Errors
    /// `SaleCancelled`, then `ProductNotFound`.
    pub fn cancel_item(&mut self, product_id: Uuid) -> DomainResult<()> {
        self.ensure_active("cancel items")?;

        let index = self
            .item_index(product_id)
            .ok_or(DomainError::ProductNotFound { product_id })?;
        let total = sum_active_totals(
            self.items
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, item)| item),
        )?;

        self.items[index].cancel();
        self.total_amount = total;
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Sale Mutations
    // =========================================================================

    /// Cancels the sale and every line in it.
    ///
    /// ## Errors
    /// `AlreadyCancelled` on the second call. Cancellation is guarded, not a
    /// no-op.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.is_cancelled() {
            return Err(DomainError::AlreadyCancelled { sale_id: self.id });
        }

        self.status = SaleStatus::Cancelled;
        for item in &mut self.items {
            item.cancel();
        }
        self.total_amount = Money::zero();
        self.touch();
        Ok(())
    }

    /// Replaces the denormalized customer identity.
    pub fn update_customer_info(
        &mut self,
        customer_id: Uuid,
        customer_name: impl Into<String>,
    ) -> DomainResult<()> {
        self.ensure_active("update customer info")?;

        self.customer_id = customer_id;
        self.customer_name = customer_name.into();
        self.touch();
        Ok(())
    }

    /// Replaces the denormalized branch identity.
    pub fn update_branch_info(
        &mut self,
        branch_id: Uuid,
        branch_name: impl Into<String>,
    ) -> DomainResult<()> {
        self.ensure_active("update branch info")?;

        self.branch_id = branch_id;
        self.branch_name = branch_name.into();
        self.touch();
        Ok(())
    }

    /// Runs the declarative sale rules, items included.
    pub fn validate(&self) -> ValidationReport {
        ValidationReport::from_errors(validation::sale_errors(self))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_active(&self, operation: &'static str) -> DomainResult<()> {
        if self.is_cancelled() {
            return Err(DomainError::SaleCancelled {
                sale_id: self.id,
                operation,
            });
        }
        Ok(())
    }

    fn item_index(&self, product_id: Uuid) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id() == product_id)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// Sum of the active line totals, or `AmountOverflow`.
fn sum_active_totals<'a>(items: impl IntoIterator<Item = &'a SaleItem>) -> DomainResult<Money> {
    items
        .into_iter()
        .filter(|item| !item.is_cancelled())
        .try_fold(Money::zero(), |acc, item| acc.checked_add(item.total_amount()))
        .ok_or(DomainError::AmountOverflow)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::DiscountRate;
    use crate::error::DomainErrorKind;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn new_sale() -> Sale {
        Sale::new(
            Uuid::new_v4(),
            "SALE-20260101-000001",
            Uuid::new_v4(),
            "Maria Silva",
            Uuid::new_v4(),
            "Downtown",
        )
    }

    fn active_total(sale: &Sale) -> Money {
        sale.items()
            .iter()
            .filter(|i| !i.is_cancelled())
            .map(|i| i.total_amount())
            .sum()
    }

    /// Sale after scenarios A and B: P1 ×3 @ 10.00, P2 ×5 @ 20.00.
    fn scenario_b() -> (Sale, Uuid, Uuid) {
        let mut sale = new_sale();
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        sale.add_item(p1, "Product 1", 3, Money::new(dec!(10.00)))
            .unwrap();
        sale.add_item(p2, "Product 2", 5, Money::new(dec!(20.00)))
            .unwrap();
        (sale, p1, p2)
    }

    #[test]
    fn test_new_sale_is_empty_and_active() {
        let sale = new_sale();

        assert_eq!(sale.status(), SaleStatus::Active);
        assert!(sale.items().is_empty());
        assert!(sale.total_amount().is_zero());
        assert!(sale.updated_at().is_none());
        assert_eq!(sale.sale_date(), sale.created_at());
    }

    #[test]
    fn test_scenario_a_first_item_without_discount() {
        let mut sale = new_sale();
        let item = sale
            .add_item(Uuid::new_v4(), "Product 1", 3, Money::new(dec!(10.00)))
            .unwrap();

        assert_eq!(item.discount(), DiscountRate::NONE);
        assert_eq!(item.sale_id(), sale.id());
        assert_eq!(sale.total_amount(), Money::new(dec!(30.00)));
        assert!(sale.updated_at().is_some());
    }

    #[test]
    fn test_scenario_b_second_item_gets_standard_discount() {
        let (sale, _, p2) = scenario_b();

        let item2 = sale.find_item(p2).unwrap();
        assert_eq!(item2.discount(), DiscountRate::STANDARD);
        assert_eq!(item2.total_amount(), Money::new(dec!(90.00)));
        assert_eq!(sale.total_amount(), Money::new(dec!(120.00)));
        assert_eq!(sale.items()[1].product_id(), p2);
    }

    #[test]
    fn test_scenario_c_duplicate_product_rejected() {
        let (mut sale, p1, _) = scenario_b();
        let before = sale.clone();

        let err = sale
            .add_item(p1, "Product 1", 1, Money::new(dec!(1.00)))
            .unwrap_err();

        assert_eq!(err.kind(), DomainErrorKind::DuplicateProduct);
        assert_eq!(sale, before);
        assert_eq!(sale.total_amount(), Money::new(dec!(120.00)));
    }

    #[test]
    fn test_scenario_d_cancel_cancels_every_item() {
        let (mut sale, _, _) = scenario_b();

        sale.cancel().unwrap();

        assert_eq!(sale.status(), SaleStatus::Cancelled);
        assert!(sale.items().iter().all(|i| i.is_cancelled()));
        assert!(sale.total_amount().is_zero());
        assert_eq!(sale.active_item_count(), 0);
    }

    #[test]
    fn test_scenario_e_quantity_limit_checked_before_append() {
        let mut sale = new_sale();

        let err = sale
            .add_item(Uuid::new_v4(), "Too many", 21, Money::new(dec!(1.00)))
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::QuantityLimitExceeded {
                requested: 21,
                max: 20
            }
        );
        assert!(sale.items().is_empty());
        assert!(sale.updated_at().is_none());
    }

    #[test]
    fn test_scenario_f_update_on_cancelled_sale() {
        let (mut sale, p1, _) = scenario_b();
        sale.cancel().unwrap();

        let err = sale.update_item(p1, 4).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::SaleCancelled);

        let err = sale.update_item(Uuid::new_v4(), 99).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::SaleCancelled);
    }

    #[test]
    fn test_cancel_twice_fails() {
        let mut sale = new_sale();
        sale.cancel().unwrap();

        let err = sale.cancel().unwrap_err();
        assert_eq!(err, DomainError::AlreadyCancelled { sale_id: sale.id() });
    }

    #[test]
    fn test_add_item_error_order() {
        let mut sale = new_sale();
        let product = Uuid::new_v4();
        sale.add_item(product, "Water", 1, Money::new(dec!(1.00)))
            .unwrap();

        // Invalid quantity wins over duplicate product
        let err = sale
            .add_item(product, "Water", 0, Money::new(dec!(1.00)))
            .unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::InvalidQuantity);

        let err = sale
            .add_item(product, "Water", 25, Money::new(dec!(1.00)))
            .unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::QuantityLimitExceeded);

        // Cancelled wins over everything
        sale.cancel().unwrap();
        let err = sale
            .add_item(product, "Water", -1, Money::new(dec!(1.00)))
            .unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::SaleCancelled);
    }

    #[test]
    fn test_update_item_moves_between_tiers() {
        let (mut sale, p1, _) = scenario_b();

        sale.update_item(p1, 10).unwrap();

        let item = sale.find_item(p1).unwrap();
        assert_eq!(item.discount(), DiscountRate::BULK);
        assert_eq!(item.total_amount(), Money::new(dec!(80.00)));
        assert_eq!(item.product_name(), "Product 1");
        assert_eq!(item.unit_price(), Money::new(dec!(10.00)));
        assert_eq!(sale.total_amount(), Money::new(dec!(170.00)));
    }

    #[test]
    fn test_update_item_errors() {
        let (mut sale, p1, _) = scenario_b();
        let before = sale.clone();

        let err = sale.update_item(Uuid::new_v4(), 2).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::ProductNotFound);

        let err = sale.update_item(p1, 0).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::InvalidQuantity);

        let err = sale.update_item(p1, 21).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::QuantityLimitExceeded);

        assert_eq!(sale, before);
    }

    #[test]
    fn test_update_cancelled_item_fails() {
        let (mut sale, p1, _) = scenario_b();
        sale.cancel_item(p1).unwrap();
        let before = sale.clone();

        let err = sale.update_item(p1, 5).unwrap_err();

        assert_eq!(err.kind(), DomainErrorKind::ItemCancelled);
        assert_eq!(sale, before);
    }

    #[test]
    fn test_cancel_item_recalculates_total() {
        let (mut sale, _, p2) = scenario_b();

        sale.cancel_item(p2).unwrap();

        assert!(sale.find_item(p2).unwrap().is_cancelled());
        assert_eq!(sale.total_amount(), Money::new(dec!(30.00)));
        assert_eq!(sale.active_item_count(), 1);
        assert_eq!(sale.items().len(), 2);
    }

    #[test]
    fn test_cancel_item_twice_succeeds() {
        let (mut sale, p1, _) = scenario_b();

        sale.cancel_item(p1).unwrap();
        sale.cancel_item(p1).unwrap();

        assert_eq!(sale.total_amount(), Money::new(dec!(90.00)));
    }

    #[test]
    fn test_cancel_item_errors() {
        let (mut sale, p1, _) = scenario_b();

        let err = sale.cancel_item(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::ProductNotFound);

        sale.cancel().unwrap();
        let err = sale.cancel_item(p1).unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::SaleCancelled);
    }

    #[test]
    fn test_add_item_rejects_price_above_limit() {
        let mut sale = new_sale();
        let before = sale.clone();
        let huge = Money::new(Decimal::MAX / Decimal::from(10));

        let err = sale.add_item(Uuid::new_v4(), "Reserve", 20, huge).unwrap_err();

        assert_eq!(err.kind(), DomainErrorKind::UnitPriceLimitExceeded);
        assert_eq!(sale, before);

        let at_limit = sale
            .add_item(Uuid::new_v4(), "Reserve", 20, crate::MAX_UNIT_PRICE)
            .unwrap();
        assert_eq!(at_limit.total_amount(), Money::new(dec!(16000000000)));
    }

    #[test]
    fn test_add_item_overflowing_sale_total_changes_nothing() {
        let (sale, _, _) = scenario_b();
        let mut snapshot = sale.snapshot();
        snapshot.items[0].total_amount = Money::new(Decimal::MAX);
        snapshot.total_amount = Money::new(Decimal::MAX);
        let mut sale = Sale::from_snapshot(snapshot);
        let before = sale.clone();

        let err = sale
            .add_item(Uuid::new_v4(), "Soda", 1, Money::new(dec!(1.00)))
            .unwrap_err();

        assert_eq!(err, DomainError::AmountOverflow);
        assert_eq!(sale, before);
    }

    #[test]
    fn test_update_item_overflow_changes_nothing() {
        let (sale, p1, _) = scenario_b();
        let mut snapshot = sale.snapshot();
        snapshot.items[0].unit_price = Money::new(Decimal::MAX / Decimal::from(10));
        let mut sale = Sale::from_snapshot(snapshot);
        let before = sale.clone();

        let err = sale.update_item(p1, 20).unwrap_err();

        assert_eq!(err.kind(), DomainErrorKind::AmountOverflow);
        assert_eq!(sale, before);
    }

    #[test]
    fn test_update_customer_and_branch_info() {
        let mut sale = new_sale();
        let customer = Uuid::new_v4();
        let branch = Uuid::new_v4();

        sale.update_customer_info(customer, "João Souza").unwrap();
        sale.update_branch_info(branch, "Uptown").unwrap();

        assert_eq!(sale.customer_id(), customer);
        assert_eq!(sale.customer_name(), "João Souza");
        assert_eq!(sale.branch_id(), branch);
        assert_eq!(sale.branch_name(), "Uptown");
        assert!(sale.updated_at().is_some());
    }

    #[test]
    fn test_info_updates_rejected_after_cancel() {
        let mut sale = new_sale();
        sale.cancel().unwrap();

        let err = sale
            .update_customer_info(Uuid::new_v4(), "Someone")
            .unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::SaleCancelled);

        let err = sale.update_branch_info(Uuid::new_v4(), "Elsewhere").unwrap_err();
        assert_eq!(err.kind(), DomainErrorKind::SaleCancelled);
        assert_eq!(sale.branch_name(), "Downtown");
    }

    #[test]
    fn test_snapshot_round_trip_preserves_everything() {
        let (mut sale, p1, _) = scenario_b();
        sale.cancel_item(p1).unwrap();

        let restored = Sale::from_snapshot(sale.snapshot());

        assert_eq!(restored, sale);
        assert_eq!(restored.items()[0].product_id(), p1);
    }

    #[test]
    fn test_valid_sale_passes_validation() {
        let (sale, _, _) = scenario_b();
        let report = sale.validate();
        assert!(report.is_valid, "{:?}", report.errors);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, i64, i64),
        Update(u8, i64),
        CancelItem(u8),
        Cancel,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..6, -2i64..25, 1i64..10_000).prop_map(|(p, q, c)| Op::Add(p, q, c)),
            3 => (0u8..6, -2i64..25).prop_map(|(p, q)| Op::Update(p, q)),
            2 => (0u8..6).prop_map(Op::CancelItem),
            1 => Just(Op::Cancel),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_matches_active_items(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let products: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
            let mut sale = new_sale();

            for op in ops {
                let before = sale.clone();
                let result = match op {
                    Op::Add(p, q, cents) => sale
                        .add_item(products[p as usize], "P", q, Money::from_cents(cents))
                        .map(|_| ()),
                    Op::Update(p, q) => sale.update_item(products[p as usize], q),
                    Op::CancelItem(p) => sale.cancel_item(products[p as usize]),
                    Op::Cancel => sale.cancel(),
                };

                if result.is_err() {
                    prop_assert_eq!(&sale, &before);
                }
                prop_assert_eq!(sale.total_amount(), active_total(&sale));
                for item in sale.items() {
                    prop_assert_eq!(item.discount(), discount_for_quantity(item.quantity()));
                }
            }
        }
    }
}
