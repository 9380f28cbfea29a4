//! # Validation Module
//!
//! Declarative rule checks for sales, sale items and incoming commands.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command validation (salesdesk-service)                       │
//! │  ├── Field validators from this module                                 │
//! │  └── Every broken rule reported at once                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Sale aggregate                                               │
//! │  ├── DomainError raised on the first violated precondition             │
//! │  └── Sale::validate() / SaleItem::validate() for whole-state checks    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE sale number, foreign keys                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salesdesk_core::validation::{validate_max_len, validate_quantity, ValidationReport};
//!
//! let mut report = ValidationReport::new();
//! report.check(validate_max_len("customer_name", "Ana", 100));
//! report.check(validate_quantity("quantity", 25));
//!
//! assert!(!report.is_valid);
//! assert_eq!(report.errors.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

use crate::discount::{discount_for_quantity, DiscountRate, BULK_TIER_MIN, STANDARD_TIER_MIN};
use crate::error::ValidationError;
use crate::money::Money;
use crate::sale::Sale;
use crate::sale_item::SaleItem;
use crate::{
    MAX_ITEM_QUANTITY, MAX_NAME_LEN, MAX_SALE_NUMBER_LEN, MAX_UNIT_PRICE, MIN_ITEM_QUANTITY,
};

/// Result type for single-rule checks.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Validation Report
// =============================================================================

/// Outcome of running a rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        ValidationReport::new()
    }
}

impl ValidationReport {
    /// Empty, valid report.
    pub fn new() -> Self {
        ValidationReport {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Records the error of a failed check; passes through on success.
    pub fn check(&mut self, result: ValidationResult<()>) {
        if let Err(err) = result {
            self.push(err);
        }
    }

    pub fn push(&mut self, error: ValidationError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Joins all messages with `"; "`, for logs and error responses.
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Fails with `Required` when the trimmed value is empty.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Required, and at most `max` characters.
///
/// ## Example
/// ```rust
/// use salesdesk_core::validation::validate_max_len;
///
/// assert!(validate_max_len("branch_name", "Centro", 100).is_ok());
/// assert!(validate_max_len("branch_name", "", 100).is_err());
/// assert!(validate_max_len("branch_name", &"x".repeat(101), 100).is_err());
/// ```
pub fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    validate_required(field, value)?;

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Identifiers must not be nil.
pub fn validate_id(field: &str, id: Uuid) -> ValidationResult<()> {
    if id.is_nil() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Quantity must be within `1..=20`.
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if !(MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: MIN_ITEM_QUANTITY,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Unit price must be strictly positive and at most [`MAX_UNIT_PRICE`].
pub fn validate_unit_price(field: &str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if price > MAX_UNIT_PRICE {
        return Err(ValidationError::BusinessRule {
            field: field.to_string(),
            rule: format!("must not exceed {}", MAX_UNIT_PRICE.amount()),
        });
    }
    Ok(())
}

/// When both bounds are present, start must not be after end.
pub fn validate_date_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> ValidationResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ValidationError::BusinessRule {
                field: "start_date".to_string(),
                rule: "start date must be before or equal to end date".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::BusinessRule {
            field: field.to_string(),
            rule: "cannot be negative".to_string(),
        });
    }
    Ok(())
}

fn validate_discount_bounds(field: &str, discount: DiscountRate) -> ValidationResult<()> {
    let value = discount.value();
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ValidationError::BusinessRule {
            field: field.to_string(),
            rule: "must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

/// The stored discount must be the one the quantity tier dictates.
fn validate_discount_tier(field: &str, quantity: i64, discount: DiscountRate) -> ValidationResult<()> {
    if !(MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY).contains(&quantity) {
        // quantity rule already reports this
        return Ok(());
    }
    if discount == discount_for_quantity(quantity) {
        return Ok(());
    }

    let rule = if quantity < STANDARD_TIER_MIN {
        "purchases below 4 items cannot have a discount"
    } else if quantity < BULK_TIER_MIN {
        "purchases between 4 and 9 items should have a 10% discount"
    } else {
        "purchases between 10 and 20 items should have a 20% discount"
    };
    Err(ValidationError::BusinessRule {
        field: field.to_string(),
        rule: rule.to_string(),
    })
}

// =============================================================================
// Aggregate Rules
// =============================================================================

/// Item rules. `index` prefixes field names when the item is checked as
/// part of a sale (`items[2].quantity`).
pub(crate) fn sale_item_errors(item: &SaleItem, index: Option<usize>) -> Vec<ValidationError> {
    let name = |field: &str| match index {
        Some(i) => format!("items[{i}].{field}"),
        None => field.to_string(),
    };

    let mut report = ValidationReport::new();
    report.check(validate_id(&name("sale_id"), item.sale_id()));
    report.check(validate_id(&name("product_id"), item.product_id()));
    report.check(validate_max_len(
        &name("product_name"),
        item.product_name(),
        MAX_NAME_LEN,
    ));
    report.check(validate_quantity(&name("quantity"), item.quantity()));
    report.check(validate_unit_price(&name("unit_price"), item.unit_price()));
    report.check(validate_discount_bounds(&name("discount"), item.discount()));
    report.check(validate_non_negative(&name("total_amount"), item.total_amount()));
    report.check(validate_discount_tier(
        &name("discount"),
        item.quantity(),
        item.discount(),
    ));

    if item.is_cancelled() && !item.total_amount().is_zero() {
        report.push(ValidationError::BusinessRule {
            field: name("total_amount"),
            rule: "cancelled items must have a zero total".to_string(),
        });
    }

    report.errors
}

/// Sale rules, including every item.
pub(crate) fn sale_errors(sale: &Sale) -> Vec<ValidationError> {
    let mut report = ValidationReport::new();

    report.check(validate_max_len(
        "sale_number",
        sale.sale_number(),
        MAX_SALE_NUMBER_LEN,
    ));
    report.check(validate_id("customer_id", sale.customer_id()));
    report.check(validate_max_len(
        "customer_name",
        sale.customer_name(),
        MAX_NAME_LEN,
    ));
    report.check(validate_id("branch_id", sale.branch_id()));
    report.check(validate_max_len(
        "branch_name",
        sale.branch_name(),
        MAX_NAME_LEN,
    ));
    report.check(validate_non_negative("total_amount", sale.total_amount()));

    if sale.items().is_empty() {
        report.push(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (index, item) in sale.items().iter().enumerate() {
        for err in sale_item_errors(item, Some(index)) {
            report.push(err);
        }
        if !seen.insert(item.product_id()) {
            report.push(ValidationError::Duplicate {
                field: "items.product_id".to_string(),
                value: item.product_id().to_string(),
            });
        }
    }

    let expected = sale
        .items()
        .iter()
        .filter(|item| !item.is_cancelled())
        .map(SaleItem::total_amount)
        .try_fold(Money::zero(), |acc, total| acc.checked_add(total));
    match expected {
        Some(expected) if sale.total_amount() != expected => {
            report.push(ValidationError::BusinessRule {
                field: "total_amount".to_string(),
                rule: format!("must equal the sum of active item totals ({expected})"),
            });
        }
        Some(_) => {}
        None => report.push(ValidationError::BusinessRule {
            field: "total_amount".to_string(),
            rule: "sum of active item totals is out of range".to_string(),
        }),
    }

    report.errors
}

// =============================================================================
// Unit Tests
// =============================================================================
