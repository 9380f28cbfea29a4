//! # Error Types
//!
//! Domain-specific error types for salesdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salesdesk-core errors (this file)                                     │
//! │  ├── DomainError      - Business rule violations raised by Sale        │
//! │  └── ValidationError  - Declarative rule failures (validate())         │
//! │                                                                         │
//! │  salesdesk-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  salesdesk-service errors                                              │
//! │  └── ServiceError     - What callers see (code + message)              │
//! │                                                                         │
//! │  Flow: DomainError → ServiceError ← DbError                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Every violation is raised synchronously where it happens
//! 2. Errors carry context (sale ID, product ID, quantity)
//! 3. Each domain error exposes a stable reason code via [`DomainError::kind`]
//! 4. Mutating methods check all preconditions first, so an error never
//!    leaves the aggregate half-changed

use thiserror::Error;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Domain Error
// =============================================================================

/// Business rule violations raised by the `Sale` aggregate and its items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A mutation was attempted on a cancelled sale.
    ///
    /// ## When This Occurs
    /// - `add_item`, `update_item`, `cancel_item` after `cancel()`
    /// - Customer or branch info update after `cancel()`
    #[error("Sale {sale_id} is cancelled, cannot {operation}")]
    SaleCancelled {
        sale_id: Uuid,
        operation: &'static str,
    },

    /// `cancel()` was called on a sale that is already cancelled.
    #[error("Sale {sale_id} is already cancelled")]
    AlreadyCancelled { sale_id: Uuid },

    /// Quantity is zero or negative.
    #[error("Quantity must be greater than zero, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// Quantity exceeds the per-product limit.
    ///
    /// ## User Workflow
    /// ```text
    /// add_item(qty: 21)
    ///      │
    ///      ▼
    /// QuantityLimitExceeded { requested: 21, max: 20 }
    ///      │
    ///      ▼
    /// "Cannot sell more than 20 identical items"
    /// ```
    #[error("Cannot sell more than {max} identical items, requested {requested}")]
    QuantityLimitExceeded { requested: i64, max: i64 },

    /// Unit price is above [`MAX_UNIT_PRICE`](crate::MAX_UNIT_PRICE) in
    /// magnitude.
    #[error("Unit price {unit_price} exceeds the limit of {max}")]
    UnitPriceLimitExceeded { unit_price: Money, max: Money },

    /// A line or sale total fell outside the representable decimal range.
    ///
    /// ## When This Occurs
    /// - Updating a line rebuilt from stored data with an oversized price
    /// - Stored line totals whose sum cannot be represented
    #[error("Amount is outside the representable range")]
    AmountOverflow,

    /// The product is already a line in this sale.
    ///
    /// Duplicates are rejected, never merged. Callers update the existing
    /// line instead.
    #[error("Product {product_id} already exists in this sale, update the existing item instead")]
    DuplicateProduct { product_id: Uuid },

    /// No line in this sale references the product.
    #[error("Product {product_id} not found in this sale")]
    ProductNotFound { product_id: Uuid },

    /// A cancelled line cannot have its quantity changed.
    #[error("Sale item {item_id} is cancelled and cannot be updated")]
    ItemCancelled { item_id: Uuid },
}

/// Machine-readable reason code for a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainErrorKind {
    SaleCancelled,
    AlreadyCancelled,
    InvalidQuantity,
    QuantityLimitExceeded,
    UnitPriceLimitExceeded,
    AmountOverflow,
    DuplicateProduct,
    ProductNotFound,
    ItemCancelled,
}

impl DomainErrorKind {
    /// Stable code used by callers that translate errors into responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DomainErrorKind::SaleCancelled => "SALE_CANCELLED",
            DomainErrorKind::AlreadyCancelled => "ALREADY_CANCELLED",
            DomainErrorKind::InvalidQuantity => "INVALID_QUANTITY",
            DomainErrorKind::QuantityLimitExceeded => "QUANTITY_LIMIT_EXCEEDED",
            DomainErrorKind::UnitPriceLimitExceeded => "UNIT_PRICE_LIMIT_EXCEEDED",
            DomainErrorKind::AmountOverflow => "AMOUNT_OVERFLOW",
            DomainErrorKind::DuplicateProduct => "DUPLICATE_PRODUCT",
            DomainErrorKind::ProductNotFound => "PRODUCT_NOT_FOUND",
            DomainErrorKind::ItemCancelled => "ITEM_CANCELLED",
        }
    }
}

impl std::fmt::Display for DomainErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    /// Returns the reason code for this error.
    pub const fn kind(&self) -> DomainErrorKind {
        match self {
            DomainError::SaleCancelled { .. } => DomainErrorKind::SaleCancelled,
            DomainError::AlreadyCancelled { .. } => DomainErrorKind::AlreadyCancelled,
            DomainError::InvalidQuantity { .. } => DomainErrorKind::InvalidQuantity,
            DomainError::QuantityLimitExceeded { .. } => DomainErrorKind::QuantityLimitExceeded,
            DomainError::UnitPriceLimitExceeded { .. } => DomainErrorKind::UnitPriceLimitExceeded,
            DomainError::AmountOverflow => DomainErrorKind::AmountOverflow,
            DomainError::DuplicateProduct { .. } => DomainErrorKind::DuplicateProduct,
            DomainError::ProductNotFound { .. } => DomainErrorKind::ProductNotFound,
            DomainError::ItemCancelled { .. } => DomainErrorKind::ItemCancelled,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Declarative rule failures.
///
/// Collected (not raised) by `validate()` so the surrounding layer can report
/// every broken rule at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing, empty or nil.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A collection must contain at least one entry.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },

    /// Duplicate value within a collection.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// A cross-field business rule does not hold.
    #[error("{field}: {rule}")]
    BusinessRule { field: String, rule: String },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Empty { field }
            | ValidationError::Duplicate { field, .. }
            | ValidationError::BusinessRule { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DomainError.
pub type DomainResult<T> = Result<T, DomainError>;

// =============================================================================
// Unit Tests
// =============================================================================
