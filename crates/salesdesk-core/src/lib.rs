//! # salesdesk-core: Pure Business Logic for SalesDesk
//!
//! This crate is the **heart** of SalesDesk. It owns the `Sale` aggregate,
//! its `SaleItem` lines and the quantity-tiered discount rules, with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SalesDesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  salesdesk-service (handlers)                   │   │
//! │  │   create_sale, update_sale, delete_sale, list_sales, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ load → mutate → persist                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ salesdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   sale    │  │ sale_item │  │ discount  │  │ validation│  │   │
//! │  │   │   Sale    │  │ SaleItem  │  │  tiers    │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO ASYNC                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 salesdesk-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repository             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sale`] - The `Sale` aggregate root and its lifecycle
//! - [`sale_item`] - Line items owned by a sale
//! - [`discount`] - Quantity → discount tier table
//! - [`money`] - Exact decimal money
//! - [`types`] - Status enum and persistence snapshots
//! - [`error`] - Domain and validation errors
//! - [`validation`] - Declarative rule checks
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use salesdesk_core::{Money, Sale};
//! use uuid::Uuid;
//!
//! let mut sale = Sale::new(
//!     Uuid::new_v4(),
//!     "SALE-20260101-123456",
//!     Uuid::new_v4(),
//!     "Jane Customer",
//!     Uuid::new_v4(),
//!     "Downtown",
//! );
//!
//! sale.add_item(Uuid::new_v4(), "Lager 350ml", 5, Money::new(dec!(20.00))).unwrap();
//!
//! // 5 × 20.00 with the 10% tier
//! assert_eq!(sale.total_amount(), Money::new(dec!(90.00)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod sale;
pub mod sale_item;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{discount_for_quantity, DiscountRate, DiscountTier};
pub use error::{DomainError, DomainErrorKind, DomainResult, ValidationError};
pub use money::Money;
pub use sale::Sale;
pub use sale_item::SaleItem;
pub use types::*;
pub use validation::ValidationReport;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest quantity a line item may carry.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Maximum quantity of identical items in one sale.
///
/// ## Business Reason
/// Bulk purchases above this limit go through a separate wholesale flow.
pub const MAX_ITEM_QUANTITY: i64 = 20;

/// Largest unit price a line item may carry.
///
/// Keeps every line total (`price × 20`) and any realistic sum of lines
/// well inside the `Decimal` range.
pub const MAX_UNIT_PRICE: Money = Money::new(rust_decimal_macros::dec!(1000000000));

/// Maximum length of a sale number.
pub const MAX_SALE_NUMBER_LEN: usize = 50;

/// Maximum length of customer, branch and product display names.
pub const MAX_NAME_LEN: usize = 100;
