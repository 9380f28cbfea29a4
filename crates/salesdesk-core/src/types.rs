//! # Domain Types
//!
//! Supporting types for the sale aggregate.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Persistence Round-Trip                           │
//! │                                                                         │
//! │   Sale ──snapshot()──► SaleSnapshot ──► repository rows                 │
//! │                                                                         │
//! │   repository rows ──► SaleSnapshot ──from_snapshot()──► Sale            │
//! │                                                                         │
//! │  Sale keeps its fields private so only its own methods mutate them.    │
//! │  Snapshots are the one sanctioned way in and out: plain data, every    │
//! │  field, no behaviour.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! - `id`: UUID, immutable, used for relations
//! - `sale_number`: human-facing, unique, assigned once at creation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discount::DiscountRate;
use crate::money::Money;

// =============================================================================
// Sale Status
// =============================================================================

/// Lifecycle state of a sale.
///
/// ```text
///   Active ──cancel()──► Cancelled   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale accepts mutations.
    Active,
    /// Sale was cancelled (soft delete). No further mutation.
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Active
    }
}

impl SaleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Active => "active",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Every field of a [`Sale`](crate::Sale), as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleSnapshot {
    pub id: Uuid,
    pub sale_number: String,
    pub sale_date: DateTime<Utc>,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub branch_id: Uuid,
    pub branch_name: String,
    pub total_amount: Money,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Lines in insertion order.
    pub items: Vec<SaleItemSnapshot>,
}

/// Every field of a [`SaleItem`](crate::SaleItem), as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItemSnapshot {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount: DiscountRate,
    pub total_amount: Money,
    pub is_cancelled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Active);
    }

    #[test]
    fn test_sale_status_serialization() {
        let json = serde_json::to_string(&SaleStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        assert_eq!(SaleStatus::Active.as_str(), "active");
    }
}
