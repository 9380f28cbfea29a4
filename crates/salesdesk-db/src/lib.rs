//! # salesdesk-db: Database Layer for SalesDesk
//!
//! This crate persists `Sale` aggregates in SQLite using sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SalesDesk Data Flow                              │
//! │                                                                         │
//! │  SalesService::update_sale                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  salesdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │   (sale.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ SaleFilter    │    │              │  │   │
//! │  │   │ Management    │    │ row mapping   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │            sales ──1:N──► sale_items (cascade)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Sale repository and list filter
//!
//! ## Usage
//!
//! ```rust,ignore
//! use salesdesk_db::{Database, DbConfig, SaleFilter};
//!
//! let db = Database::new(DbConfig::new("./salesdesk.db")).await?;
//!
//! let sale = db.sales().get_by_id(id).await?;
//! let todays = db.sales().list(&SaleFilter::new().start_date(midnight)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::sale::{SaleFilter, SaleRepository};
