//! # Repository Module
//!
//! Database repository implementations for SalesDesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SalesService                                                          │
//! │       │                                                                 │
//! │       │  db.sales().get_by_id(id)                                      │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── create(&self, sale)                                               │
//! │  ├── get_by_id / get_by_sale_number                                    │
//! │  ├── update(&self, sale)                                               │
//! │  ├── delete(&self, id)                                                 │
//! │  └── list(&self, filter)                                               │
//! │       │                                                                 │
//! │       │  SQL (sales + sale_items)                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The aggregate goes in and comes out whole: a Sale is never            │
//! │  returned without its items.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SaleRepository`](sale::SaleRepository) - Sales and their items

pub mod sale;
