//! # salesdesk-service: Application Layer for SalesDesk
//!
//! Commands and queries over the `Sale` aggregate, plus the ambient stack
//! a binary needs to run them.
//!
//! ## Module Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       salesdesk-service                                 │
//! │                                                                         │
//! │  commands/          SalesService and one file per operation             │
//! │  ├── create_sale    CreateSaleCommand  → SaleResult                     │
//! │  ├── get_sale       GetSaleQuery       → SaleResult                     │
//! │  ├── update_sale    UpdateSaleCommand  → SaleResult                     │
//! │  ├── delete_sale    DeleteSaleCommand  → DeleteSaleResult               │
//! │  ├── cancel_sale_item                  → SaleResult                     │
//! │  ├── list_sales     ListSalesQuery     → ListSalesResult                │
//! │  └── results        serializable views (camelCase JSON)                 │
//! │                                                                         │
//! │  config.rs          ServiceConfig (environment variables)               │
//! │  error.rs           ServiceError { code, message, reason }              │
//! │  sale_number.rs     SALE-yyyymmdd-NNNNNN generator                      │
//! │  telemetry.rs       tracing subscriber setup                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use rust_decimal::Decimal;
//! use salesdesk_service::commands::create_sale::CreateSaleCommand;
//! use salesdesk_service::commands::SaleLineCommand;
//! use salesdesk_service::{SalesService, ServiceConfig};
//! use uuid::Uuid;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::load()?;
//! let service = SalesService::from_config(&config).await?;
//!
//! let sale = service
//!     .create_sale(CreateSaleCommand {
//!         customer_id: Uuid::new_v4(),
//!         customer_name: "Jane Customer".into(),
//!         branch_id: Uuid::new_v4(),
//!         branch_name: "Downtown".into(),
//!         items: vec![SaleLineCommand {
//!             product_id: Uuid::new_v4(),
//!             product_name: "Lager 350ml".into(),
//!             quantity: 5,
//!             unit_price: Decimal::new(2000, 2),
//!         }],
//!     })
//!     .await?;
//!
//! assert_eq!(sale.total_amount, Decimal::new(9000, 2));
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod sale_number;
pub mod telemetry;

pub use commands::SalesService;
pub use config::{ConfigError, ServiceConfig};
pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use sale_number::SaleNumberGenerator;
