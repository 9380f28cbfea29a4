//! # Sale Commands
//!
//! Every operation follows the same shape:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Command Lifecycle                                │
//! │                                                                         │
//! │  Command DTO                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate() ────── invalid ──► ServiceError(VALIDATION_ERROR)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load Sale ─────── missing ──► ServiceError(NOT_FOUND)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  mutate aggregate ─ refused ─► ServiceError(BUSINESS_RULE)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  persist whole aggregate (one transaction)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleResult                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A command that fails at any step persists nothing.

pub mod cancel_sale_item;
pub mod create_sale;
pub mod delete_sale;
pub mod get_sale;
pub mod list_sales;
pub mod results;
pub mod update_sale;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use salesdesk_core::validation::{
    validate_id, validate_max_len, validate_quantity, validate_unit_price,
};
use salesdesk_core::{Money, Sale, ValidationError, ValidationReport, MAX_NAME_LEN};
use salesdesk_db::{Database, DbError};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::sale_number::SaleNumberGenerator;

// =============================================================================
// Service
// =============================================================================

/// Entry point for sale commands and queries.
///
/// Cloning is cheap: clones share the pool and the sale number sequence.
#[derive(Debug, Clone)]
pub struct SalesService {
    db: Database,
    sale_numbers: Arc<SaleNumberGenerator>,
}

impl SalesService {
    pub fn new(db: Database, sale_numbers: SaleNumberGenerator) -> Self {
        SalesService {
            db,
            sale_numbers: Arc::new(sale_numbers),
        }
    }

    /// Connects to the configured database and builds the service.
    pub async fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        let db = Database::new(config.db_config()).await?;
        info!(
            path = %config.database_path.display(),
            prefix = %config.sale_number_prefix,
            "Sales service ready"
        );
        Ok(SalesService::new(
            db,
            SaleNumberGenerator::new(config.sale_number_prefix.clone()),
        ))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Loads a sale or fails with `NOT_FOUND`.
    async fn load_sale(&self, id: Uuid) -> ServiceResult<Sale> {
        self.db
            .sales()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", &id.to_string()))
    }

    /// Persists a mutated sale.
    ///
    /// A row deleted between load and save surfaces as `NOT_FOUND`.
    async fn save_sale(&self, sale: &Sale) -> ServiceResult<Sale> {
        self.db.sales().update(sale).await.map_err(|err| match err {
            DbError::NotFound { .. } => ServiceError::not_found("Sale", &sale.id().to_string()),
            other => other.into(),
        })
    }
}

// =============================================================================
// Shared Command Parts
// =============================================================================

/// One line of a create or update command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineCommand {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl SaleLineCommand {
    pub fn unit_price(&self) -> Money {
        Money::new(self.unit_price)
    }
}

/// Customer, branch and line rules shared by create and update.
pub(crate) fn check_sale_fields(
    report: &mut ValidationReport,
    customer_id: Uuid,
    customer_name: &str,
    branch_id: Uuid,
    branch_name: &str,
    items: &[SaleLineCommand],
) {
    report.check(validate_id("customer_id", customer_id));
    report.check(validate_max_len("customer_name", customer_name, MAX_NAME_LEN));
    report.check(validate_id("branch_id", branch_id));
    report.check(validate_max_len("branch_name", branch_name, MAX_NAME_LEN));

    if items.is_empty() {
        report.push(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for (i, line) in items.iter().enumerate() {
        report.check(validate_id(&format!("items[{i}].product_id"), line.product_id));
        report.check(validate_max_len(
            &format!("items[{i}].product_name"),
            &line.product_name,
            MAX_NAME_LEN,
        ));
        report.check(validate_quantity(&format!("items[{i}].quantity"), line.quantity));
        report.check(validate_unit_price(
            &format!("items[{i}].unit_price"),
            line.unit_price(),
        ));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::commands::create_sale::CreateSaleCommand;
    use crate::commands::results::SaleResult;
    use salesdesk_db::DbConfig;

    /// Service over a fresh in-memory database.
    pub async fn service() -> SalesService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SalesService::new(db, SaleNumberGenerator::default())
    }

    pub fn line(quantity: i64, unit_price: Decimal) -> SaleLineCommand {
        SaleLineCommand {
            product_id: Uuid::new_v4(),
            product_name: "Lager 350ml".to_string(),
            quantity,
            unit_price,
        }
    }

    pub fn create_command(items: Vec<SaleLineCommand>) -> CreateSaleCommand {
        CreateSaleCommand {
            customer_id: Uuid::new_v4(),
            customer_name: "Jane Customer".to_string(),
            branch_id: Uuid::new_v4(),
            branch_name: "Downtown".to_string(),
            items,
        }
    }

    pub async fn create(service: &SalesService, items: Vec<SaleLineCommand>) -> SaleResult {
        service.create_sale(create_command(items)).await.unwrap()
    }
}
