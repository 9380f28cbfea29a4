//! # Create Sale

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use salesdesk_core::{Sale, ValidationReport};
use salesdesk_db::DbError;

use super::results::SaleResult;
use super::{check_sale_fields, SaleLineCommand, SalesService};
use crate::error::{ensure_valid, ServiceResult};

/// Fresh sale numbers tried before a collision is reported.
const SALE_NUMBER_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleCommand {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub branch_id: Uuid,
    pub branch_name: String,
    pub items: Vec<SaleLineCommand>,
}

impl CreateSaleCommand {
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        check_sale_fields(
            &mut report,
            self.customer_id,
            &self.customer_name,
            self.branch_id,
            &self.branch_name,
            &self.items,
        );
        report
    }
}

impl SalesService {
    /// Registers a new sale with its lines.
    ///
    /// Discounts are derived from each line's quantity; the command carries
    /// only prices. Two lines for the same product are refused with
    /// `DUPLICATE_PRODUCT`.
    pub async fn create_sale(&self, command: CreateSaleCommand) -> ServiceResult<SaleResult> {
        debug!(
            customer_id = %command.customer_id,
            items = command.items.len(),
            "create_sale command"
        );

        ensure_valid("create_sale", command.validate())?;

        let mut attempt = 1;
        loop {
            let sale = self.build_sale(&command)?;

            match self.db.sales().create(&sale).await {
                Ok(created) => {
                    info!(
                        sale_id = %created.id(),
                        sale_number = %created.sale_number(),
                        total = %created.total_amount(),
                        items = created.items().len(),
                        "Sale created"
                    );
                    return Ok(SaleResult::from(&created));
                }
                Err(DbError::UniqueViolation { field, value })
                    if field.ends_with("sale_number") && attempt < SALE_NUMBER_ATTEMPTS =>
                {
                    warn!(sale_number = %value, attempt, "Sale number taken, generating another");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn build_sale(&self, command: &CreateSaleCommand) -> ServiceResult<Sale> {
        let mut sale = Sale::new(
            Uuid::new_v4(),
            self.sale_numbers.next_number(),
            command.customer_id,
            command.customer_name.clone(),
            command.branch_id,
            command.branch_name.clone(),
        );

        for line in &command.items {
            sale.add_item(
                line.product_id,
                line.product_name.clone(),
                line.quantity,
                line.unit_price(),
            )?;
        }

        Ok(sale)
    }
}
