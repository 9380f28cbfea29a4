//! # Cancel Sale Item

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use salesdesk_core::validation::validate_id;
use salesdesk_core::ValidationReport;

use super::results::SaleResult;
use super::SalesService;
use crate::error::{ensure_valid, ServiceResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSaleItemCommand {
    pub sale_id: Uuid,
    pub product_id: Uuid,
}

impl SalesService {
    /// Cancels one line and returns the re-totalled sale.
    pub async fn cancel_sale_item(&self, command: CancelSaleItemCommand) -> ServiceResult<SaleResult> {
        debug!(
            sale_id = %command.sale_id,
            product_id = %command.product_id,
            "cancel_sale_item command"
        );

        let mut report = ValidationReport::new();
        report.check(validate_id("sale_id", command.sale_id));
        report.check(validate_id("product_id", command.product_id));
        ensure_valid("cancel_sale_item", report)?;

        let mut sale = self.load_sale(command.sale_id).await?;
        sale.cancel_item(command.product_id)?;
        let saved = self.save_sale(&sale).await?;

        info!(
            sale_id = %saved.id(),
            product_id = %command.product_id,
            total = %saved.total_amount(),
            "Sale item cancelled"
        );

        Ok(SaleResult::from(&saved))
    }
}
