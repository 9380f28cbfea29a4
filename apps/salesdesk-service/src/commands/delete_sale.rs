//! # Delete Sale
//!
//! ```text
//! hard_delete = false (default)        hard_delete = true
//! ─────────────────────────────        ──────────────────
//! Sale::cancel()                       DELETE FROM sales
//!   status → cancelled                   items cascade
//!   every line cancelled               row is gone for good
//!   total → 0
//! row kept for history
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use salesdesk_core::validation::validate_id;
use salesdesk_core::ValidationReport;

use super::SalesService;
use crate::error::{ensure_valid, ServiceError, ServiceResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSaleCommand {
    pub id: Uuid,

    /// Physically remove the sale instead of cancelling it
    #[serde(default)]
    pub hard_delete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSaleResult {
    pub success: bool,
}

impl SalesService {
    /// Cancels a sale, or removes it when `hard_delete` is set.
    ///
    /// Soft-deleting an already cancelled sale fails with
    /// `ALREADY_CANCELLED`.
    pub async fn delete_sale(&self, command: DeleteSaleCommand) -> ServiceResult<DeleteSaleResult> {
        debug!(id = %command.id, hard_delete = command.hard_delete, "delete_sale command");

        let mut report = ValidationReport::new();
        report.check(validate_id("id", command.id));
        ensure_valid("delete_sale", report)?;

        let mut sale = self.load_sale(command.id).await?;

        if command.hard_delete {
            let deleted = self.db.sales().delete(sale.id()).await?;
            if !deleted {
                return Err(ServiceError::internal(format!(
                    "Failed to delete sale with ID {}",
                    sale.id()
                )));
            }
            info!(sale_id = %sale.id(), "Sale deleted");
        } else {
            sale.cancel()?;
            self.save_sale(&sale).await?;
            info!(sale_id = %sale.id(), "Sale cancelled");
        }

        Ok(DeleteSaleResult { success: true })
    }
}
