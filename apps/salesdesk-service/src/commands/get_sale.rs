//! # Get Sale

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use salesdesk_core::validation::validate_id;
use salesdesk_core::ValidationReport;

use super::results::SaleResult;
use super::SalesService;
use crate::error::{ensure_valid, ServiceResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSaleQuery {
    pub id: Uuid,
}

impl SalesService {
    /// Fetches a sale with all of its lines.
    pub async fn get_sale(&self, query: GetSaleQuery) -> ServiceResult<SaleResult> {
        debug!(id = %query.id, "get_sale query");

        let mut report = ValidationReport::new();
        report.check(validate_id("id", query.id));
        ensure_valid("get_sale", report)?;

        let sale = self.load_sale(query.id).await?;
        Ok(SaleResult::from(&sale))
    }
}
