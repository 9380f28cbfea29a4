//! # List Sales
//!
//! All filters are optional and combine with AND. Date bounds are
//! inclusive and apply to `sale_date`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use salesdesk_core::validation::validate_date_range;
use salesdesk_core::ValidationReport;
use salesdesk_db::SaleFilter;

use super::results::SaleSummary;
use super::SalesService;
use crate::error::{ensure_valid, ServiceResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListSalesQuery {
    pub customer_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ListSalesQuery {
    fn to_filter(&self) -> SaleFilter {
        SaleFilter {
            customer_id: self.customer_id,
            branch_id: self.branch_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSalesResult {
    pub sales: Vec<SaleSummary>,
}

impl SalesService {
    /// Lists sales ordered by sale date.
    ///
    /// Cancelled sales are included; check `status`.
    pub async fn list_sales(&self, query: ListSalesQuery) -> ServiceResult<ListSalesResult> {
        debug!(?query, "list_sales query");

        let mut report = ValidationReport::new();
        report.check(validate_date_range(query.start_date, query.end_date));
        ensure_valid("list_sales", report)?;

        let sales = self.db.sales().list(&query.to_filter()).await?;

        Ok(ListSalesResult {
            sales: sales.iter().map(SaleSummary::from).collect(),
        })
    }
}
