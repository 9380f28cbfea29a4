//! # Sale Results
//!
//! Serializable views of a sale returned by commands and queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use salesdesk_core::{Sale, SaleItem, SaleStatus};

/// Full sale with every line, cancelled lines included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResult {
    pub id: Uuid,
    pub sale_number: String,
    pub sale_date: DateTime<Utc>,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub branch_id: Uuid,
    pub branch_name: String,
    pub total_amount: Decimal,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<SaleItemResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemResult {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Fraction in `[0, 1]`, e.g. `0.10`
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub is_cancelled: bool,
}

/// One row of a sale listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub id: Uuid,
    pub sale_number: String,
    pub sale_date: DateTime<Utc>,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub branch_id: Uuid,
    pub branch_name: String,
    pub total_amount: Decimal,
    pub status: SaleStatus,
    /// Lines that are not cancelled
    pub item_count: usize,
}

impl From<&SaleItem> for SaleItemResult {
    fn from(item: &SaleItem) -> Self {
        SaleItemResult {
            id: item.id(),
            product_id: item.product_id(),
            product_name: item.product_name().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price().amount(),
            discount: item.discount().value(),
            total_amount: item.total_amount().amount(),
            is_cancelled: item.is_cancelled(),
        }
    }
}

impl From<&Sale> for SaleResult {
    fn from(sale: &Sale) -> Self {
        SaleResult {
            id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            sale_date: sale.sale_date(),
            customer_id: sale.customer_id(),
            customer_name: sale.customer_name().to_string(),
            branch_id: sale.branch_id(),
            branch_name: sale.branch_name().to_string(),
            total_amount: sale.total_amount().amount(),
            status: sale.status(),
            created_at: sale.created_at(),
            updated_at: sale.updated_at(),
            items: sale.items().iter().map(SaleItemResult::from).collect(),
        }
    }
}

impl From<&Sale> for SaleSummary {
    fn from(sale: &Sale) -> Self {
        SaleSummary {
            id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            sale_date: sale.sale_date(),
            customer_id: sale.customer_id(),
            customer_name: sale.customer_name().to_string(),
            branch_id: sale.branch_id(),
            branch_name: sale.branch_name().to_string(),
            total_amount: sale.total_amount().amount(),
            status: sale.status(),
            item_count: sale.active_item_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use salesdesk_core::Money;

    #[test]
    fn test_result_json_shape() {
        let mut sale = Sale::new(
            Uuid::new_v4(),
            "SALE-20260101-000001",
            Uuid::new_v4(),
            "Ana",
            Uuid::new_v4(),
            "Centro",
        );
        let product = Uuid::new_v4();
        sale.add_item(product, "Lager", 4, Money::new(dec!(10.00)))
            .unwrap();
        sale.add_item(Uuid::new_v4(), "Soda", 1, Money::new(dec!(3.00)))
            .unwrap();
        sale.cancel_item(product).unwrap();

        let json = serde_json::to_value(SaleResult::from(&sale)).unwrap();

        assert_eq!(json["saleNumber"], "SALE-20260101-000001");
        assert_eq!(json["status"], "active");
        assert_eq!(json["items"][0]["isCancelled"], true);
        assert_eq!(json["items"][0]["productName"], "Lager");

        let summary = SaleSummary::from(&sale);
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.total_amount, dec!(3.00));
    }
}
