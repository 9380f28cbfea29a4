//! # Update Sale
//!
//! Lines are matched by product:
//!
//! ```text
//! command line ──► product already in sale? ──yes──► update_item(qty)
//!                                │
//!                                no
//!                                ▼
//!                          add_item(name, qty, price)
//! ```
//!
//! Lines absent from the command are left untouched. Name and price of an
//! existing line never change.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use salesdesk_core::validation::validate_id;
use salesdesk_core::ValidationReport;

use super::results::SaleResult;
use super::{check_sale_fields, SaleLineCommand, SalesService};
use crate::error::{ensure_valid, ServiceResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleCommand {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub branch_id: Uuid,
    pub branch_name: String,
    pub items: Vec<SaleLineCommand>,
}

impl UpdateSaleCommand {
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.check(validate_id("id", self.id));
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
    pub async fn update_sale(&self, command: UpdateSaleCommand) -> ServiceResult<SaleResult> {
        debug!(id = %command.id, items = command.items.len(), "update_sale command");

        ensure_valid("update_sale", command.validate())?;

        let mut sale = self.load_sale(command.id).await?;

        sale.update_customer_info(command.customer_id, command.customer_name.clone())?;
        sale.update_branch_info(command.branch_id, command.branch_name.clone())?;

        for line in &command.items {
            if sale.find_item(line.product_id).is_some() {
                sale.update_item(line.product_id, line.quantity)?;
            } else {
                sale.add_item(
                    line.product_id,
                    line.product_name.clone(),
                    line.quantity,
                    line.unit_price(),
                )?;
            }
        }

        let saved = self.save_sale(&sale).await?;

        info!(
            sale_id = %saved.id(),
            total = %saved.total_amount(),
            items = saved.items().len(),
            "Sale updated"
        );

        Ok(SaleResult::from(&saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::delete_sale::DeleteSaleCommand;
    use crate::commands::get_sale::GetSaleQuery;
    use crate::commands::results::SaleResult;
    use crate::commands::test_support::*;
    use crate::error::ErrorCode;
    use rust_decimal_macros::dec;

    fn command_for(sale: &SaleResult, items: Vec<SaleLineCommand>) -> UpdateSaleCommand {
        UpdateSaleCommand {
            id: sale.id,
            customer_id: sale.customer_id,
            customer_name: sale.customer_name.clone(),
            branch_id: sale.branch_id,
            branch_name: sale.branch_name.clone(),
            items,
        }
    }

    fn existing(sale: &SaleResult, index: usize, quantity: i64) -> SaleLineCommand {
        let item = &sale.items[index];
        SaleLineCommand {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity,
            unit_price: item.unit_price,
        }
    }

    #[tokio::test]
    async fn test_update_changes_quantity_and_adds_line() {
        let service = service().await;
        let created = create(&service, vec![line(3, dec!(10.00))]).await;

        let updated = service
            .update_sale(command_for(
                &created,
                vec![existing(&created, 0, 10), line(1, dec!(4.00))],
            ))
            .await
            .unwrap();

        // 10 × 10.00 × 0.8 + 4.00
        assert_eq!(updated.total_amount, dec!(84.00));
        assert_eq!(updated.items.len(), 2);
        assert_eq!(updated.items[0].discount, dec!(0.20));
        assert!(updated.updated_at.is_some());

        let fetched = service
            .get_sale(GetSaleQuery { id: created.id })
            .await
            .unwrap();
        assert_eq!(fetched.total_amount, dec!(84.00));
    }

    #[tokio::test]
    async fn test_existing_line_keeps_name_and_price() {
        let service = service().await;
        let created = create(&service, vec![line(1, dec!(10.00))]).await;

        let mut changed = existing(&created, 0, 2);
        changed.product_name = "Renamed".to_string();
        changed.unit_price = dec!(99.00);

        let updated = service
            .update_sale(command_for(&created, vec![changed]))
            .await
            .unwrap();

        assert_eq!(updated.items[0].product_name, "Lager 350ml");
        assert_eq!(updated.items[0].unit_price, dec!(10.00));
        assert_eq!(updated.total_amount, dec!(20.00));
    }

    #[tokio::test]
    async fn test_update_customer_and_branch() {
        let service = service().await;
        let created = create(&service, vec![line(1, dec!(1.00))]).await;

        let mut command = command_for(&created, vec![existing(&created, 0, 1)]);
        command.customer_id = Uuid::new_v4();
        command.customer_name = "New Customer".to_string();
        command.branch_name = "Uptown".to_string();

        let updated = service.update_sale(command.clone()).await.unwrap();

        assert_eq!(updated.customer_id, command.customer_id);
        assert_eq!(updated.customer_name, "New Customer");
        assert_eq!(updated.branch_name, "Uptown");
    }

    #[tokio::test]
    async fn test_update_cancelled_sale_is_refused() {
        let service = service().await;
        let created = create(&service, vec![line(1, dec!(1.00))]).await;
        service
            .delete_sale(DeleteSaleCommand {
                id: created.id,
                hard_delete: false,
            })
            .await
            .unwrap();

        let err = service
            .update_sale(command_for(&created, vec![existing(&created, 0, 2)]))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert_eq!(err.reason, Some("SALE_CANCELLED"));
    }

    #[tokio::test]
    async fn test_failed_update_persists_nothing() {
        let service = service().await;
        let created = create(&service, vec![line(1, dec!(5.00)), line(1, dec!(6.00))]).await;
        service
            .cancel_sale_item(crate::commands::cancel_sale_item::CancelSaleItemCommand {
                sale_id: created.id,
                product_id: created.items[1].product_id,
            })
            .await
            .unwrap();

        // first line would change, second is cancelled and refuses
        let err = service
            .update_sale(command_for(
                &created,
                vec![existing(&created, 0, 5), existing(&created, 1, 5)],
            ))
            .await
            .unwrap_err();
        assert_eq!(err.reason, Some("ITEM_CANCELLED"));

        let fetched = service
            .get_sale(GetSaleQuery { id: created.id })
            .await
            .unwrap();
        assert_eq!(fetched.items[0].quantity, 1);
        assert_eq!(fetched.total_amount, dec!(5.00));
    }

    #[tokio::test]
    async fn test_new_line_above_price_limit_is_rejected() {
        let service = service().await;
        let created = create(&service, vec![line(1, dec!(5.00))]).await;
        let huge = rust_decimal::Decimal::MAX / rust_decimal::Decimal::from(10);

        let err = service
            .update_sale(command_for(
                &created,
                vec![existing(&created, 0, 1), line(20, huge)],
            ))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("items[1].unit_price"));

        let fetched = service
            .get_sale(GetSaleQuery { id: created.id })
            .await
            .unwrap();
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.total_amount, dec!(5.00));
    }

    #[tokio::test]
    async fn test_update_missing_sale() {
        let service = service().await;
        let created = create(&service, vec![line(1, dec!(1.00))]).await;
        let mut command = command_for(&created, vec![existing(&created, 0, 2)]);
        command.id = Uuid::new_v4();

        let err = service.update_sale(command).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
