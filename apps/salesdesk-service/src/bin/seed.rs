//! # Seed
//!
//! Fills a database with demo sales through the regular commands, so the
//! data obeys every business rule.
//!
//! ```text
//! SALESDESK_DB_PATH=demo.db seed [COUNT]
//! ```
//!
//! COUNT defaults to 12. Every fourth sale loses a line, every seventh is
//! cancelled.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use salesdesk_service::commands::cancel_sale_item::CancelSaleItemCommand;
use salesdesk_service::commands::create_sale::CreateSaleCommand;
use salesdesk_service::commands::delete_sale::DeleteSaleCommand;
use salesdesk_service::commands::list_sales::ListSalesQuery;
use salesdesk_service::commands::SaleLineCommand;
use salesdesk_service::telemetry::init_tracing;
use salesdesk_service::{SalesService, ServiceConfig};

const DEFAULT_COUNT: usize = 12;

const CUSTOMERS: [&str; 4] = ["Ana Souza", "Bruno Lima", "Carla Dias", "Diego Alves"];
const BRANCHES: [&str; 2] = ["Downtown", "Airport"];

/// (name, price in cents)
const PRODUCTS: [(&str, i64); 6] = [
    ("Lager 350ml", 450),
    ("Lager 600ml", 790),
    ("IPA 473ml", 1290),
    ("Stout 355ml", 1150),
    ("Soda 350ml", 350),
    ("Mineral Water 500ml", 250),
];

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load().context("loading configuration")?;
    init_tracing(&config.log_filter);

    let count = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("COUNT must be a number, got '{arg}'"))?,
        None => DEFAULT_COUNT,
    };

    info!(
        path = %config.database_path.display(),
        count,
        "Seeding demo sales"
    );

    let service = SalesService::from_config(&config).await?;

    let customers: Vec<(Uuid, &str)> = CUSTOMERS.iter().map(|n| (Uuid::new_v4(), *n)).collect();
    let branches: Vec<(Uuid, &str)> = BRANCHES.iter().map(|n| (Uuid::new_v4(), *n)).collect();
    let products: Vec<(Uuid, &str, Decimal)> = PRODUCTS
        .iter()
        .map(|(name, cents)| (Uuid::new_v4(), *name, Decimal::new(*cents, 2)))
        .collect();

    for n in 0..count {
        let (customer_id, customer_name) = customers[n % customers.len()];
        let (branch_id, branch_name) = branches[n % branches.len()];

        // 1 to 3 lines, quantities cycling through every discount tier
        let line_count = 1 + n % 3;
        let items: Vec<SaleLineCommand> = (0..line_count)
            .map(|i| {
                let (product_id, product_name, unit_price) = products[(n + i) % products.len()];
                SaleLineCommand {
                    product_id,
                    product_name: product_name.to_string(),
                    quantity: 1 + ((n * 3 + i * 5) % 20) as i64,
                    unit_price,
                }
            })
            .collect();

        let sale = service
            .create_sale(CreateSaleCommand {
                customer_id,
                customer_name: customer_name.to_string(),
                branch_id,
                branch_name: branch_name.to_string(),
                items,
            })
            .await?;

        if n % 4 == 3 {
            service
                .cancel_sale_item(CancelSaleItemCommand {
                    sale_id: sale.id,
                    product_id: sale.items[0].product_id,
                })
                .await?;
        }

        if n % 7 == 6 {
            service
                .delete_sale(DeleteSaleCommand {
                    id: sale.id,
                    hard_delete: false,
                })
                .await?;
        }
    }

    let listed = service.list_sales(ListSalesQuery::default()).await?;
    let revenue: Decimal = listed.sales.iter().map(|s| s.total_amount).sum();

    info!(sales = listed.sales.len(), revenue = %revenue, "Seeding complete");

    service.database().close().await;
    Ok(())
}
