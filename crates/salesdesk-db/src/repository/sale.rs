//! # Sale Repository
//!
//! Database operations for sales and their items.
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sale ↔ Rows                                      │
//! │                                                                         │
//! │  Sale ──snapshot()──► sales row        (1)                              │
//! │                      sale_items rows  (N, `position` = insertion order) │
//! │                                                                         │
//! │  sales row + sale_items rows ──► SaleSnapshot ──from_snapshot()──► Sale │
//! │                                                                         │
//! │  UUID    → TEXT (hyphenated)                                            │
//! │  Decimal → TEXT (full precision, never REAL)                            │
//! │  DateTime<Utc> → TEXT (RFC 3339)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes that touch more than one row run in a single transaction, so a
//! sale is never stored without its items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteConnection;
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use salesdesk_core::{
    DiscountRate, Money, Sale, SaleItem, SaleItemSnapshot, SaleSnapshot, SaleStatus,
};

// =============================================================================
// List Filter
// =============================================================================

/// Optional predicates for [`SaleRepository::list`]. Unset fields match
/// everything; date bounds are inclusive.
///
/// ## Example
/// ```rust
/// use salesdesk_db::SaleFilter;
/// use uuid::Uuid;
///
/// let filter = SaleFilter::new().customer_id(Uuid::new_v4());
/// assert!(filter.branch_id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub customer_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl SaleFilter {
    pub fn new() -> Self {
        SaleFilter::default()
    }

    pub fn customer_id(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn branch_id(mut self, branch_id: Uuid) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    sale_number: String,
    sale_date: DateTime<Utc>,
    customer_id: String,
    customer_name: String,
    branch_id: String,
    branch_name: String,
    total_amount: String,
    status: SaleStatus,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct SaleItemRow {
    id: String,
    sale_id: String,
    product_id: String,
    product_name: String,
    quantity: i64,
    unit_price: String,
    discount: String,
    total_amount: String,
    is_cancelled: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl SaleRow {
    fn into_sale(self, items: Vec<SaleItemRow>) -> DbResult<Sale> {
        let items = items
            .into_iter()
            .map(SaleItemRow::into_snapshot)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Sale::from_snapshot(SaleSnapshot {
            id: parse_uuid("sales.id", &self.id)?,
            sale_number: self.sale_number,
            sale_date: self.sale_date,
            customer_id: parse_uuid("sales.customer_id", &self.customer_id)?,
            customer_name: self.customer_name,
            branch_id: parse_uuid("sales.branch_id", &self.branch_id)?,
            branch_name: self.branch_name,
            total_amount: parse_money("sales.total_amount", &self.total_amount)?,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items,
        }))
    }
}

impl SaleItemRow {
    fn into_snapshot(self) -> DbResult<SaleItemSnapshot> {
        Ok(SaleItemSnapshot {
            id: parse_uuid("sale_items.id", &self.id)?,
            sale_id: parse_uuid("sale_items.sale_id", &self.sale_id)?,
            product_id: parse_uuid("sale_items.product_id", &self.product_id)?,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price: parse_money("sale_items.unit_price", &self.unit_price)?,
            discount: DiscountRate::new(parse_decimal("sale_items.discount", &self.discount)?),
            total_amount: parse_money("sale_items.total_amount", &self.total_amount)?,
            is_cancelled: self.is_cancelled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_uuid(column: &str, value: &str) -> DbResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| DbError::corrupt(column, value))
}

fn parse_decimal(column: &str, value: &str) -> DbResult<Decimal> {
    Decimal::from_str(value).map_err(|_| DbError::corrupt(column, value))
}

fn parse_money(column: &str, value: &str) -> DbResult<Money> {
    parse_decimal(column, value).map(Money::new)
}

/// Full-precision text form of a decimal column.
fn decimal_text(value: Decimal) -> String {
    value.to_string()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale and all of its items.
    ///
    /// ## Errors
    /// - `UniqueViolation` if the sale number (or id) is taken
    pub async fn create(&self, sale: &Sale) -> DbResult<Sale> {
        debug!(
            id = %sale.id(),
            sale_number = %sale.sale_number(),
            items = sale.items().len(),
            "Inserting sale"
        );

        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;

        insert_sale_row(&mut tx, sale)
            .await
            .map_err(|err| match err {
                DbError::UniqueViolation { field, .. } if field.ends_with("sale_number") => {
                    DbError::duplicate(field, sale.sale_number())
                }
                other => other,
            })?;

        for (position, item) in sale.items().iter().enumerate() {
            upsert_item_row(&mut tx, item, position as i64).await?;
        }

        tx.commit().await.map_err(transaction_failed)?;

        Ok(sale.clone())
    }

    /// Gets a sale with its items by ID.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT
                id, sale_number, sale_date,
                customer_id, customer_name, branch_id, branch_name,
                total_amount, status, created_at, updated_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        self.with_items(row).await
    }

    /// Gets a sale with its items by sale number.
    pub async fn get_by_sale_number(&self, sale_number: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT
                id, sale_number, sale_date,
                customer_id, customer_name, branch_id, branch_name,
                total_amount, status, created_at, updated_at
            FROM sales
            WHERE sale_number = ?1
            "#,
        )
        .bind(sale_number)
        .fetch_optional(&self.pool)
        .await?;

        self.with_items(row).await
    }

    /// Writes the mutable state of a sale back, inserting new items and
    /// updating existing ones.
    ///
    /// `sale_number`, `sale_date` and `created_at` are never rewritten.
    ///
    /// ## Errors
    /// - `NotFound` if no row exists for the sale id
    pub async fn update(&self, sale: &Sale) -> DbResult<Sale> {
        debug!(
            id = %sale.id(),
            status = sale.status().as_str(),
            total = %sale.total_amount(),
            "Updating sale"
        );

        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                customer_id = ?2,
                customer_name = ?3,
                branch_id = ?4,
                branch_name = ?5,
                total_amount = ?6,
                status = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(sale.id().to_string())
        .bind(sale.customer_id().to_string())
        .bind(sale.customer_name())
        .bind(sale.branch_id().to_string())
        .bind(sale.branch_name())
        .bind(decimal_text(sale.total_amount().amount()))
        .bind(sale.status())
        .bind(sale.updated_at())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale.id().to_string()));
        }

        for (position, item) in sale.items().iter().enumerate() {
            upsert_item_row(&mut tx, item, position as i64).await?;
        }

        tx.commit().await.map_err(transaction_failed)?;

        Ok(sale.clone())
    }

    /// Hard-deletes a sale; its items go with it.
    ///
    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: Uuid) -> DbResult<bool> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists sales matching the filter, oldest sale date first.
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Vec<Sale>> {
        debug!(?filter, "Listing sales");

        let customer_id = filter.customer_id.map(|id| id.to_string());
        let branch_id = filter.branch_id.map(|id| id.to_string());

        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT
                id, sale_number, sale_date,
                customer_id, customer_name, branch_id, branch_name,
                total_amount, status, created_at, updated_at
            FROM sales
            WHERE (?1 IS NULL OR customer_id = ?1)
              AND (?2 IS NULL OR branch_id = ?2)
              AND (?3 IS NULL OR sale_date >= ?3)
              AND (?4 IS NULL OR sale_date <= ?4)
            ORDER BY sale_date, id
            "#,
        )
        .bind(customer_id.as_deref())
        .bind(branch_id.as_deref())
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // One query for the items of every matching sale
        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT
                i.id, i.sale_id, i.product_id, i.product_name,
                i.quantity, i.unit_price, i.discount, i.total_amount,
                i.is_cancelled, i.created_at, i.updated_at
            FROM sale_items i
            JOIN sales s ON s.id = i.sale_id
            WHERE (?1 IS NULL OR s.customer_id = ?1)
              AND (?2 IS NULL OR s.branch_id = ?2)
              AND (?3 IS NULL OR s.sale_date >= ?3)
              AND (?4 IS NULL OR s.sale_date <= ?4)
            ORDER BY i.sale_id, i.position
            "#,
        )
        .bind(customer_id.as_deref())
        .bind(branch_id.as_deref())
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_sale: HashMap<String, Vec<SaleItemRow>> = HashMap::new();
        for item in item_rows {
            items_by_sale
                .entry(item.sale_id.clone())
                .or_default()
                .push(item);
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_sale.remove(&row.id).unwrap_or_default();
                row.into_sale(items)
            })
            .collect()
    }

    /// Counts stored item rows for a sale, cancelled ones included.
    pub async fn count_items(&self, sale_id: Uuid) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE sale_id = ?1")
            .bind(sale_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn with_items(&self, row: Option<SaleRow>) -> DbResult<Option<Sale>> {
        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT
                id, sale_id, product_id, product_name,
                quantity, unit_price, discount, total_amount,
                is_cancelled, created_at, updated_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        row.into_sale(items).map(Some)
    }
}

// =============================================================================
// Statement Helpers
// =============================================================================

fn transaction_failed(err: sqlx::Error) -> DbError {
    DbError::TransactionFailed(err.to_string())
}

async fn insert_sale_row(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, sale_number, sale_date,
            customer_id, customer_name, branch_id, branch_name,
            total_amount, status, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3,
            ?4, ?5, ?6, ?7,
            ?8, ?9, ?10, ?11
        )
        "#,
    )
    .bind(sale.id().to_string())
    .bind(sale.sale_number())
    .bind(sale.sale_date())
    .bind(sale.customer_id().to_string())
    .bind(sale.customer_name())
    .bind(sale.branch_id().to_string())
    .bind(sale.branch_name())
    .bind(decimal_text(sale.total_amount().amount()))
    .bind(sale.status())
    .bind(sale.created_at())
    .bind(sale.updated_at())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Product identity, price and `created_at` are frozen once a line exists;
/// only the mutable columns change on conflict.
async fn upsert_item_row(conn: &mut SqliteConnection, item: &SaleItem, position: i64) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_items (
            id, sale_id, position,
            product_id, product_name, quantity,
            unit_price, discount, total_amount,
            is_cancelled, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3,
            ?4, ?5, ?6,
            ?7, ?8, ?9,
            ?10, ?11, ?12
        )
        ON CONFLICT(id) DO UPDATE SET
            position = excluded.position,
            quantity = excluded.quantity,
            discount = excluded.discount,
            total_amount = excluded.total_amount,
            is_cancelled = excluded.is_cancelled,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(item.id().to_string())
    .bind(item.sale_id().to_string())
    .bind(position)
    .bind(item.product_id().to_string())
    .bind(item.product_name())
    .bind(item.quantity())
    .bind(decimal_text(item.unit_price().amount()))
    .bind(decimal_text(item.discount().value()))
    .bind(decimal_text(item.total_amount().amount()))
    .bind(item.is_cancelled())
    .bind(item.created_at())
    .bind(item.updated_at())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use salesdesk_core::fixtures::{SaleFixture, SaleItemFixture};

    async fn repo() -> SaleRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().sales()
    }

    fn sale_with_items() -> Sale {
        let mut sale = Sale::new(
            Uuid::new_v4(),
            format!("SALE-20260101-{}", &Uuid::new_v4().simple().to_string()[..6]),
            Uuid::new_v4(),
            "Maria Silva",
            Uuid::new_v4(),
            "Downtown",
        );
        sale.add_item(Uuid::new_v4(), "Lager 350ml", 3, Money::new(dec!(10.00)))
            .unwrap();
        sale.add_item(Uuid::new_v4(), "Stout 500ml", 7, Money::new(dec!(3.35)))
            .unwrap();
        sale
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let repo = repo().await;
        let sale = sale_with_items();

        repo.create(&sale).await.unwrap();
        let loaded = repo.get_by_id(sale.id()).await.unwrap().unwrap();

        assert_eq!(loaded, sale);
        // 30.00 + 21.105, full precision survives storage
        assert_eq!(loaded.total_amount().amount(), dec!(51.105));
        assert_eq!(loaded.items()[1].total_amount().amount().to_string(), "21.105");
    }

    #[tokio::test]
    async fn test_get_by_sale_number() {
        let repo = repo().await;
        let sale = sale_with_items();
        repo.create(&sale).await.unwrap();

        let loaded = repo
            .get_by_sale_number(sale.sale_number())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(loaded.id(), sale.id());
        assert_eq!(loaded.items().len(), 2);
        assert!(repo.get_by_sale_number("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let repo = repo().await;
        assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sale_number_rejected() {
        let repo = repo().await;
        let first = SaleFixture::new().sale_number("SALE-DUP").build();
        let second = SaleFixture::new().sale_number("SALE-DUP").build();

        repo.create(&first).await.unwrap();
        let err = repo.create(&second).await.unwrap_err();

        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "SALE-DUP"),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
        assert!(repo.get_by_id(second.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_keeps_its_own_field() {
        let repo = repo().await;
        let first = sale_with_items();
        let second = Sale::new(
            first.id(),
            "SALE-20260101-OTHER",
            Uuid::new_v4(),
            "Someone Else",
            Uuid::new_v4(),
            "Uptown",
        );

        repo.create(&first).await.unwrap();
        let err = repo.create(&second).await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "sales.id");
                assert_eq!(value, "unknown");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
        let stored = repo.get_by_id(first.id()).await.unwrap().unwrap();
        assert_eq!(stored.sale_number(), first.sale_number());
    }

    #[tokio::test]
    async fn test_update_persists_mutations_in_order() {
        let repo = repo().await;
        let mut sale = sale_with_items();
        repo.create(&sale).await.unwrap();

        let first = sale.items()[0].product_id();
        let second = sale.items()[1].product_id();
        let third = Uuid::new_v4();

        sale.update_item(first, 10).unwrap();
        sale.cancel_item(second).unwrap();
        sale.add_item(third, "Cider", 4, Money::new(dec!(5.00)))
            .unwrap();
        sale.update_customer_info(Uuid::new_v4(), "João Souza")
            .unwrap();
        repo.update(&sale).await.unwrap();

        let loaded = repo.get_by_id(sale.id()).await.unwrap().unwrap();

        assert_eq!(loaded, sale);
        let order: Vec<Uuid> = loaded.items().iter().map(|i| i.product_id()).collect();
        assert_eq!(order, vec![first, second, third]);
        assert_eq!(loaded.total_amount(), Money::new(dec!(98.00)));
        assert_eq!(loaded.customer_name(), "João Souza");
    }

    #[tokio::test]
    async fn test_update_cancelled_sale() {
        let repo = repo().await;
        let mut sale = sale_with_items();
        repo.create(&sale).await.unwrap();

        sale.cancel().unwrap();
        repo.update(&sale).await.unwrap();

        let loaded = repo.get_by_id(sale.id()).await.unwrap().unwrap();
        assert_eq!(loaded.status(), SaleStatus::Cancelled);
        assert!(loaded.items().iter().all(|i| i.is_cancelled()));
        assert!(loaded.total_amount().is_zero());
    }

    #[tokio::test]
    async fn test_update_missing_sale() {
        let repo = repo().await;
        let sale = sale_with_items();

        let err = repo.update(&sale).await.unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(repo.count_items(sale.id()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let repo = repo().await;
        let sale = sale_with_items();
        repo.create(&sale).await.unwrap();
        assert_eq!(repo.count_items(sale.id()).await.unwrap(), 2);

        assert!(repo.delete(sale.id()).await.unwrap());
        assert!(!repo.delete(sale.id()).await.unwrap());

        assert!(repo.get_by_id(sale.id()).await.unwrap().is_none());
        assert_eq!(repo.count_items(sale.id()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let repo = repo().await;
        let customer = Uuid::new_v4();
        let branch = Uuid::new_v4();
        let base = Utc::now();

        let old = SaleFixture::new()
            .customer_id(customer)
            .sale_date(base - Duration::days(10))
            .item(SaleItemFixture::new(1, dec!(1.00)))
            .build();
        let mid = SaleFixture::new()
            .customer_id(customer)
            .branch_id(branch)
            .sale_date(base - Duration::days(5))
            .item(SaleItemFixture::new(4, dec!(2.00)))
            .item(SaleItemFixture::new(2, dec!(3.00)))
            .build();
        let recent = SaleFixture::new()
            .branch_id(branch)
            .sale_date(base)
            .build();

        // Inserted out of date order on purpose
        for sale in [&recent, &old, &mid] {
            repo.create(sale).await.unwrap();
        }

        let all = repo.list(&SaleFilter::new()).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(Sale::id).collect();
        assert_eq!(ids, vec![old.id(), mid.id(), recent.id()]);
        assert_eq!(all[1], mid);

        let by_customer = repo.list(&SaleFilter::new().customer_id(customer)).await.unwrap();
        assert_eq!(by_customer.len(), 2);

        let by_both = repo
            .list(&SaleFilter::new().customer_id(customer).branch_id(branch))
            .await
            .unwrap();
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].items().len(), 2);

        // Bounds are inclusive
        let window = repo
            .list(
                &SaleFilter::new()
                    .start_date(mid.sale_date())
                    .end_date(recent.sale_date()),
            )
            .await
            .unwrap();
        let ids: Vec<Uuid> = window.iter().map(Sale::id).collect();
        assert_eq!(ids, vec![mid.id(), recent.id()]);

        let none = repo
            .list(&SaleFilter::new().customer_id(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_decimal_is_reported() {
        let repo = repo().await;
        let sale = sale_with_items();
        repo.create(&sale).await.unwrap();

        sqlx::query("UPDATE sale_items SET unit_price = 'not-a-number'")
            .execute(&repo.pool)
            .await
            .unwrap();

        let err = repo.get_by_id(sale.id()).await.unwrap_err();
        match err {
            DbError::CorruptRow { column, value } => {
                assert_eq!(column, "sale_items.unit_price");
                assert_eq!(value, "not-a-number");
            }
            other => panic!("expected CorruptRow, got {other:?}"),
        }
    }
}
