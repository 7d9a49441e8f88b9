//! Instrument repository implementation
//!
//! Queries over the `instrument` table. Filters are assembled with
//! `QueryBuilder` so that only the fields a caller sets become bound
//! predicates.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, QueryBuilder, Transaction};
use tracing::{debug, instrument};

use core_kernel::{DateRange, InstrumentId, Page, PageRequest};
use domain_instrument::{
    Instrument, InstrumentFilter, InstrumentRepository, InstrumentUpdate, NewInstrument, StoreError,
};

use crate::error::DatabaseError;

const COLUMNS: &str = "id, exchange_product_id, exchange_product_name, oil_id, \
    delivery_basis_id, delivery_basis_name, delivery_type_id, \
    volume, total, count, trading_date, created_on, updated_on";

/// A row of the `instrument` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InstrumentRow {
    pub id: i64,
    pub exchange_product_id: String,
    pub exchange_product_name: String,
    pub oil_id: String,
    pub delivery_basis_id: String,
    pub delivery_basis_name: String,
    pub delivery_type_id: String,
    pub volume: Decimal,
    pub total: Decimal,
    pub count: Decimal,
    pub trading_date: NaiveDate,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl From<InstrumentRow> for Instrument {
    fn from(row: InstrumentRow) -> Self {
        Instrument {
            id: InstrumentId::new(row.id),
            exchange_product_id: row.exchange_product_id,
            exchange_product_name: row.exchange_product_name,
            oil_id: row.oil_id,
            delivery_basis_id: row.delivery_basis_id,
            delivery_basis_name: row.delivery_basis_name,
            delivery_type_id: row.delivery_type_id,
            volume: row.volume,
            total: row.total,
            count: row.count,
            date: row.trading_date,
            created_on: row.created_on,
            updated_on: row.updated_on,
        }
    }
}

/// Repository bound to one open transaction
///
/// The transaction is owned here so that queries can borrow it mutably;
/// the owning [`PgSession`](crate::PgSession) takes it back to commit or
/// roll back.
pub struct PgInstrumentRepository {
    tx: Option<Transaction<'static, Postgres>>,
}

impl std::fmt::Debug for PgInstrumentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgInstrumentRepository")
            .field("in_transaction", &self.tx.is_some())
            .finish()
    }
}

impl PgInstrumentRepository {
    pub(crate) fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Hands the transaction back to the session, leaving the repository inert
    pub(crate) fn take_transaction(&mut self) -> Option<Transaction<'static, Postgres>> {
        self.tx.take()
    }

    fn conn(&mut self) -> Result<&mut PgConnection, StoreError> {
        self.tx.as_deref_mut().ok_or(StoreError::SessionClosed)
    }

    async fn count_matching(
        &mut self,
        filter: &InstrumentFilter,
        range: Option<DateRange>,
    ) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM instrument");
        push_where(&mut builder, filter, range);
        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;
        Ok(total.max(0) as u64)
    }

    async fn fetch_page(
        &mut self,
        filter: &InstrumentFilter,
        range: Option<DateRange>,
        order_by: &str,
        page: PageRequest,
    ) -> Result<Page<Instrument>, StoreError> {
        let total = self.count_matching(filter, range).await?;

        let mut builder = page_query(filter, range, order_by, page);
        let rows: Vec<InstrumentRow> = builder
            .build_query_as::<InstrumentRow>()
            .fetch_all(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;

        debug!(total, returned = rows.len(), "fetched page");
        Ok(Page::new(rows.into_iter().map(Instrument::from).collect(), total, page))
    }
}

#[async_trait]
impl InstrumentRepository for PgInstrumentRepository {
    #[instrument(skip(self, new))]
    async fn insert(&mut self, new: NewInstrument) -> Result<(), StoreError> {
        insert_builder(new, "")
            .build()
            .execute(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    #[instrument(skip(self, new))]
    async fn insert_returning_id(&mut self, new: NewInstrument) -> Result<InstrumentId, StoreError> {
        let id = insert_builder(new, " RETURNING id")
            .build_query_scalar::<i64>()
            .fetch_one(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;
        Ok(InstrumentId::new(id))
    }

    #[instrument(skip(self, new))]
    async fn insert_returning(&mut self, new: NewInstrument) -> Result<Instrument, StoreError> {
        let row: InstrumentRow = insert_builder(new, &format!(" RETURNING {}", COLUMNS))
            .build_query_as::<InstrumentRow>()
            .fetch_one(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn find_one(&mut self, filter: &InstrumentFilter) -> Result<Option<Instrument>, StoreError> {
        let mut builder = select_matching(filter, None);
        builder.push(" ORDER BY id LIMIT 2");
        let mut rows: Vec<InstrumentRow> = builder
            .build_query_as::<InstrumentRow>()
            .fetch_all(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;

        if rows.len() > 1 {
            let matched = self.count_matching(filter, None).await?;
            return Err(StoreError::AmbiguousResult { matched });
        }
        Ok(rows.pop().map(Instrument::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&mut self, filter: &InstrumentFilter) -> Result<Vec<Instrument>, StoreError> {
        let mut builder = select_matching(filter, None);
        builder.push(" ORDER BY id");
        let rows: Vec<InstrumentRow> = builder
            .build_query_as::<InstrumentRow>()
            .fetch_all(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(Instrument::from).collect())
    }

    #[instrument(skip(self, update))]
    async fn update_by_id(
        &mut self,
        id: InstrumentId,
        update: InstrumentUpdate,
    ) -> Result<Option<Instrument>, StoreError> {
        let row: Option<InstrumentRow> = update_builder(id, update, Utc::now())
            .build_query_as::<InstrumentRow>()
            .fetch_optional(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;
        Ok(row.map(Instrument::from))
    }

    #[instrument(skip(self))]
    async fn delete_by_filter(&mut self, filter: &InstrumentFilter) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::new("DELETE FROM instrument");
        push_where(&mut builder, filter, None);
        let result = builder
            .build()
            .execute(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_all(&mut self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM instrument")
            .execute(self.conn()?)
            .await
            .map_err(DatabaseError::from)?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn recent_trading_dates(&mut self, count: u32) -> Result<Vec<NaiveDate>, StoreError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT DISTINCT trading_date FROM instrument ORDER BY trading_date DESC LIMIT $1",
        )
        .bind(i64::from(count))
        .fetch_all(self.conn()?)
        .await
        .map_err(DatabaseError::from)?;
        Ok(dates)
    }

    #[instrument(skip(self))]
    async fn dynamics(
        &mut self,
        range: DateRange,
        filter: &InstrumentFilter,
        page: PageRequest,
    ) -> Result<Page<Instrument>, StoreError> {
        self.fetch_page(filter, Some(range), "trading_date ASC, id ASC", page).await
    }

    #[instrument(skip(self))]
    async fn trading_results(
        &mut self,
        filter: &InstrumentFilter,
        page: PageRequest,
    ) -> Result<Page<Instrument>, StoreError> {
        self.fetch_page(filter, None, "trading_date DESC, id ASC", page).await
    }
}

// ============================================================================
// SQL assembly
// ============================================================================

fn select_matching(filter: &InstrumentFilter, range: Option<DateRange>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM instrument", COLUMNS));
    push_where(&mut builder, filter, range);
    builder
}

fn page_query(
    filter: &InstrumentFilter,
    range: Option<DateRange>,
    order_by: &str,
    page: PageRequest,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = select_matching(filter, range);
    builder.push(" ORDER BY ").push(order_by);
    push_page(&mut builder, page);
    builder
}

/// Appends a WHERE clause with one bound equality per set filter field
fn push_where(builder: &mut QueryBuilder<'static, Postgres>, filter: &InstrumentFilter, range: Option<DateRange>) {
    builder.push(" WHERE TRUE");
    if let Some(id) = filter.id {
        builder.push(" AND id = ").push_bind(id.value());
    }
    push_text_eq(builder, "exchange_product_id", &filter.exchange_product_id);
    push_text_eq(builder, "exchange_product_name", &filter.exchange_product_name);
    push_text_eq(builder, "oil_id", &filter.oil_id);
    push_text_eq(builder, "delivery_basis_id", &filter.delivery_basis_id);
    push_text_eq(builder, "delivery_basis_name", &filter.delivery_basis_name);
    push_text_eq(builder, "delivery_type_id", &filter.delivery_type_id);
    if let Some(date) = filter.date {
        builder.push(" AND trading_date = ").push_bind(date);
    }
    if let Some(range) = range {
        builder
            .push(" AND trading_date BETWEEN ")
            .push_bind(range.start())
            .push(" AND ")
            .push_bind(range.end());
    }
}

fn push_text_eq(builder: &mut QueryBuilder<'static, Postgres>, column: &str, value: &Option<String>) {
    if let Some(value) = value {
        builder.push(" AND ").push(column).push(" = ").push_bind(value.clone());
    }
}

fn push_page(builder: &mut QueryBuilder<'static, Postgres>, page: PageRequest) {
    builder
        .push(" LIMIT ")
        .push_bind(page.limit() as i64)
        .push(" OFFSET ")
        .push_bind(page.offset() as i64);
}

fn insert_builder(new: NewInstrument, returning: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "INSERT INTO instrument (exchange_product_id, exchange_product_name, oil_id, \
         delivery_basis_id, delivery_basis_name, delivery_type_id, \
         volume, total, count, trading_date) ",
    );
    builder.push_values(std::iter::once(new), |mut b, new| {
        b.push_bind(new.exchange_product_id)
            .push_bind(new.exchange_product_name)
            .push_bind(new.oil_id)
            .push_bind(new.delivery_basis_id)
            .push_bind(new.delivery_basis_name)
            .push_bind(new.delivery_type_id)
            .push_bind(new.volume)
            .push_bind(new.total)
            .push_bind(new.count)
            .push_bind(new.date);
    });
    builder.push(returning);
    builder
}

/// Builds an UPDATE that sets only the fields present in `update`
fn update_builder(id: InstrumentId, update: InstrumentUpdate, now: DateTime<Utc>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE instrument SET ");
    let mut set = builder.separated(", ");
    if let Some(v) = update.exchange_product_id {
        set.push("exchange_product_id = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.exchange_product_name {
        set.push("exchange_product_name = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.oil_id {
        set.push("oil_id = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.delivery_basis_id {
        set.push("delivery_basis_id = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.delivery_basis_name {
        set.push("delivery_basis_name = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.delivery_type_id {
        set.push("delivery_type_id = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.volume {
        set.push("volume = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.total {
        set.push("total = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.count {
        set.push("count = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.date {
        set.push("trading_date = ").push_bind_unseparated(v);
    }
    set.push("updated_on = ").push_bind_unseparated(now);

    builder.push(" WHERE id = ").push_bind(id.value());
    builder.push(" RETURNING ").push(COLUMNS);
    builder
}
