//! # Order Repositories
//!
//! Orders and their line items.
//!
//! ## Status Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Does this table still have an order in progress?"                     │
//! │                                                                         │
//! │  SELECT EXISTS (                                                        │
//! │      SELECT 1 FROM orders                                               │
//! │      WHERE order_table_id IN (?, ?)            ← one or many tables     │
//! │        AND order_status  IN ('COOKING','MEAL') ← OrderStatus::IN_PROGRESS│
//! │  )                                                                      │
//! │                                                                         │
//! │  Served by idx_orders_table_status (order_table_id, order_status).     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

use kitchenpos_core::repository::{OrderLineItemRepository, OrderRepository, Repository};
use kitchenpos_core::{Id, Order, OrderLineItem, OrderStatus, RepositoryResult};

use super::{push_ids, push_statuses, DbHandle};
use crate::error::{DbError, DbResult};

const ORDER_COLUMNS: &str = "SELECT id, order_table_id, order_status, ordered_time FROM orders";

const LINE_ITEM_COLUMNS: &str = "SELECT seq, order_id, menu_id, quantity FROM order_line_item";

// =============================================================================
// Order
// =============================================================================

/// Repository for the `orders` table.
#[derive(Debug, Clone)]
pub struct SqliteOrderRepository {
    db: DbHandle,
}

impl SqliteOrderRepository {
    pub(crate) fn new(db: DbHandle) -> Self {
        SqliteOrderRepository { db }
    }

    async fn insert(&self, mut order: Order) -> DbResult<Order> {
        let mut conn = self.db.acquire().await?;
        let id = sqlx::query(
            r#"
            INSERT INTO orders (order_table_id, order_status, ordered_time)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(order.order_table_id)
        .bind(order.order_status)
        .bind(order.ordered_time)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        debug!(order_id = id, order_table_id = order.order_table_id, "Order inserted");
        order.id = Some(id);
        Ok(order)
    }

    async fn update(&self, id: Id, order: Order) -> DbResult<Order> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET order_table_id = ?1, order_status = ?2, ordered_time = ?3
            WHERE id = ?4
            "#,
        )
        .bind(order.order_table_id)
        .bind(order.order_status)
        .bind(order.ordered_time)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        debug!(order_id = id, status = %order.order_status, "Order updated");
        Ok(order)
    }

    /// Runs `SELECT EXISTS (... WHERE order_table_id IN .. AND order_status IN ..)`.
    async fn exists_in_status(
        &self,
        order_table_ids: &[Id],
        statuses: &[OrderStatus],
    ) -> DbResult<bool> {
        if order_table_ids.is_empty() || statuses.is_empty() {
            return Ok(false);
        }

        let mut conn = self.db.acquire().await?;
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT EXISTS (SELECT 1 FROM orders WHERE order_table_id IN ",
        );
        push_ids(&mut query, order_table_ids);
        query.push(" AND order_status IN ");
        push_statuses(&mut query, statuses);
        query.push(")");

        let exists = query
            .build_query_scalar::<bool>()
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl Repository<Order> for SqliteOrderRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Order>> {
        let mut conn = self.db.acquire().await?;
        let order = sqlx::query_as::<_, Order>(&format!("{ORDER_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::from)?;
        Ok(order)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        let mut conn = self.db.acquire().await?;
        let orders = sqlx::query_as::<_, Order>(&format!("{ORDER_COLUMNS} ORDER BY id"))
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::from)?;
        Ok(orders)
    }

    async fn save(&self, order: Order) -> RepositoryResult<Order> {
        let saved = match order.id {
            Some(id) => self.update(id, order).await?,
            None => self.insert(order).await?,
        };
        Ok(saved)
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn exists_by_order_table_id_and_order_status_in(
        &self,
        order_table_id: Id,
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool> {
        Ok(self.exists_in_status(&[order_table_id], statuses).await?)
    }

    async fn exists_by_order_table_id_in_and_order_status_in(
        &self,
        order_table_ids: &[Id],
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool> {
        Ok(self.exists_in_status(order_table_ids, statuses).await?)
    }
}

// =============================================================================
// Order Line Item
// =============================================================================

/// Repository for the `order_line_item` table.
#[derive(Debug, Clone)]
pub struct SqliteOrderLineItemRepository {
    db: DbHandle,
}

impl SqliteOrderLineItemRepository {
    pub(crate) fn new(db: DbHandle) -> Self {
        SqliteOrderLineItemRepository { db }
    }

    async fn insert(&self, mut item: OrderLineItem) -> DbResult<OrderLineItem> {
        let mut conn = self.db.acquire().await?;
        let seq = sqlx::query(
            "INSERT INTO order_line_item (order_id, menu_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(item.order_id)
        .bind(item.menu_id)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        item.seq = Some(seq);
        Ok(item)
    }

    async fn update(&self, seq: Id, item: OrderLineItem) -> DbResult<OrderLineItem> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query(
            "UPDATE order_line_item SET order_id = ?1, menu_id = ?2, quantity = ?3 WHERE seq = ?4",
        )
        .bind(item.order_id)
        .bind(item.menu_id)
        .bind(item.quantity)
        .bind(seq)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("OrderLineItem", seq));
        }
        Ok(item)
    }
}

#[async_trait]
impl Repository<OrderLineItem> for SqliteOrderLineItemRepository {
    async fn find_by_id(&self, seq: Id) -> RepositoryResult<Option<OrderLineItem>> {
        let mut conn = self.db.acquire().await?;
        let item =
            sqlx::query_as::<_, OrderLineItem>(&format!("{LINE_ITEM_COLUMNS} WHERE seq = ?1"))
                .bind(seq)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(item)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<OrderLineItem>> {
        let mut conn = self.db.acquire().await?;
        let items =
            sqlx::query_as::<_, OrderLineItem>(&format!("{LINE_ITEM_COLUMNS} ORDER BY seq"))
                .fetch_all(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(items)
    }

    async fn save(&self, item: OrderLineItem) -> RepositoryResult<OrderLineItem> {
        let saved = match item.seq {
            Some(seq) => self.update(seq, item).await?,
            None => self.insert(item).await?,
        };
        Ok(saved)
    }
}

#[async_trait]
impl OrderLineItemRepository for SqliteOrderLineItemRepository {
    async fn find_all_by_order_id(&self, order_id: Id) -> RepositoryResult<Vec<OrderLineItem>> {
        let mut conn = self.db.acquire().await?;
        let items = sqlx::query_as::<_, OrderLineItem>(&format!(
            "{LINE_ITEM_COLUMNS} WHERE order_id = ?1 ORDER BY seq"
        ))
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(DbError::from)?;
        Ok(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
