//! # Table Repositories
//!
//! Order tables and table groups.
//!
//! Group membership lives only on `order_table.table_group_id`; the
//! `table_group` row stores nothing but its creation date.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

use kitchenpos_core::repository::{OrderTableRepository, Repository, TableGroupRepository};
use kitchenpos_core::{Id, OrderTable, RepositoryResult, TableGroup};

use super::{push_ids, DbHandle};
use crate::error::{DbError, DbResult};

const ORDER_TABLE_COLUMNS: &str =
    "SELECT id, table_group_id, number_of_guests, empty FROM order_table";

// =============================================================================
// Order Table
// =============================================================================

/// Repository for the `order_table` table.
#[derive(Debug, Clone)]
pub struct SqliteOrderTableRepository {
    db: DbHandle,
}

impl SqliteOrderTableRepository {
    pub(crate) fn new(db: DbHandle) -> Self {
        SqliteOrderTableRepository { db }
    }

    async fn insert(&self, mut table: OrderTable) -> DbResult<OrderTable> {
        let mut conn = self.db.acquire().await?;
        let id = sqlx::query(
            r#"
            INSERT INTO order_table (table_group_id, number_of_guests, empty)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(table.table_group_id)
        .bind(table.number_of_guests)
        .bind(table.empty)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        debug!(table_id = id, empty = table.empty, "Order table inserted");
        table.id = Some(id);
        Ok(table)
    }

    async fn update(&self, id: Id, table: OrderTable) -> DbResult<OrderTable> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE order_table
            SET table_group_id = ?1, number_of_guests = ?2, empty = ?3
            WHERE id = ?4
            "#,
        )
        .bind(table.table_group_id)
        .bind(table.number_of_guests)
        .bind(table.empty)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("OrderTable", id));
        }

        debug!(
            table_id = id,
            table_group_id = ?table.table_group_id,
            empty = table.empty,
            "Order table updated"
        );
        Ok(table)
    }
}

#[async_trait]
impl Repository<OrderTable> for SqliteOrderTableRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<OrderTable>> {
        let mut conn = self.db.acquire().await?;
        let table =
            sqlx::query_as::<_, OrderTable>(&format!("{ORDER_TABLE_COLUMNS} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(table)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<OrderTable>> {
        let mut conn = self.db.acquire().await?;
        let tables =
            sqlx::query_as::<_, OrderTable>(&format!("{ORDER_TABLE_COLUMNS} ORDER BY id"))
                .fetch_all(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(tables)
    }

    async fn save(&self, table: OrderTable) -> RepositoryResult<OrderTable> {
        let saved = match table.id {
            Some(id) => self.update(id, table).await?,
            None => self.insert(table).await?,
        };
        Ok(saved)
    }
}

#[async_trait]
impl OrderTableRepository for SqliteOrderTableRepository {
    async fn find_all_by_id_in(&self, ids: &[Id]) -> RepositoryResult<Vec<OrderTable>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.db.acquire().await?;
        let mut query = QueryBuilder::<Sqlite>::new(ORDER_TABLE_COLUMNS);
        query.push(" WHERE id IN ");
        push_ids(&mut query, ids);
        query.push(" ORDER BY id");

        let tables = query
            .build_query_as::<OrderTable>()
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::from)?;

        debug!(requested = ids.len(), found = tables.len(), "Fetched order tables");
        Ok(tables)
    }

    async fn find_all_by_table_group_id(
        &self,
        table_group_id: Id,
    ) -> RepositoryResult<Vec<OrderTable>> {
        let mut conn = self.db.acquire().await?;
        let tables = sqlx::query_as::<_, OrderTable>(&format!(
            "{ORDER_TABLE_COLUMNS} WHERE table_group_id = ?1 ORDER BY id"
        ))
        .bind(table_group_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(DbError::from)?;
        Ok(tables)
    }
}

// =============================================================================
// Table Group
// =============================================================================

/// Repository for the `table_group` table.
#[derive(Debug, Clone)]
pub struct SqliteTableGroupRepository {
    db: DbHandle,
}

impl SqliteTableGroupRepository {
    pub(crate) fn new(db: DbHandle) -> Self {
        SqliteTableGroupRepository { db }
    }

    async fn insert(&self, mut group: TableGroup) -> DbResult<TableGroup> {
        let mut conn = self.db.acquire().await?;
        let id = sqlx::query("INSERT INTO table_group (created_date) VALUES (?1)")
            .bind(group.created_date)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();

        debug!(table_group_id = id, "Table group inserted");
        group.id = Some(id);
        Ok(group)
    }

    async fn update(&self, id: Id, group: TableGroup) -> DbResult<TableGroup> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query("UPDATE table_group SET created_date = ?1 WHERE id = ?2")
            .bind(group.created_date)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TableGroup", id));
        }
        Ok(group)
    }
}

#[async_trait]
impl Repository<TableGroup> for SqliteTableGroupRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<TableGroup>> {
        let mut conn = self.db.acquire().await?;
        let group = sqlx::query_as::<_, TableGroup>(
            "SELECT id, created_date FROM table_group WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::from)?;
        Ok(group)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<TableGroup>> {
        let mut conn = self.db.acquire().await?;
        let groups =
            sqlx::query_as::<_, TableGroup>("SELECT id, created_date FROM table_group ORDER BY id")
                .fetch_all(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(groups)
    }

    async fn save(&self, group: TableGroup) -> RepositoryResult<TableGroup> {
        let saved = match group.id {
            Some(id) => self.update(id, group).await?,
            None => self.insert(group).await?,
        };
        Ok(saved)
    }
}

impl TableGroupRepository for SqliteTableGroupRepository {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Utc;
    use kitchenpos_core::RepositoryError;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_order_table_round_trip() {
        let db = setup().await;
        let repo = db.order_tables();

        let mut table = repo.save(OrderTable::new(0, true)).await.unwrap();
        assert_eq!(table.id, Some(1));

        table.empty = false;
        table.number_of_guests = 4;
        repo.save(table.clone()).await.unwrap();

        assert_eq!(repo.find_by_id(1).await.unwrap(), Some(table));
        assert_eq!(repo.find_by_id(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_unknown_table_is_not_found() {
        let db = setup().await;
        let mut ghost = OrderTable::new(0, true);
        ghost.id = Some(3);

        let err = db.order_tables().save(ghost).await.unwrap_err();
        assert_eq!(err, RepositoryError::not_found("OrderTable", 3));
    }

    #[tokio::test]
    async fn test_find_all_by_id_in() {
        let db = setup().await;
        let repo = db.order_tables();
        for _ in 0..3 {
            repo.save(OrderTable::new(0, true)).await.unwrap();
        }

        let ids = |tables: Vec<OrderTable>| -> Vec<Id> {
            tables.into_iter().filter_map(|t| t.id).collect()
        };
        assert_eq!(ids(repo.find_all_by_id_in(&[3, 1]).await.unwrap()), vec![1, 3]);
        assert_eq!(ids(repo.find_all_by_id_in(&[1, 1]).await.unwrap()), vec![1]);
        assert_eq!(ids(repo.find_all_by_id_in(&[2, 99]).await.unwrap()), vec![2]);
        assert!(repo.find_all_by_id_in(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tables_by_group() {
        let db = setup().await;
        let group = db
            .table_groups()
            .save(TableGroup {
                id: None,
                created_date: Utc::now(),
                order_tables: vec![],
            })
            .await
            .unwrap();
        let group_id = group.id.unwrap();

        let repo = db.order_tables();
        let mut grouped = repo.save(OrderTable::new(0, true)).await.unwrap();
        repo.save(OrderTable::new(0, true)).await.unwrap();
        grouped.table_group_id = Some(group_id);
        grouped.empty = false;
        repo.save(grouped.clone()).await.unwrap();

        let members = repo.find_all_by_table_group_id(group_id).await.unwrap();
        assert_eq!(members, vec![grouped]);

        let found = db.table_groups().find_by_id(group_id).await.unwrap().unwrap();
        assert!(found.order_tables.is_empty());
        assert_eq!(db.table_groups().find_all().await.unwrap().len(), 1);
    }
}
