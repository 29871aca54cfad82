//! # In-Memory Repositories
//!
//! Gateway implementations that keep everything in process memory.
//!
//! Each [`MemoryRepository`] is a cheap, cloneable handle to one table of
//! entities behind a `tokio::sync::RwLock`. Identifiers come from a per-table
//! sequence starting at 1. [`MemoryStore`] bundles one repository per entity
//! and builds the services on top of them, the same way `kitchenpos-db`'s
//! `Database` does for SQLite.
//!
//! There are no transactions here: each service call is assumed to run
//! alone. Use it for tests and single-caller tools.
//!
//! ## Usage
//! ```rust,ignore
//! use kitchenpos_core::repository::memory::MemoryStore;
//! use kitchenpos_core::OrderTableRequest;
//!
//! let store = MemoryStore::new();
//! let table = store
//!     .table_service()
//!     .create(OrderTableRequest { number_of_guests: 0, empty: true })
//!     .await?;
//! assert_eq!(table.id, Some(1));
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    Entity, MenuGroupRepository, MenuProductRepository, MenuRepository, OrderLineItemRepository,
    OrderRepository, OrderTableRepository, ProductRepository, Repository, TableGroupRepository,
};
use crate::error::{RepositoryError, RepositoryResult};
use crate::service::{
    MenuGroupService, MenuService, OrderService, ProductService, TableGroupService, TableService,
};
use crate::types::{
    Id, Menu, MenuGroup, MenuProduct, Order, OrderLineItem, OrderStatus, OrderTable, Product,
    TableGroup,
};

// =============================================================================
// Generic Table
// =============================================================================

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<Id, T>,
    last_id: Id,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

/// In-memory storage for one entity type.
#[derive(Debug)]
pub struct MemoryRepository<T> {
    table: Arc<RwLock<Table<T>>>,
}

impl<T> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        MemoryRepository {
            table: Arc::clone(&self.table),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        MemoryRepository {
            table: Arc::new(RwLock::new(Table::default())),
        }
    }
}

impl<T: Entity> MemoryRepository<T> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entities.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }

    /// Returns clones of every row matching `predicate`, ordered by id.
    async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.table
            .read()
            .await
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    async fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        self.table.read().await.rows.values().any(predicate)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<T>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn save(&self, mut entity: T) -> RepositoryResult<T> {
        let mut table = self.table.write().await;

        match entity.id() {
            Some(id) => {
                let row = table
                    .rows
                    .get_mut(&id)
                    .ok_or_else(|| RepositoryError::not_found(T::NAME, id))?;
                *row = entity.clone();
                debug!(entity = T::NAME, id, "Updated in memory");
            }
            None => {
                table.last_id += 1;
                let id = table.last_id;
                entity.set_id(id);
                table.rows.insert(id, entity.clone());
                debug!(entity = T::NAME, id, "Inserted in memory");
            }
        }

        Ok(entity)
    }
}

// =============================================================================
// Per-Entity Queries
// =============================================================================

impl ProductRepository for MemoryRepository<Product> {}

#[async_trait]
impl MenuGroupRepository for MemoryRepository<MenuGroup> {
    async fn exists_by_id(&self, id: Id) -> RepositoryResult<bool> {
        Ok(self.table.read().await.rows.contains_key(&id))
    }
}

#[async_trait]
impl MenuRepository for MemoryRepository<Menu> {
    async fn count_by_id_in(&self, ids: &[Id]) -> RepositoryResult<i64> {
        let table = self.table.read().await;
        let distinct: HashSet<&Id> = ids.iter().collect();
        let count = distinct
            .into_iter()
            .filter(|id| table.rows.contains_key(id))
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl MenuProductRepository for MemoryRepository<MenuProduct> {
    async fn find_all_by_menu_id(&self, menu_id: Id) -> RepositoryResult<Vec<MenuProduct>> {
        Ok(self.filter(|mp| mp.menu_id == Some(menu_id)).await)
    }
}

#[async_trait]
impl OrderRepository for MemoryRepository<Order> {
    async fn exists_by_order_table_id_and_order_status_in(
        &self,
        order_table_id: Id,
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool> {
        Ok(self
            .any(|o| o.order_table_id == order_table_id && statuses.contains(&o.order_status))
            .await)
    }

    async fn exists_by_order_table_id_in_and_order_status_in(
        &self,
        order_table_ids: &[Id],
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool> {
        Ok(self
            .any(|o| {
                order_table_ids.contains(&o.order_table_id) && statuses.contains(&o.order_status)
            })
            .await)
    }
}

#[async_trait]
impl OrderLineItemRepository for MemoryRepository<OrderLineItem> {
    async fn find_all_by_order_id(&self, order_id: Id) -> RepositoryResult<Vec<OrderLineItem>> {
        Ok(self.filter(|item| item.order_id == Some(order_id)).await)
    }
}

#[async_trait]
impl OrderTableRepository for MemoryRepository<OrderTable> {
    async fn find_all_by_id_in(&self, ids: &[Id]) -> RepositoryResult<Vec<OrderTable>> {
        Ok(self
            .filter(|t| t.id.is_some_and(|id| ids.contains(&id)))
            .await)
    }

    async fn find_all_by_table_group_id(
        &self,
        table_group_id: Id,
    ) -> RepositoryResult<Vec<OrderTable>> {
        Ok(self
            .filter(|t| t.table_group_id == Some(table_group_id))
            .await)
    }
}

impl TableGroupRepository for MemoryRepository<TableGroup> {}

// =============================================================================
// Memory Store
// =============================================================================

pub type MemoryOrderService = OrderService<
    MemoryRepository<Order>,
    MemoryRepository<OrderLineItem>,
    MemoryRepository<Menu>,
    MemoryRepository<OrderTable>,
>;
pub type MemoryTableService = TableService<MemoryRepository<OrderTable>, MemoryRepository<Order>>;
pub type MemoryTableGroupService = TableGroupService<
    MemoryRepository<TableGroup>,
    MemoryRepository<OrderTable>,
    MemoryRepository<Order>,
>;
pub type MemoryMenuService = MenuService<
    MemoryRepository<Menu>,
    MemoryRepository<Product>,
    MemoryRepository<MenuGroup>,
    MemoryRepository<MenuProduct>,
>;

/// One in-memory repository per entity, sharing nothing with other stores.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub products: MemoryRepository<Product>,
    pub menu_groups: MemoryRepository<MenuGroup>,
    pub menus: MemoryRepository<Menu>,
    pub menu_products: MemoryRepository<MenuProduct>,
    pub order_tables: MemoryRepository<OrderTable>,
    pub table_groups: MemoryRepository<TableGroup>,
    pub orders: MemoryRepository<Order>,
    pub order_line_items: MemoryRepository<OrderLineItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_service(&self) -> MemoryOrderService {
        OrderService::new(
            self.orders.clone(),
            self.order_line_items.clone(),
            self.menus.clone(),
            self.order_tables.clone(),
        )
    }

    pub fn table_service(&self) -> MemoryTableService {
        TableService::new(self.order_tables.clone(), self.orders.clone())
    }

    pub fn table_group_service(&self) -> MemoryTableGroupService {
        TableGroupService::new(
            self.table_groups.clone(),
            self.order_tables.clone(),
            self.orders.clone(),
        )
    }

    pub fn menu_service(&self) -> MemoryMenuService {
        MenuService::new(
            self.menus.clone(),
            self.products.clone(),
            self.menu_groups.clone(),
            self.menu_products.clone(),
        )
    }

    pub fn menu_group_service(&self) -> MenuGroupService<MemoryRepository<MenuGroup>> {
        MenuGroupService::new(self.menu_groups.clone())
    }

    pub fn product_service(&self) -> ProductService<MemoryRepository<Product>> {
        ProductService::new(self.products.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(order_table_id: Id, order_status: OrderStatus) -> Order {
        Order {
            id: None,
            order_table_id,
            order_status,
            ordered_time: Utc::now(),
            order_line_items: vec![],
        }
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = MemoryRepository::<OrderTable>::new();
        let first = repo.save(OrderTable::new(0, true)).await.unwrap();
        let second = repo.save(OrderTable::new(2, false)).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_save_updates_existing() {
        let repo = MemoryRepository::<OrderTable>::new();
        let mut table = repo.save(OrderTable::new(0, true)).await.unwrap();

        table.empty = false;
        table.number_of_guests = 4;
        repo.save(table.clone()).await.unwrap();

        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found, table);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_unknown_id_is_not_found() {
        let repo = MemoryRepository::<OrderTable>::new();
        let mut table = OrderTable::new(0, true);
        table.id = Some(42);

        let err = repo.save(table).await.unwrap_err();
        assert_eq!(err, RepositoryError::not_found("OrderTable", 42));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_find_all_by_id_in_skips_unknown_and_duplicates() {
        let repo = MemoryRepository::<OrderTable>::new();
        repo.save(OrderTable::new(0, true)).await.unwrap();
        repo.save(OrderTable::new(0, true)).await.unwrap();

        let found = repo.find_all_by_id_in(&[2, 1, 2, 99]).await.unwrap();
        let ids: Vec<_> = found.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_order_status_queries() {
        let repo = MemoryRepository::<Order>::new();
        repo.save(order(1, OrderStatus::Meal)).await.unwrap();
        repo.save(order(2, OrderStatus::Completion)).await.unwrap();

        let in_progress = &OrderStatus::IN_PROGRESS;
        assert!(repo
            .exists_by_order_table_id_and_order_status_in(1, in_progress)
            .await
            .unwrap());
        assert!(!repo
            .exists_by_order_table_id_and_order_status_in(2, in_progress)
            .await
            .unwrap());
        assert!(repo
            .exists_by_order_table_id_in_and_order_status_in(&[2, 1], in_progress)
            .await
            .unwrap());
        assert!(!repo
            .exists_by_order_table_id_in_and_order_status_in(&[2, 3], in_progress)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_count_menus_by_id_in() {
        let repo = MemoryRepository::<Menu>::new();
        repo.save(Menu {
            id: None,
            name: "Fried chicken".to_string(),
            price: crate::Money::from_minor(16000),
            menu_group_id: 1,
            menu_products: vec![],
        })
        .await
        .unwrap();

        assert_eq!(repo.count_by_id_in(&[1]).await.unwrap(), 1);
        assert_eq!(repo.count_by_id_in(&[1, 1]).await.unwrap(), 1);
        assert_eq!(repo.count_by_id_in(&[1, 2]).await.unwrap(), 1);
        assert_eq!(repo.count_by_id_in(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stores_are_isolated() {
        let a = MemoryStore::new();
        let b = MemoryStore::new();
        a.order_tables.save(OrderTable::new(0, true)).await.unwrap();

        assert_eq!(a.order_tables.len().await, 1);
        assert!(b.order_tables.is_empty().await);
    }
}
