//! # Repository Module
//!
//! Persistence gateway traits for KitchenPOS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service (OrderService, TableService, ...)                             │
//! │       │                                                                 │
//! │       │  order_tables.find_all_by_id_in(&[1, 2])                       │
//! │       ▼                                                                 │
//! │  Repository<T>                 uniform contract for every entity       │
//! │  ├── find_by_id(id)                                                    │
//! │  ├── find_all()                                                        │
//! │  └── save(entity)              insert when id is None, else update     │
//! │       +                                                                 │
//! │  Per-entity extension traits   the queries the rules need              │
//! │       │                                                                 │
//! │       ├──────────────────────┬──────────────────────┐                  │
//! │       ▼                      ▼                      ▼                  │
//! │  memory::MemoryRepository  kitchenpos-db (SQLite)  your own backend    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - `save` assigns an identifier on first save and returns the stored
//!   entity. Saving an entity whose id is unknown fails with
//!   [`RepositoryError::NotFound`](crate::RepositoryError::NotFound).
//! - Child collections (`Order::order_line_items`, `Menu::menu_products`,
//!   `TableGroup::order_tables`) are not persisted through the parent. They
//!   have their own repositories; services attach them on the way out.

pub mod memory;

use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::types::{
    Id, Menu, MenuGroup, MenuProduct, Order, OrderLineItem, OrderStatus, OrderTable, Product,
    TableGroup,
};

// =============================================================================
// Entity
// =============================================================================

/// An entity with a repository-assigned identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in not-found errors and logs.
    const NAME: &'static str;

    fn id(&self) -> Option<Id>;

    fn set_id(&mut self, id: Id);
}

macro_rules! entity {
    ($ty:ty, $name:literal, $field:ident) => {
        impl Entity for $ty {
            const NAME: &'static str = $name;

            fn id(&self) -> Option<Id> {
                self.$field
            }

            fn set_id(&mut self, id: Id) {
                self.$field = Some(id);
            }
        }
    };
}

entity!(Product, "Product", id);
entity!(MenuGroup, "MenuGroup", id);
entity!(Menu, "Menu", id);
entity!(MenuProduct, "MenuProduct", seq);
entity!(OrderTable, "OrderTable", id);
entity!(TableGroup, "TableGroup", id);
entity!(Order, "Order", id);
entity!(OrderLineItem, "OrderLineItem", seq);

// =============================================================================
// Uniform Contract
// =============================================================================

/// Lookup and save operations shared by every entity.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Returns the entity with the given id, if it exists.
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>>;

    /// Returns every entity, ordered by id.
    async fn find_all(&self) -> RepositoryResult<Vec<T>>;

    /// Inserts (id is `None`) or updates (id is `Some`) the entity.
    async fn save(&self, entity: T) -> RepositoryResult<T>;
}

// =============================================================================
// Catalog Repositories
// =============================================================================

pub trait ProductRepository: Repository<Product> {}

#[async_trait]
pub trait MenuGroupRepository: Repository<MenuGroup> {
    async fn exists_by_id(&self, id: Id) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait MenuRepository: Repository<Menu> {
    /// Counts how many of the given ids belong to a persisted menu.
    ///
    /// Callers pass distinct ids; a duplicated id is counted once.
    async fn count_by_id_in(&self, ids: &[Id]) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait MenuProductRepository: Repository<MenuProduct> {
    async fn find_all_by_menu_id(&self, menu_id: Id) -> RepositoryResult<Vec<MenuProduct>>;
}

// =============================================================================
// Order Repositories
// =============================================================================

#[async_trait]
pub trait OrderRepository: Repository<Order> {
    /// True if the table has an order in one of `statuses`.
    async fn exists_by_order_table_id_and_order_status_in(
        &self,
        order_table_id: Id,
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool>;

    /// True if any of the tables has an order in one of `statuses`.
    async fn exists_by_order_table_id_in_and_order_status_in(
        &self,
        order_table_ids: &[Id],
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait OrderLineItemRepository: Repository<OrderLineItem> {
    async fn find_all_by_order_id(&self, order_id: Id) -> RepositoryResult<Vec<OrderLineItem>>;
}

// =============================================================================
// Table Repositories
// =============================================================================

#[async_trait]
pub trait OrderTableRepository: Repository<OrderTable> {
    /// Returns the persisted tables among `ids`, ordered by id.
    ///
    /// Unknown ids are skipped and a duplicated id yields one table, so the
    /// result can be shorter than `ids`.
    async fn find_all_by_id_in(&self, ids: &[Id]) -> RepositoryResult<Vec<OrderTable>>;

    async fn find_all_by_table_group_id(
        &self,
        table_group_id: Id,
    ) -> RepositoryResult<Vec<OrderTable>>;
}

pub trait TableGroupRepository: Repository<TableGroup> {}
