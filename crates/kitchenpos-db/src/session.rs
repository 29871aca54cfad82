//! # Sessions
//!
//! A [`Session`] hands out repositories and services that all talk to the
//! database through the same [`DbHandle`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.session()              → autocommit, one pooled connection per     │
//! │                              statement (reads, tests)                   │
//! │                                                                         │
//! │  db.transaction(|session| async move { ... })                          │
//! │       │                                                                 │
//! │       ├── BEGIN                                                         │
//! │       ├── session.table_group_service().create(..)                     │
//! │       │     find_all_by_id_in  ┐                                        │
//! │       │     save(group)        ├── same open transaction               │
//! │       │     save(table) × n    ┘                                        │
//! │       └── COMMIT on Ok / ROLLBACK on Err                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kitchenpos_core::{
    MenuGroupService, MenuService, OrderService, ProductService, TableGroupService, TableService,
};

use crate::repository::catalog::{
    SqliteMenuGroupRepository, SqliteMenuProductRepository, SqliteMenuRepository,
    SqliteProductRepository,
};
use crate::repository::order::{SqliteOrderLineItemRepository, SqliteOrderRepository};
use crate::repository::table::{SqliteOrderTableRepository, SqliteTableGroupRepository};
use crate::repository::DbHandle;

/// [`OrderService`] over SQLite repositories.
pub type SqliteOrderService = OrderService<
    SqliteOrderRepository,
    SqliteOrderLineItemRepository,
    SqliteMenuRepository,
    SqliteOrderTableRepository,
>;

/// [`TableService`] over SQLite repositories.
pub type SqliteTableService = TableService<SqliteOrderTableRepository, SqliteOrderRepository>;

/// [`TableGroupService`] over SQLite repositories.
pub type SqliteTableGroupService =
    TableGroupService<SqliteTableGroupRepository, SqliteOrderTableRepository, SqliteOrderRepository>;

/// [`MenuService`] over SQLite repositories.
pub type SqliteMenuService = MenuService<
    SqliteMenuRepository,
    SqliteProductRepository,
    SqliteMenuGroupRepository,
    SqliteMenuProductRepository,
>;

/// [`MenuGroupService`] over SQLite repositories.
pub type SqliteMenuGroupService = MenuGroupService<SqliteMenuGroupRepository>;

/// [`ProductService`] over SQLite repositories.
pub type SqliteProductService = ProductService<SqliteProductRepository>;

/// Repositories and services bound to one connection scope.
///
/// Obtained from [`Database::session`](crate::Database::session) (autocommit)
/// or passed into [`Database::transaction`](crate::Database::transaction).
#[derive(Debug, Clone)]
pub struct Session {
    handle: DbHandle,
}

impl Session {
    pub(crate) fn new(handle: DbHandle) -> Self {
        Session { handle }
    }

    // -------------------------------------------------------------------------
    // Repositories
    // -------------------------------------------------------------------------

    pub fn products(&self) -> SqliteProductRepository {
        SqliteProductRepository::new(self.handle.clone())
    }

    pub fn menu_groups(&self) -> SqliteMenuGroupRepository {
        SqliteMenuGroupRepository::new(self.handle.clone())
    }

    pub fn menus(&self) -> SqliteMenuRepository {
        SqliteMenuRepository::new(self.handle.clone())
    }

    pub fn menu_products(&self) -> SqliteMenuProductRepository {
        SqliteMenuProductRepository::new(self.handle.clone())
    }

    pub fn order_tables(&self) -> SqliteOrderTableRepository {
        SqliteOrderTableRepository::new(self.handle.clone())
    }

    pub fn table_groups(&self) -> SqliteTableGroupRepository {
        SqliteTableGroupRepository::new(self.handle.clone())
    }

    pub fn orders(&self) -> SqliteOrderRepository {
        SqliteOrderRepository::new(self.handle.clone())
    }

    pub fn order_line_items(&self) -> SqliteOrderLineItemRepository {
        SqliteOrderLineItemRepository::new(self.handle.clone())
    }

    // -------------------------------------------------------------------------
    // Services
    // -------------------------------------------------------------------------

    pub fn order_service(&self) -> SqliteOrderService {
        OrderService::new(
            self.orders(),
            self.order_line_items(),
            self.menus(),
            self.order_tables(),
        )
    }

    pub fn table_service(&self) -> SqliteTableService {
        TableService::new(self.order_tables(), self.orders())
    }

    pub fn table_group_service(&self) -> SqliteTableGroupService {
        TableGroupService::new(self.table_groups(), self.order_tables(), self.orders())
    }

    pub fn menu_service(&self) -> SqliteMenuService {
        MenuService::new(
            self.menus(),
            self.products(),
            self.menu_groups(),
            self.menu_products(),
        )
    }

    pub fn menu_group_service(&self) -> SqliteMenuGroupService {
        MenuGroupService::new(self.menu_groups())
    }

    pub fn product_service(&self) -> SqliteProductService {
        ProductService::new(self.products())
    }
}
