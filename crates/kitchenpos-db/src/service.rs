//! # Transactional Services
//!
//! The services callers get from [`Database`]. Each call that writes runs
//! the matching `kitchenpos-core` service inside [`Database::transaction`],
//! so its validation reads and its writes form one unit: concurrent callers
//! are serialized and a failed call leaves nothing behind. Listing reads
//! through an autocommit [`Session`](crate::Session).

use kitchenpos_core::{
    CoreResult, Id, Menu, MenuGroup, MenuGroupRequest, MenuRequest, NumberOfGuestsRequest, Order,
    OrderRequest, OrderStatusRequest, OrderTable, OrderTableRequest, Product, ProductRequest,
    TableEmptyRequest, TableGroup, TableGroupRequest,
};

use crate::pool::Database;

// =============================================================================
// Orders and Tables
// =============================================================================

#[derive(Debug, Clone)]
pub struct DbOrderService {
    db: Database,
}

impl DbOrderService {
    pub(crate) fn new(db: Database) -> Self {
        DbOrderService { db }
    }

    pub async fn create(&self, request: OrderRequest) -> CoreResult<Order> {
        self.db
            .transaction(|session| async move { session.order_service().create(request).await })
            .await
    }

    pub async fn change_order_status(
        &self,
        order_id: Id,
        request: OrderStatusRequest,
    ) -> CoreResult<Order> {
        self.db
            .transaction(|session| async move {
                session
                    .order_service()
                    .change_order_status(order_id, request)
                    .await
            })
            .await
    }

    pub async fn list(&self) -> CoreResult<Vec<Order>> {
        self.db.session().order_service().list().await
    }
}

#[derive(Debug, Clone)]
pub struct DbTableService {
    db: Database,
}

impl DbTableService {
    pub(crate) fn new(db: Database) -> Self {
        DbTableService { db }
    }

    pub async fn create(&self, request: OrderTableRequest) -> CoreResult<OrderTable> {
        self.db
            .transaction(|session| async move { session.table_service().create(request).await })
            .await
    }

    pub async fn list(&self) -> CoreResult<Vec<OrderTable>> {
        self.db.session().table_service().list().await
    }

    pub async fn change_empty(
        &self,
        table_id: Id,
        request: TableEmptyRequest,
    ) -> CoreResult<OrderTable> {
        self.db
            .transaction(|session| async move {
                session.table_service().change_empty(table_id, request).await
            })
            .await
    }

    pub async fn change_number_of_guests(
        &self,
        table_id: Id,
        request: NumberOfGuestsRequest,
    ) -> CoreResult<OrderTable> {
        self.db
            .transaction(|session| async move {
                session
                    .table_service()
                    .change_number_of_guests(table_id, request)
                    .await
            })
            .await
    }
}

#[derive(Debug, Clone)]
pub struct DbTableGroupService {
    db: Database,
}

impl DbTableGroupService {
    pub(crate) fn new(db: Database) -> Self {
        DbTableGroupService { db }
    }

    pub async fn create(&self, request: TableGroupRequest) -> CoreResult<TableGroup> {
        self.db
            .transaction(|session| async move {
                session.table_group_service().create(request).await
            })
            .await
    }

    pub async fn ungroup(&self, table_group_id: Id) -> CoreResult<()> {
        self.db
            .transaction(|session| async move {
                session.table_group_service().ungroup(table_group_id).await
            })
            .await
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone)]
pub struct DbMenuService {
    db: Database,
}

impl DbMenuService {
    pub(crate) fn new(db: Database) -> Self {
        DbMenuService { db }
    }

    pub async fn create(&self, request: MenuRequest) -> CoreResult<Menu> {
        self.db
            .transaction(|session| async move { session.menu_service().create(request).await })
            .await
    }

    pub async fn list(&self) -> CoreResult<Vec<Menu>> {
        self.db.session().menu_service().list().await
    }
}

#[derive(Debug, Clone)]
pub struct DbMenuGroupService {
    db: Database,
}

impl DbMenuGroupService {
    pub(crate) fn new(db: Database) -> Self {
        DbMenuGroupService { db }
    }

    pub async fn create(&self, request: MenuGroupRequest) -> CoreResult<MenuGroup> {
        self.db
            .transaction(|session| async move {
                session.menu_group_service().create(request).await
            })
            .await
    }

    pub async fn list(&self) -> CoreResult<Vec<MenuGroup>> {
        self.db.session().menu_group_service().list().await
    }
}

#[derive(Debug, Clone)]
pub struct DbProductService {
    db: Database,
}

impl DbProductService {
    pub(crate) fn new(db: Database) -> Self {
        DbProductService { db }
    }

    pub async fn create(&self, request: ProductRequest) -> CoreResult<Product> {
        self.db
            .transaction(|session| async move { session.product_service().create(request).await })
            .await
    }

    pub async fn list(&self) -> CoreResult<Vec<Product>> {
        self.db.session().product_service().list().await
    }
}
