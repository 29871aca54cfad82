//! # Catalog Repositories
//!
//! Products, menu groups, menus and menu products.
//!
//! Menus are reference data for the order lifecycle: orders only count
//! them (`count_by_id_in`) and never write to them.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

use kitchenpos_core::repository::{
    MenuGroupRepository, MenuProductRepository, MenuRepository, ProductRepository, Repository,
};
use kitchenpos_core::{Id, Menu, MenuGroup, MenuProduct, Product, RepositoryResult};

use super::{push_ids, DbHandle};
use crate::error::{DbError, DbResult};

// =============================================================================
// Product
// =============================================================================

/// Repository for the `product` table.
#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    db: DbHandle,
}

impl SqliteProductRepository {
    pub(crate) fn new(db: DbHandle) -> Self {
        SqliteProductRepository { db }
    }

    async fn insert(&self, mut product: Product) -> DbResult<Product> {
        let mut conn = self.db.acquire().await?;
        let id = sqlx::query("INSERT INTO product (name, price) VALUES (?1, ?2)")
            .bind(&product.name)
            .bind(product.price)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();

        debug!(product_id = id, "Product inserted");
        product.id = Some(id);
        Ok(product)
    }

    async fn update(&self, id: Id, product: Product) -> DbResult<Product> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query("UPDATE product SET name = ?1, price = ?2 WHERE id = ?3")
            .bind(&product.name)
            .bind(product.price)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(product)
    }
}

#[async_trait]
impl Repository<Product> for SqliteProductRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Product>> {
        let mut conn = self.db.acquire().await?;
        let product =
            sqlx::query_as::<_, Product>("SELECT id, name, price FROM product WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(product)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        let mut conn = self.db.acquire().await?;
        let products =
            sqlx::query_as::<_, Product>("SELECT id, name, price FROM product ORDER BY id")
                .fetch_all(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(products)
    }

    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        let saved = match product.id {
            Some(id) => self.update(id, product).await?,
            None => self.insert(product).await?,
        };
        Ok(saved)
    }
}

impl ProductRepository for SqliteProductRepository {}

// =============================================================================
// Menu Group
// =============================================================================

/// Repository for the `menu_group` table.
#[derive(Debug, Clone)]
pub struct SqliteMenuGroupRepository {
    db: DbHandle,
}

impl SqliteMenuGroupRepository {
    pub(crate) fn new(db: DbHandle) -> Self {
        SqliteMenuGroupRepository { db }
    }

    async fn insert(&self, mut group: MenuGroup) -> DbResult<MenuGroup> {
        let mut conn = self.db.acquire().await?;
        let id = sqlx::query("INSERT INTO menu_group (name) VALUES (?1)")
            .bind(&group.name)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();

        debug!(menu_group_id = id, "Menu group inserted");
        group.id = Some(id);
        Ok(group)
    }

    async fn update(&self, id: Id, group: MenuGroup) -> DbResult<MenuGroup> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query("UPDATE menu_group SET name = ?1 WHERE id = ?2")
            .bind(&group.name)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuGroup", id));
        }
        Ok(group)
    }
}

#[async_trait]
impl Repository<MenuGroup> for SqliteMenuGroupRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<MenuGroup>> {
        let mut conn = self.db.acquire().await?;
        let group =
            sqlx::query_as::<_, MenuGroup>("SELECT id, name FROM menu_group WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(group)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<MenuGroup>> {
        let mut conn = self.db.acquire().await?;
        let groups =
            sqlx::query_as::<_, MenuGroup>("SELECT id, name FROM menu_group ORDER BY id")
                .fetch_all(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(groups)
    }

    async fn save(&self, group: MenuGroup) -> RepositoryResult<MenuGroup> {
        let saved = match group.id {
            Some(id) => self.update(id, group).await?,
            None => self.insert(group).await?,
        };
        Ok(saved)
    }
}

#[async_trait]
impl MenuGroupRepository for SqliteMenuGroupRepository {
    async fn exists_by_id(&self, id: Id) -> RepositoryResult<bool> {
        let mut conn = self.db.acquire().await?;
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM menu_group WHERE id = ?1)")
                .bind(id)
                .fetch_one(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(exists)
    }
}

// =============================================================================
// Menu
// =============================================================================

/// Repository for the `menu` table.
#[derive(Debug, Clone)]
pub struct SqliteMenuRepository {
    db: DbHandle,
}

impl SqliteMenuRepository {
    pub(crate) fn new(db: DbHandle) -> Self {
        SqliteMenuRepository { db }
    }

    async fn insert(&self, mut menu: Menu) -> DbResult<Menu> {
        let mut conn = self.db.acquire().await?;
        let id = sqlx::query("INSERT INTO menu (name, price, menu_group_id) VALUES (?1, ?2, ?3)")
            .bind(&menu.name)
            .bind(menu.price)
            .bind(menu.menu_group_id)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();

        debug!(menu_id = id, "Menu inserted");
        menu.id = Some(id);
        Ok(menu)
    }

    async fn update(&self, id: Id, menu: Menu) -> DbResult<Menu> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query(
            "UPDATE menu SET name = ?1, price = ?2, menu_group_id = ?3 WHERE id = ?4",
        )
        .bind(&menu.name)
        .bind(menu.price)
        .bind(menu.menu_group_id)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu", id));
        }
        Ok(menu)
    }
}

#[async_trait]
impl Repository<Menu> for SqliteMenuRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Menu>> {
        let mut conn = self.db.acquire().await?;
        let menu = sqlx::query_as::<_, Menu>(
            "SELECT id, name, price, menu_group_id FROM menu WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::from)?;
        Ok(menu)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Menu>> {
        let mut conn = self.db.acquire().await?;
        let menus = sqlx::query_as::<_, Menu>(
            "SELECT id, name, price, menu_group_id FROM menu ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(DbError::from)?;
        Ok(menus)
    }

    async fn save(&self, menu: Menu) -> RepositoryResult<Menu> {
        let saved = match menu.id {
            Some(id) => self.update(id, menu).await?,
            None => self.insert(menu).await?,
        };
        Ok(saved)
    }
}

#[async_trait]
impl MenuRepository for SqliteMenuRepository {
    async fn count_by_id_in(&self, ids: &[Id]) -> RepositoryResult<i64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.db.acquire().await?;

        // `IN` matches each row once, so duplicated ids are counted once
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM menu WHERE id IN ");
        push_ids(&mut query, ids);

        let count: i64 = query
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await
            .map_err(DbError::from)?;

        debug!(requested = ids.len(), found = count, "Counted menus");
        Ok(count)
    }
}

// =============================================================================
// Menu Product
// =============================================================================

/// Repository for the `menu_product` table.
#[derive(Debug, Clone)]
pub struct SqliteMenuProductRepository {
    db: DbHandle,
}

impl SqliteMenuProductRepository {
    pub(crate) fn new(db: DbHandle) -> Self {
        SqliteMenuProductRepository { db }
    }

    async fn insert(&self, mut menu_product: MenuProduct) -> DbResult<MenuProduct> {
        let mut conn = self.db.acquire().await?;
        let seq = sqlx::query(
            "INSERT INTO menu_product (menu_id, product_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(menu_product.menu_id)
        .bind(menu_product.product_id)
        .bind(menu_product.quantity)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        menu_product.seq = Some(seq);
        Ok(menu_product)
    }

    async fn update(&self, seq: Id, menu_product: MenuProduct) -> DbResult<MenuProduct> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query(
            "UPDATE menu_product SET menu_id = ?1, product_id = ?2, quantity = ?3 WHERE seq = ?4",
        )
        .bind(menu_product.menu_id)
        .bind(menu_product.product_id)
        .bind(menu_product.quantity)
        .bind(seq)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuProduct", seq));
        }
        Ok(menu_product)
    }
}

const MENU_PRODUCT_COLUMNS: &str = "SELECT seq, menu_id, product_id, quantity FROM menu_product";

#[async_trait]
impl Repository<MenuProduct> for SqliteMenuProductRepository {
    async fn find_by_id(&self, seq: Id) -> RepositoryResult<Option<MenuProduct>> {
        let mut conn = self.db.acquire().await?;
        let menu_product =
            sqlx::query_as::<_, MenuProduct>(&format!("{MENU_PRODUCT_COLUMNS} WHERE seq = ?1"))
                .bind(seq)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(menu_product)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<MenuProduct>> {
        let mut conn = self.db.acquire().await?;
        let menu_products =
            sqlx::query_as::<_, MenuProduct>(&format!("{MENU_PRODUCT_COLUMNS} ORDER BY seq"))
                .fetch_all(&mut *conn)
                .await
                .map_err(DbError::from)?;
        Ok(menu_products)
    }

    async fn save(&self, menu_product: MenuProduct) -> RepositoryResult<MenuProduct> {
        let saved = match menu_product.seq {
            Some(seq) => self.update(seq, menu_product).await?,
            None => self.insert(menu_product).await?,
        };
        Ok(saved)
    }
}

#[async_trait]
impl MenuProductRepository for SqliteMenuProductRepository {
    async fn find_all_by_menu_id(&self, menu_id: Id) -> RepositoryResult<Vec<MenuProduct>> {
        let mut conn = self.db.acquire().await?;
        let menu_products = sqlx::query_as::<_, MenuProduct>(&format!(
            "{MENU_PRODUCT_COLUMNS} WHERE menu_id = ?1 ORDER BY seq"
        ))
        .bind(menu_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(DbError::from)?;
        Ok(menu_products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
