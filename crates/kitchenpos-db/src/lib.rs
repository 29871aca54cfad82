//! # kitchenpos-db: Database Layer for KitchenPOS
//!
//! SQLite implementations of the repository traits declared in
//! `kitchenpos-core`, plus the [`Database`] handle that wires the core
//! services onto them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KitchenPOS Data Flow                             │
//! │                                                                         │
//! │  Transport (HTTP handler, CLI, seed binary)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kitchenpos-core services (OrderService, TableGroupService, ...)       │
//! │       │  repository traits                                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   kitchenpos-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ catalog.rs     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ order.rs       │    │ 001_initial_ │  │   │
//! │  │   │ Services      │    │ table.rs       │    │   schema.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file ($KITCHENPOS_DATABASE_PATH, default ./kitchenpos.db)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, configuration, transactions
//! - [`session`] - Repositories and core services bound to one connection scope
//! - [`service`] - Services whose writes each run in one transaction
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, order, table)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kitchenpos_core::{OrderTableRequest, TableGroupRequest};
//! use kitchenpos_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()).await?;
//!
//! let tables = db.table_service();
//! let a = tables.create(OrderTableRequest { number_of_guests: 0, empty: true }).await?;
//! let b = tables.create(OrderTableRequest { number_of_guests: 0, empty: true }).await?;
//!
//! let group = db
//!     .table_group_service()
//!     .create(TableGroupRequest::of([a.id.unwrap(), b.id.unwrap()]))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{
    DbMenuGroupService, DbMenuService, DbOrderService, DbProductService, DbTableGroupService,
    DbTableService,
};
pub use session::{
    Session, SqliteMenuGroupService, SqliteMenuService, SqliteOrderService, SqliteProductService,
    SqliteTableGroupService, SqliteTableService,
};

// Repository re-exports for convenience
pub use repository::catalog::{
    SqliteMenuGroupRepository, SqliteMenuProductRepository, SqliteMenuRepository,
    SqliteProductRepository,
};
pub use repository::order::{SqliteOrderLineItemRepository, SqliteOrderRepository};
pub use repository::table::{SqliteOrderTableRepository, SqliteTableGroupRepository};
