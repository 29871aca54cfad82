//! # Repository Module
//!
//! SQLite implementations of the kitchenpos-core repository traits.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  TableGroupService (kitchenpos-core)                                   │
//! │       │                                                                 │
//! │       │  order_tables.find_all_by_id_in(&[1, 2])                       │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  SqliteOrderTableRepository (implements OrderTableRepository)          │
//! │  ├── find_by_id / find_all / save                                      │
//! │  ├── find_all_by_id_in                                                 │
//! │  └── find_all_by_table_group_id                                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The services never see SQL. They only know the traits, so the same    │
//! │  rules run against the in-memory repositories in kitchenpos-core.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog`] - Products, menu groups, menus and menu products
//! - [`order`] - Orders and order line items
//! - [`table`] - Order tables and table groups
//!
//! ## Connections
//! Every repository holds a [`DbHandle`]. Outside a transaction it checks a
//! connection out of the pool per statement; inside
//! [`Database::transaction`](crate::Database::transaction) all repositories of
//! the unit of work share the one open transaction, so their reads and
//! writes commit or roll back together.
//!
//! Queries are built at runtime with `sqlx::query_as` and bind parameters.
//! Entities decode directly through their `FromRow` derives (enabled by
//! kitchenpos-core's `sqlx` feature); child collections are skipped and
//! loaded by the services through their own repositories.

pub mod catalog;
pub mod order;
pub mod table;

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool, Transaction};
use tokio::sync::{Mutex, MutexGuard};

use kitchenpos_core::{Id, OrderStatus};

use crate::error::DbResult;

/// Where a repository sends its statements.
#[derive(Clone)]
pub(crate) enum DbHandle {
    /// Autocommit: one pooled connection per statement.
    Pool(SqlitePool),
    /// The open transaction of a unit of work.
    Transaction(Arc<Mutex<Transaction<'static, Sqlite>>>),
}

impl DbHandle {
    /// Returns a connection for the next statement.
    ///
    /// Inside a transaction this locks it until the returned guard is
    /// dropped, so a repository method must not hold one across a call into
    /// another repository.
    pub(crate) async fn acquire(&self) -> DbResult<DbConn<'_>> {
        match self {
            DbHandle::Pool(pool) => Ok(DbConn::Pooled(pool.acquire().await?)),
            DbHandle::Transaction(tx) => Ok(DbConn::Transaction(tx.lock().await)),
        }
    }
}

impl fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbHandle::Pool(_) => f.write_str("DbHandle::Pool"),
            DbHandle::Transaction(_) => f.write_str("DbHandle::Transaction"),
        }
    }
}

/// A connection checked out through a [`DbHandle`].
pub(crate) enum DbConn<'a> {
    Pooled(PoolConnection<Sqlite>),
    Transaction(MutexGuard<'a, Transaction<'static, Sqlite>>),
}

impl Deref for DbConn<'_> {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        match self {
            DbConn::Pooled(conn) => &**conn,
            DbConn::Transaction(tx) => &***tx,
        }
    }
}

impl DerefMut for DbConn<'_> {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        match self {
            DbConn::Pooled(conn) => &mut **conn,
            DbConn::Transaction(tx) => &mut ***tx,
        }
    }
}

/// Appends `(?, ?, ...)` with one bound id per element.
///
/// Callers must handle an empty slice themselves: `IN ()` is not valid SQL.
pub(crate) fn push_ids(query: &mut QueryBuilder<'_, Sqlite>, ids: &[Id]) {
    query.push("(");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

/// Appends `(?, ?, ...)` with one bound status per element.
pub(crate) fn push_statuses(query: &mut QueryBuilder<'_, Sqlite>, statuses: &[OrderStatus]) {
    query.push("(");
    let mut separated = query.separated(", ");
    for status in statuses {
        separated.push_bind(*status);
    }
    separated.push_unseparated(")");
}
