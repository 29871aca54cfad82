//! # Error Types
//!
//! Domain-specific error types for kitchenpos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kitchenpos-core errors (this file)                                    │
//! │  ├── ValidationError  - A business rule rejected the request           │
//! │  ├── RepositoryError  - The persistence gateway failed                 │
//! │  └── CoreError        - What every service returns                     │
//! │                                                                         │
//! │  kitchenpos-db errors (separate crate)                                 │
//! │  └── DbError          - sqlx failures, mapped into RepositoryError     │
//! │                                                                         │
//! │  Flow: ValidationError ──┐                                              │
//! │                          ├──► CoreError ──► transport layer (4xx/5xx)  │
//! │        RepositoryError ──┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Client-Facing Kind
//! Every [`ValidationError`] variant is an *invalid argument*: the caller
//! asked for something the rules forbid. A referenced entity that does not
//! exist is also an invalid argument, there is no separate not-found kind.

use thiserror::Error;

use crate::types::{Id, OrderStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the services.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request violates a business rule.
    ///
    /// ## When This Occurs
    /// - Order without line items, unknown menu, empty table
    /// - Status change on a completed order
    /// - Emptying a grouped table or one with an active order
    /// - Grouping fewer than two tables, or tables that are occupied/grouped
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// The persistence gateway failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CoreError {
    /// Returns true if this error was raised by a business rule.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CoreError::InvalidArgument(_))
    }

    /// Returns the rule violation, if this is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CoreError::InvalidArgument(e) => Some(e),
            CoreError::Repository(_) => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Business rule violations.
///
/// Each variant carries the ids or values that broke the rule so the
/// transport layer can build a useful message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// A price was negative.
    #[error("{field} must not be negative (got {value})")]
    NegativePrice { field: String, value: i64 },

    /// An order was submitted without line items.
    #[error("order must contain at least one line item")]
    EmptyOrderLineItems,

    /// Some requested menus do not exist.
    #[error("unknown menu ids: requested {requested} distinct menus, found {found}")]
    UnknownMenus { requested: usize, found: i64 },

    /// The referenced order does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(Id),

    /// Completed orders are terminal.
    #[error("order {order_id} is {status}, its status can no longer change")]
    OrderAlreadyCompleted { order_id: Id, status: OrderStatus },

    /// The referenced table does not exist.
    #[error("order table not found: {0}")]
    OrderTableNotFound(Id),

    /// Orders and guest counts need an occupied table.
    #[error("order table {0} is empty")]
    OrderTableEmpty(Id),

    /// Grouped tables are managed through their group.
    #[error("order table {table_id} belongs to table group {table_group_id}")]
    OrderTableGrouped { table_id: Id, table_group_id: Id },

    /// The table still has an order in COOKING or MEAL.
    #[error("order table {0} has an order in progress")]
    OrderInProgress(Id),

    /// Guest counts cannot be negative.
    #[error("number of guests must not be negative (got {0})")]
    NegativeNumberOfGuests(i32),

    /// A table group needs at least two tables.
    #[error("table group needs at least {min} tables (got {actual})")]
    TooFewTables { min: usize, actual: usize },

    /// Some requested tables do not exist (or were listed twice).
    #[error("unknown order tables: requested {requested}, found {found}")]
    UnknownOrderTables { requested: usize, found: usize },

    /// Only empty, ungrouped tables can be grouped.
    #[error("order table {0} is occupied or already grouped")]
    OrderTableNotGroupable(Id),

    /// A member of the group still has an order in COOKING or MEAL.
    #[error("table group {0} has an order in progress")]
    TableGroupOrderInProgress(Id),

    /// The referenced menu group does not exist.
    #[error("menu group not found: {0}")]
    MenuGroupNotFound(Id),

    /// The referenced product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(Id),

    /// A menu cannot cost more than its products.
    #[error("menu price {price} exceeds the sum of its products ({sum})")]
    MenuPriceExceedsProducts { price: i64, sum: i64 },

    /// `product.price × quantity` summed over the menu products does not fit in `Money`.
    #[error("menu product total overflows at product {product_id} (quantity {quantity})")]
    MenuPriceOverflow { product_id: Id, quantity: i64 },
}

// =============================================================================
// Repository Error
// =============================================================================

/// Persistence gateway failures.
///
/// Raised by repository implementations. Storage backends map their own
/// error types into this one (see `kitchenpos-db`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// `save` was asked to update an entity that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Id },

    /// The storage backend failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        RepositoryError::NotFound { entity, id }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// =============================================================================
// Unit Tests
// =============================================================================
