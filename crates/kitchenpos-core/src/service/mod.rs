//! # Service Module
//!
//! Operations callers invoke on KitchenPOS.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Service Operation                              │
//! │                                                                         │
//! │  1. LOAD      fetch referenced entities through the repositories       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. VALIDATE  run the rules in `validation` against what was loaded    │
//! │       │       ── any failure: warn!, return InvalidArgument,           │
//! │       │          nothing has been written yet                           │
//! │       ▼                                                                 │
//! │  3. WRITE     save the new state, children after their parent          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. RETURN    the saved entity with its children attached              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Services are generic over the repository traits, so the same rules run
//! against [`MemoryRepository`](crate::repository::memory::MemoryRepository)
//! in tests and against SQLite in `kitchenpos-db`.
//!
//! ## Available Services
//!
//! - [`OrderService`] - Order creation and status changes
//! - [`TableService`] - Table occupancy and guest counts
//! - [`TableGroupService`] - Merging and splitting tables
//! - [`ProductService`], [`MenuGroupService`], [`MenuService`] - Catalog

pub mod menu;
pub mod menu_group;
pub mod order;
pub mod product;
pub mod table;
pub mod table_group;

pub use menu::MenuService;
pub use menu_group::MenuGroupService;
pub use order::OrderService;
pub use product::ProductService;
pub use table::TableService;
pub use table_group::TableGroupService;

use tracing::warn;

use crate::error::{CoreError, RepositoryError, ValidationError};
use crate::repository::Entity;
use crate::types::Id;

/// Logs a rule violation and converts it into the error services return.
pub(crate) fn rejected(err: ValidationError) -> CoreError {
    warn!(error = %err, "Request rejected");
    CoreError::InvalidArgument(err)
}

/// Returns the identifier a repository assigned on save.
pub(crate) fn assigned_id<T: Entity>(entity: &T) -> Result<Id, CoreError> {
    entity.id().ok_or_else(|| {
        RepositoryError::Storage(format!("{} was saved without an identifier", T::NAME)).into()
    })
}
