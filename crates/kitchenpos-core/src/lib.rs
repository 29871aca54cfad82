//! # kitchenpos-core: Restaurant Rule Engine
//!
//! This crate is the **heart** of KitchenPOS. It owns the entity model and
//! the rules that decide when orders, tables and table groups may change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KitchenPOS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Transport (HTTP / IPC, not here)                │   │
//! │  │    create_order, change_empty, group_tables, ungroup, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ request payloads                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ kitchenpos-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation│  │  service  │  │ repository│  │   │
//! │  │   │   Order   │  │   rules   │  │  Order    │  │  traits   │  │   │
//! │  │   │ OrderTable│  │  checks   │  │  Table    │  │  memory   │  │   │
//! │  │   │ TableGroup│  │           │  │  Group    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO SQL • NO NETWORK • STORAGE ONLY THROUGH TRAITS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                kitchenpos-db (Database Layer)                   │   │
//! │  │         SQLite repositories implementing the traits             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Order, OrderTable, TableGroup, Menu, ...)
//! - [`request`] - Request payloads accepted by the services
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Error types
//! - [`validation`] - Pure business rule checks
//! - [`repository`] - Persistence gateway traits and in-memory storage
//! - [`service`] - Order, table, table group and catalog services
//!
//! ## Example Usage
//!
//! ```rust
//! use kitchenpos_core::validation::validate_number_of_guests;
//!
//! assert!(validate_number_of_guests(0).is_ok());
//! assert!(validate_number_of_guests(-1).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod repository;
pub mod request;
pub mod service;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kitchenpos_core::Order` instead of
// `use kitchenpos_core::types::Order`

pub use error::{CoreError, CoreResult, RepositoryError, RepositoryResult, ValidationError};
pub use money::Money;
pub use request::*;
pub use service::{
    MenuGroupService, MenuService, OrderService, ProductService, TableGroupService, TableService,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum number of tables a table group must contain.
pub const MIN_TABLE_GROUP_SIZE: usize = 2;

/// Maximum length of a product, menu or menu group name.
pub const MAX_NAME_LENGTH: usize = 255;
