//! # Validation Module
//!
//! Pure business rule checks for KitchenPOS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (not in this workspace)                            │
//! │  └── Deserialization into request payloads                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services                                                     │
//! │  ├── Load referenced entities through the repositories                 │
//! │  └── THIS MODULE: decide whether the change is allowed                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is synchronous and side-effect free: the services
//! gather the facts, these functions judge them. A failed check is always a
//! [`ValidationError`], which the services surface as an invalid argument.
//!
//! ## Usage
//! ```rust
//! use kitchenpos_core::validation::{validate_number_of_guests, validate_table_group_size};
//!
//! validate_number_of_guests(4).unwrap();
//! assert!(validate_table_group_size(1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::request::OrderLineItemRequest;
use crate::types::{Id, Order, OrderTable};
use crate::{MAX_NAME_LENGTH, MIN_TABLE_GROUP_SIZE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product, menu or menu group name.
///
/// ## Rules
/// - Must not be blank
/// - Must be at most `MAX_NAME_LENGTH` (255) characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::NegativePrice {
            field: field.to_string(),
            value: price.minor(),
        });
    }

    Ok(())
}

/// Adds one menu product line (`price × quantity`) to a running total.
///
/// Quantities are caller-supplied and unbounded, so both the product and
/// the running sum are checked for overflow.
pub fn add_menu_product_price(
    sum: Money,
    product_id: Id,
    price: Money,
    quantity: i64,
) -> ValidationResult<Money> {
    price
        .checked_mul(quantity)
        .and_then(|line| sum.checked_add(line))
        .ok_or(ValidationError::MenuPriceOverflow {
            product_id,
            quantity,
        })
}

/// Validates that a menu does not cost more than its products.
///
/// ## Arguments
/// * `price` - Requested menu price
/// * `products_sum` - Sum of `product.price × quantity` over the menu products
pub fn validate_menu_price(price: Money, products_sum: Money) -> ValidationResult<()> {
    if price > products_sum {
        return Err(ValidationError::MenuPriceExceedsProducts {
            price: price.minor(),
            sum: products_sum.minor(),
        });
    }

    Ok(())
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates that an order has at least one line item.
pub fn validate_order_line_items(items: &[OrderLineItemRequest]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::EmptyOrderLineItems);
    }

    Ok(())
}

/// Validates that every requested menu exists.
///
/// ## Arguments
/// * `requested` - Number of *distinct* menu ids in the order
/// * `found` - Number of those ids the menu repository knows
///
/// A mismatch means at least one id is unknown.
pub fn validate_menus_found(requested: usize, found: i64) -> ValidationResult<()> {
    if i64::try_from(requested).ok() != Some(found) {
        return Err(ValidationError::UnknownMenus { requested, found });
    }

    Ok(())
}

/// Validates that an order's status may still change.
///
/// ## Rules
/// - COMPLETION is terminal
/// - COOKING and MEAL accept any new status, including going back to
///   COOKING or skipping MEAL
pub fn validate_order_status_changeable(order_id: Id, order: &Order) -> ValidationResult<()> {
    if order.order_status.is_terminal() {
        return Err(ValidationError::OrderAlreadyCompleted {
            order_id,
            status: order.order_status,
        });
    }

    Ok(())
}

// =============================================================================
// Table Validators
// =============================================================================

/// Validates that a table is occupied.
///
/// ## When This Applies
/// - Placing an order on the table
/// - Changing its guest count
pub fn validate_table_occupied(table_id: Id, table: &OrderTable) -> ValidationResult<()> {
    if table.empty {
        return Err(ValidationError::OrderTableEmpty(table_id));
    }

    Ok(())
}

/// Validates that a table is not part of a table group.
pub fn validate_table_ungrouped(table_id: Id, table: &OrderTable) -> ValidationResult<()> {
    if let Some(table_group_id) = table.table_group_id {
        return Err(ValidationError::OrderTableGrouped {
            table_id,
            table_group_id,
        });
    }

    Ok(())
}

/// Validates a guest count.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed
pub fn validate_number_of_guests(number_of_guests: i32) -> ValidationResult<()> {
    if number_of_guests < 0 {
        return Err(ValidationError::NegativeNumberOfGuests(number_of_guests));
    }

    Ok(())
}

// =============================================================================
// Table Group Validators
// =============================================================================

/// Validates the number of tables requested for a group.
///
/// ## Rules
/// - At least `MIN_TABLE_GROUP_SIZE` (2) tables
pub fn validate_table_group_size(count: usize) -> ValidationResult<()> {
    if count < MIN_TABLE_GROUP_SIZE {
        return Err(ValidationError::TooFewTables {
            min: MIN_TABLE_GROUP_SIZE,
            actual: count,
        });
    }

    Ok(())
}

/// Validates that every requested table was found.
///
/// Unknown ids and ids listed twice both show up as a count mismatch.
pub fn validate_tables_found(requested: usize, found: usize) -> ValidationResult<()> {
    if requested != found {
        return Err(ValidationError::UnknownOrderTables { requested, found });
    }

    Ok(())
}

/// Validates that every table can join a new group.
///
/// ## Rules
/// - Table must be empty
/// - Table must not already belong to a group
///
/// Reports the first offending table.
pub fn validate_tables_groupable(tables: &[OrderTable]) -> ValidationResult<()> {
    match tables.iter().find(|table| !table.is_groupable()) {
        Some(table) => Err(ValidationError::OrderTableNotGroupable(
            table.id.unwrap_or_default(),
        )),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
