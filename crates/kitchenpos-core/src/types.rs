//! # Domain Types
//!
//! Entities managed by KitchenPOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   TableGroup    │   │   OrderTable    │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  table_group_id │◄──│  order_table_id │       │
//! │  │  created_date   │   │  guests, empty  │   │  order_status   │       │
//! │  └─────────────────┘   └─────────────────┘   │  ordered_time   │       │
//! │                                              └────────┬────────┘       │
//! │                                                       │ 1..n           │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │   MenuGroup     │◄──│      Menu       │◄──│  OrderLineItem  │       │
//! │  └─────────────────┘   │  price          │   │  menu_id, qty   │       │
//! │                        └────────┬────────┘   └─────────────────┘       │
//! │                                 │ 1..n                                  │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │   MenuProduct   │──►│    Product      │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Identifiers are assigned by the repository on first save. Until then the
//! `id` (or `seq`) field is `None`.
//!
//! ## Back-References
//! A table points at its group; the group does not own a collection of
//! tables in storage. [`TableGroup::order_tables`] is filled in by the
//! service from a query when a group is returned to a caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

/// Identifier type for every entity.
pub type Id = i64;

// =============================================================================
// Catalog
// =============================================================================

/// Something the kitchen can prepare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Option<Id>,
    pub name: String,
    pub price: Money,
}

/// A section of the menu board ("Two-chicken sets", "Sides", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MenuGroup {
    pub id: Option<Id>,
    pub name: String,
}

/// A product and its quantity within a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MenuProduct {
    pub seq: Option<Id>,
    pub menu_id: Option<Id>,
    pub product_id: Id,
    pub quantity: i64,
}

/// An orderable item.
///
/// Menus are reference data for the order lifecycle: orders validate
/// against them but never change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: Option<Id>,
    pub name: String,
    pub price: Money,
    pub menu_group_id: Id,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub menu_products: Vec<MenuProduct>,
}

// =============================================================================
// Tables
// =============================================================================

/// A physical table tracked for occupancy and guest count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderTable {
    pub id: Option<Id>,
    /// Group this table was merged into, if any.
    pub table_group_id: Option<Id>,
    /// Only meaningful while the table is occupied.
    pub number_of_guests: i32,
    pub empty: bool,
}

impl OrderTable {
    /// Creates an unsaved, ungrouped table.
    pub fn new(number_of_guests: i32, empty: bool) -> Self {
        OrderTable {
            id: None,
            table_group_id: None,
            number_of_guests,
            empty,
        }
    }

    /// Checks if the table belongs to a table group.
    #[inline]
    pub fn is_grouped(&self) -> bool {
        self.table_group_id.is_some()
    }

    /// Checks if the table can join a new table group.
    ///
    /// Only empty tables that are not already grouped qualify.
    #[inline]
    pub fn is_groupable(&self) -> bool {
        self.empty && !self.is_grouped()
    }
}

/// Tables merged to seat one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TableGroup {
    pub id: Option<Id>,
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub order_tables: Vec<OrderTable>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in the kitchen.
///
/// ## Transitions
/// ```text
///   ┌──────────┐        ┌──────────┐
///   │ COOKING  │◄──────►│   MEAL   │
///   └────┬─────┘        └────┬─────┘
///        │                   │
///        └─────────┬─────────┘
///                  ▼
///           ┌────────────┐
///           │ COMPLETION │  terminal
///           └────────────┘
/// ```
/// COOKING and MEAL accept any target, including each other and themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// The kitchen is preparing the order.
    #[default]
    Cooking,
    /// The food has been served.
    Meal,
    /// The order is settled. No further changes.
    Completion,
}

impl OrderStatus {
    /// Statuses that keep a table (or table group) occupied.
    pub const IN_PROGRESS: [OrderStatus; 2] = [OrderStatus::Cooking, OrderStatus::Meal];

    /// Returns true if no further transition is possible.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completion)
    }

    /// Returns the status name as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Cooking => "COOKING",
            OrderStatus::Meal => "MEAL",
            OrderStatus::Completion => "COMPLETION",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// A party's order at one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Option<Id>,
    pub order_table_id: Id,
    pub order_status: OrderStatus,
    pub ordered_time: DateTime<Utc>,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub order_line_items: Vec<OrderLineItem>,
}

/// One menu and quantity within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub seq: Option<Id>,
    pub order_id: Option<Id>,
    pub menu_id: Id,
    /// Not bounded: the rules only require the order to have a line item.
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_default_is_cooking() {
        assert_eq!(OrderStatus::default(), OrderStatus::Cooking);
    }

    #[test]
    fn test_only_completion_is_terminal() {
        assert!(!OrderStatus::Cooking.is_terminal());
        assert!(!OrderStatus::Meal.is_terminal());
        assert!(OrderStatus::Completion.is_terminal());
        assert!(OrderStatus::IN_PROGRESS.iter().all(|s| !s.is_terminal()));
    }

    #[test]
    fn test_order_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::Completion).unwrap();
        assert_eq!(json, "\"COMPLETION\"");

        let parsed: OrderStatus = serde_json::from_str("\"MEAL\"").unwrap();
        assert_eq!(parsed, OrderStatus::Meal);
        assert_eq!(parsed.to_string(), "MEAL");
    }

    #[test]
    fn test_groupable_tables() {
        let mut table = OrderTable::new(0, true);
        assert!(table.is_groupable());

        table.table_group_id = Some(1);
        assert!(table.is_grouped());
        assert!(!table.is_groupable());

        let occupied = OrderTable::new(4, false);
        assert!(!occupied.is_groupable());
    }

    #[test]
    fn test_order_table_json_is_camel_case() {
        let table = OrderTable::new(3, false);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["numberOfGuests"], 3);
        assert_eq!(json["tableGroupId"], serde_json::Value::Null);
    }
}
