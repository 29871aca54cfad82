//! # Request Payloads
//!
//! What callers send to the services. Request types only carry the fields a
//! caller is allowed to choose: identifiers, statuses and timestamps are
//! assigned by the services and the repositories.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Id, OrderStatus};

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuGroupRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuProductRequest {
    pub product_id: Id,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRequest {
    pub name: String,
    pub price: Money,
    pub menu_group_id: Id,
    #[serde(default)]
    pub menu_products: Vec<MenuProductRequest>,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItemRequest {
    pub menu_id: Id,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_table_id: Id,
    #[serde(default)]
    pub order_line_items: Vec<OrderLineItemRequest>,
}

impl OrderRequest {
    /// Distinct menu ids referenced by the line items, in first-seen order.
    pub fn distinct_menu_ids(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = Vec::with_capacity(self.order_line_items.len());
        for item in &self.order_line_items {
            if !ids.contains(&item.menu_id) {
                ids.push(item.menu_id);
            }
        }
        ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusRequest {
    pub order_status: OrderStatus,
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTableRequest {
    pub number_of_guests: i32,
    pub empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEmptyRequest {
    pub empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberOfGuestsRequest {
    pub number_of_guests: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTableIdRequest {
    pub id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableGroupRequest {
    #[serde(default)]
    pub order_tables: Vec<OrderTableIdRequest>,
}

impl TableGroupRequest {
    /// Builds a request from plain table ids.
    pub fn of(ids: impl IntoIterator<Item = Id>) -> Self {
        TableGroupRequest {
            order_tables: ids.into_iter().map(|id| OrderTableIdRequest { id }).collect(),
        }
    }

    /// Requested table ids, in request order.
    pub fn table_ids(&self) -> Vec<Id> {
        self.order_tables.iter().map(|t| t.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_menu_ids_keeps_first_seen_order() {
        let request = OrderRequest {
            order_table_id: 1,
            order_line_items: vec![
                OrderLineItemRequest { menu_id: 3, quantity: 1 },
                OrderLineItemRequest { menu_id: 1, quantity: 2 },
                OrderLineItemRequest { menu_id: 3, quantity: 5 },
            ],
        };
        assert_eq!(request.distinct_menu_ids(), vec![3, 1]);
    }

    #[test]
    fn test_table_group_request_json() {
        let request: TableGroupRequest =
            serde_json::from_str(r#"{"orderTables":[{"id":1},{"id":2}]}"#).unwrap();
        assert_eq!(request.table_ids(), vec![1, 2]);
        assert_eq!(request, TableGroupRequest::of([1, 2]));
    }

    #[test]
    fn test_order_request_without_line_items_deserializes_empty() {
        let request: OrderRequest = serde_json::from_str(r#"{"orderTableId":4}"#).unwrap();
        assert!(request.order_line_items.is_empty());
    }
}
