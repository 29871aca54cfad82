//! # Order Service
//!
//! Order creation and the order status lifecycle.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Lifecycle                                  │
//! │                                                                         │
//! │  create(request)                                                       │
//! │  ├── at least one line item                                            │
//! │  ├── every distinct menu id exists                                     │
//! │  ├── the table exists and is occupied                                  │
//! │  └── save order (COOKING, now), then its line items                    │
//! │                                                                         │
//! │  change_order_status(id, status)                                       │
//! │  ├── order exists                                                      │
//! │  ├── order is not COMPLETION                                           │
//! │  └── overwrite status (any target)                                     │
//! │                                                                         │
//! │  An order in COOKING or MEAL keeps its table from being emptied and    │
//! │  its table group from being ungrouped.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};

use super::{assigned_id, rejected};
use crate::error::{CoreResult, ValidationError};
use crate::repository::{
    MenuRepository, OrderLineItemRepository, OrderRepository, OrderTableRepository,
};
use crate::request::{OrderRequest, OrderStatusRequest};
use crate::types::{Id, Order, OrderLineItem, OrderStatus};
use crate::validation::{
    validate_menus_found, validate_order_line_items, validate_order_status_changeable,
    validate_table_occupied,
};

/// Creates orders and moves them through their statuses.
#[derive(Debug, Clone)]
pub struct OrderService<O, L, M, T> {
    orders: O,
    order_line_items: L,
    menus: M,
    order_tables: T,
}

impl<O, L, M, T> OrderService<O, L, M, T>
where
    O: OrderRepository,
    L: OrderLineItemRepository,
    M: MenuRepository,
    T: OrderTableRepository,
{
    pub fn new(orders: O, order_line_items: L, menus: M, order_tables: T) -> Self {
        OrderService {
            orders,
            order_line_items,
            menus,
            order_tables,
        }
    }

    /// Places a new order on an occupied table.
    ///
    /// ## Returns
    /// The saved order in COOKING, with its saved line items.
    pub async fn create(&self, request: OrderRequest) -> CoreResult<Order> {
        debug!(
            order_table_id = request.order_table_id,
            line_items = request.order_line_items.len(),
            "Creating order"
        );

        validate_order_line_items(&request.order_line_items).map_err(rejected)?;

        let menu_ids = request.distinct_menu_ids();
        let found = self.menus.count_by_id_in(&menu_ids).await?;
        validate_menus_found(menu_ids.len(), found).map_err(rejected)?;

        let table = self
            .order_tables
            .find_by_id(request.order_table_id)
            .await?
            .ok_or(ValidationError::OrderTableNotFound(request.order_table_id))
            .map_err(rejected)?;
        validate_table_occupied(request.order_table_id, &table).map_err(rejected)?;

        let mut order = self
            .orders
            .save(Order {
                id: None,
                order_table_id: request.order_table_id,
                order_status: OrderStatus::Cooking,
                ordered_time: Utc::now(),
                order_line_items: Vec::new(),
            })
            .await?;
        let order_id = assigned_id(&order)?;

        let mut saved_items = Vec::with_capacity(request.order_line_items.len());
        for item in request.order_line_items {
            let saved = self
                .order_line_items
                .save(OrderLineItem {
                    seq: None,
                    order_id: Some(order_id),
                    menu_id: item.menu_id,
                    quantity: item.quantity,
                })
                .await?;
            saved_items.push(saved);
        }
        order.order_line_items = saved_items;

        info!(
            order_id,
            order_table_id = order.order_table_id,
            line_items = order.order_line_items.len(),
            "Order created"
        );
        Ok(order)
    }

    /// Overwrites the status of an order that is not yet completed.
    ///
    /// Any target is accepted while the order is COOKING or MEAL,
    /// including going back to COOKING and skipping MEAL.
    pub async fn change_order_status(
        &self,
        order_id: Id,
        request: OrderStatusRequest,
    ) -> CoreResult<Order> {
        debug!(order_id, status = %request.order_status, "Changing order status");

        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(ValidationError::OrderNotFound(order_id))
            .map_err(rejected)?;
        validate_order_status_changeable(order_id, &order).map_err(rejected)?;

        let previous = order.order_status;
        order.order_status = request.order_status;
        let mut order = self.orders.save(order).await?;
        order.order_line_items = self.order_line_items.find_all_by_order_id(order_id).await?;

        info!(order_id, from = %previous, to = %order.order_status, "Order status changed");
        Ok(order)
    }

    /// Lists every order with its line items.
    pub async fn list(&self) -> CoreResult<Vec<Order>> {
        let mut orders = self.orders.find_all().await?;
        for order in &mut orders {
            let order_id = assigned_id(order)?;
            order.order_line_items = self.order_line_items.find_all_by_order_id(order_id).await?;
        }

        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::repository::memory::MemoryStore;
    use crate::repository::Repository;
    use crate::request::{OrderLineItemRequest, OrderRequest, OrderStatusRequest};
    use crate::types::{Id, Menu, OrderStatus, OrderTable};

    async fn menu(store: &MemoryStore, name: &str) -> Id {
        let menu = store
            .menus
            .save(Menu {
                id: None,
                name: name.to_string(),
                price: Money::from_minor(16000),
                menu_group_id: 1,
                menu_products: vec![],
            })
            .await
            .unwrap();
        menu.id.unwrap()
    }

    async fn table(store: &MemoryStore, empty: bool) -> Id {
        let guests = if empty { 0 } else { 4 };
        let table = store
            .order_tables
            .save(OrderTable::new(guests, empty))
            .await
            .unwrap();
        table.id.unwrap()
    }

    fn request(order_table_id: Id, menu_ids: &[Id]) -> OrderRequest {
        OrderRequest {
            order_table_id,
            order_line_items: menu_ids
                .iter()
                .map(|&menu_id| OrderLineItemRequest {
                    menu_id,
                    quantity: 1,
                })
                .collect(),
        }
    }

    fn status(order_status: OrderStatus) -> OrderStatusRequest {
        OrderStatusRequest { order_status }
    }

    #[tokio::test]
    async fn test_create_order() {
        let store = MemoryStore::new();
        let menu_id = menu(&store, "Fried chicken").await;
        let table_id = table(&store, false).await;

        let order = store
            .order_service()
            .create(request(table_id, &[menu_id]))
            .await
            .unwrap();

        assert!(order.id.is_some());
        assert_eq!(order.order_status, OrderStatus::Cooking);
        assert_eq!(order.order_table_id, table_id);
        assert_eq!(order.order_line_items.len(), 1);
        assert_eq!(order.order_line_items[0].order_id, order.id);
        assert!(order.order_line_items[0].seq.is_some());
    }

    #[tokio::test]
    async fn test_create_order_with_repeated_menu() {
        let store = MemoryStore::new();
        let menu_id = menu(&store, "Fried chicken").await;
        let table_id = table(&store, false).await;

        let order = store
            .order_service()
            .create(request(table_id, &[menu_id, menu_id]))
            .await
            .unwrap();

        assert_eq!(order.order_line_items.len(), 2);
    }

    #[tokio::test]
    async fn test_create_order_without_line_items_fails() {
        let store = MemoryStore::new();
        let table_id = table(&store, false).await;

        let err = store
            .order_service()
            .create(request(table_id, &[]))
            .await
            .unwrap_err();

        assert_eq!(err.validation(), Some(&ValidationError::EmptyOrderLineItems));
        assert!(store.orders.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_order_with_unknown_menu_fails() {
        let store = MemoryStore::new();
        let menu_id = menu(&store, "Fried chicken").await;
        let table_id = table(&store, false).await;

        let err = store
            .order_service()
            .create(request(table_id, &[menu_id, 999]))
            .await
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(store.orders.is_empty().await);
        assert!(store.order_line_items.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_order_on_unknown_table_fails() {
        let store = MemoryStore::new();
        let menu_id = menu(&store, "Fried chicken").await;

        let err = store
            .order_service()
            .create(request(42, &[menu_id]))
            .await
            .unwrap_err();

        assert_eq!(err.validation(), Some(&ValidationError::OrderTableNotFound(42)));
    }

    #[tokio::test]
    async fn test_create_order_on_empty_table_fails() {
        let store = MemoryStore::new();
        let menu_id = menu(&store, "Fried chicken").await;
        let table_id = table(&store, true).await;

        let err = store
            .order_service()
            .create(request(table_id, &[menu_id]))
            .await
            .unwrap_err();

        assert_eq!(
            err.validation(),
            Some(&ValidationError::OrderTableEmpty(table_id))
        );
        assert!(store.orders.is_empty().await);
    }

    #[tokio::test]
    async fn test_change_order_status_is_permissive_until_completion() {
        let store = MemoryStore::new();
        let menu_id = menu(&store, "Fried chicken").await;
        let table_id = table(&store, false).await;
        let service = store.order_service();
        let order = service.create(request(table_id, &[menu_id])).await.unwrap();
        let order_id = order.id.unwrap();

        let order = service
            .change_order_status(order_id, status(OrderStatus::Meal))
            .await
            .unwrap();
        assert_eq!(order.order_status, OrderStatus::Meal);
        assert_eq!(order.order_line_items.len(), 1);

        let order = service
            .change_order_status(order_id, status(OrderStatus::Cooking))
            .await
            .unwrap();
        assert_eq!(order.order_status, OrderStatus::Cooking);

        let order = service
            .change_order_status(order_id, status(OrderStatus::Completion))
            .await
            .unwrap();
        assert_eq!(order.order_status, OrderStatus::Completion);

        let err = service
            .change_order_status(order_id, status(OrderStatus::Meal))
            .await
            .unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::OrderAlreadyCompleted { .. })
        ));

        let stored = store.orders.find_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(stored.order_status, OrderStatus::Completion);
    }

    #[tokio::test]
    async fn test_change_status_of_unknown_order_fails() {
        let store = MemoryStore::new();

        let err = store
            .order_service()
            .change_order_status(7, status(OrderStatus::Meal))
            .await
            .unwrap_err();

        assert_eq!(err.validation(), Some(&ValidationError::OrderNotFound(7)));
    }

    #[tokio::test]
    async fn test_list_orders_with_line_items() {
        let store = MemoryStore::new();
        let fried = menu(&store, "Fried chicken").await;
        let seasoned = menu(&store, "Seasoned chicken").await;
        let table_id = table(&store, false).await;
        let service = store.order_service();
        service.create(request(table_id, &[fried])).await.unwrap();
        service
            .create(request(table_id, &[fried, seasoned]))
            .await
            .unwrap();

        let orders = service.list().await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_line_items.len(), 1);
        assert_eq!(orders[1].order_line_items.len(), 2);
    }
}
