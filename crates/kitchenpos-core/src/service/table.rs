//! # Table Service
//!
//! Table registration, occupancy and guest counts.
//!
//! A table that belongs to a table group is managed through its group: its
//! empty flag cannot be changed directly until the group is ungrouped.

use tracing::{debug, info};

use super::rejected;
use crate::error::{CoreResult, ValidationError};
use crate::repository::{OrderRepository, OrderTableRepository};
use crate::request::{NumberOfGuestsRequest, OrderTableRequest, TableEmptyRequest};
use crate::types::{Id, OrderStatus, OrderTable};
use crate::validation::{
    validate_number_of_guests, validate_table_occupied, validate_table_ungrouped,
};

/// Seats guests at tables and clears them.
#[derive(Debug, Clone)]
pub struct TableService<T, O> {
    order_tables: T,
    orders: O,
}

impl<T, O> TableService<T, O>
where
    T: OrderTableRepository,
    O: OrderRepository,
{
    pub fn new(order_tables: T, orders: O) -> Self {
        TableService {
            order_tables,
            orders,
        }
    }

    /// Registers a new, ungrouped table.
    pub async fn create(&self, request: OrderTableRequest) -> CoreResult<OrderTable> {
        let table = self
            .order_tables
            .save(OrderTable::new(request.number_of_guests, request.empty))
            .await?;

        info!(
            table_id = ?table.id,
            number_of_guests = table.number_of_guests,
            empty = table.empty,
            "Order table created"
        );
        Ok(table)
    }

    pub async fn list(&self) -> CoreResult<Vec<OrderTable>> {
        let tables = self.order_tables.find_all().await?;
        debug!(count = tables.len(), "Listed order tables");
        Ok(tables)
    }

    /// Marks a table as empty or occupied.
    ///
    /// ## Rejected When
    /// - The table does not exist
    /// - The table belongs to a table group
    /// - The table has an order in COOKING or MEAL
    pub async fn change_empty(
        &self,
        table_id: Id,
        request: TableEmptyRequest,
    ) -> CoreResult<OrderTable> {
        debug!(table_id, empty = request.empty, "Changing table empty status");

        let mut table = self.find(table_id).await?;
        validate_table_ungrouped(table_id, &table).map_err(rejected)?;

        if self
            .orders
            .exists_by_order_table_id_and_order_status_in(table_id, &OrderStatus::IN_PROGRESS)
            .await?
        {
            return Err(rejected(ValidationError::OrderInProgress(table_id)));
        }

        table.empty = request.empty;
        let table = self.order_tables.save(table).await?;

        info!(table_id, empty = table.empty, "Table empty status changed");
        Ok(table)
    }

    /// Records how many guests sit at an occupied table.
    ///
    /// The count is checked before the table is looked up, so a negative
    /// count is rejected even for an unknown table.
    pub async fn change_number_of_guests(
        &self,
        table_id: Id,
        request: NumberOfGuestsRequest,
    ) -> CoreResult<OrderTable> {
        debug!(
            table_id,
            number_of_guests = request.number_of_guests,
            "Changing number of guests"
        );

        validate_number_of_guests(request.number_of_guests).map_err(rejected)?;

        let mut table = self.find(table_id).await?;
        validate_table_occupied(table_id, &table).map_err(rejected)?;

        table.number_of_guests = request.number_of_guests;
        let table = self.order_tables.save(table).await?;

        info!(
            table_id,
            number_of_guests = table.number_of_guests,
            "Number of guests changed"
        );
        Ok(table)
    }

    async fn find(&self, table_id: Id) -> CoreResult<OrderTable> {
        self.order_tables
            .find_by_id(table_id)
            .await?
            .ok_or(ValidationError::OrderTableNotFound(table_id))
            .map_err(rejected)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::error::ValidationError;
    use crate::repository::memory::MemoryStore;
    use crate::repository::Repository;
    use crate::request::{NumberOfGuestsRequest, OrderTableRequest, TableEmptyRequest};
    use crate::types::{Id, Order, OrderStatus, OrderTable};

    async fn table(store: &MemoryStore, number_of_guests: i32, empty: bool) -> OrderTable {
        store
            .table_service()
            .create(OrderTableRequest {
                number_of_guests,
                empty,
            })
            .await
            .unwrap()
    }

    async fn order(store: &MemoryStore, order_table_id: Id, order_status: OrderStatus) {
        store
            .orders
            .save(Order {
                id: None,
                order_table_id,
                order_status,
                ordered_time: Utc::now(),
                order_line_items: vec![],
            })
            .await
            .unwrap();
    }

    fn empty(empty: bool) -> TableEmptyRequest {
        TableEmptyRequest { empty }
    }

    fn guests(number_of_guests: i32) -> NumberOfGuestsRequest {
        NumberOfGuestsRequest { number_of_guests }
    }

    #[tokio::test]
    async fn test_create_and_list_tables() {
        let store = MemoryStore::new();
        let created = table(&store, 0, true).await;

        assert_eq!(created.id, Some(1));
        assert_eq!(created.table_group_id, None);

        let tables = store.table_service().list().await.unwrap();
        assert_eq!(tables, vec![created]);
    }

    #[tokio::test]
    async fn test_change_empty() {
        let store = MemoryStore::new();
        let table_id = table(&store, 0, true).await.id.unwrap();

        let changed = store
            .table_service()
            .change_empty(table_id, empty(false))
            .await
            .unwrap();

        assert!(!changed.empty);
        let stored = store.order_tables.find_by_id(table_id).await.unwrap().unwrap();
        assert!(!stored.empty);
    }

    #[tokio::test]
    async fn test_change_empty_of_unknown_table_fails() {
        let store = MemoryStore::new();

        let err = store
            .table_service()
            .change_empty(5, empty(true))
            .await
            .unwrap_err();

        assert_eq!(err.validation(), Some(&ValidationError::OrderTableNotFound(5)));
    }

    #[tokio::test]
    async fn test_change_empty_of_grouped_table_fails() {
        let store = MemoryStore::new();
        let mut grouped = table(&store, 0, false).await;
        grouped.table_group_id = Some(1);
        let grouped = store.order_tables.save(grouped).await.unwrap();
        let table_id = grouped.id.unwrap();

        let err = store
            .table_service()
            .change_empty(table_id, empty(true))
            .await
            .unwrap_err();

        assert!(err.is_invalid_argument());
        let stored = store.order_tables.find_by_id(table_id).await.unwrap().unwrap();
        assert!(!stored.empty);
    }

    #[tokio::test]
    async fn test_change_empty_with_order_in_progress_fails() {
        for status in OrderStatus::IN_PROGRESS {
            let store = MemoryStore::new();
            let table_id = table(&store, 2, false).await.id.unwrap();
            order(&store, table_id, status).await;

            let err = store
                .table_service()
                .change_empty(table_id, empty(true))
                .await
                .unwrap_err();

            assert_eq!(
                err.validation(),
                Some(&ValidationError::OrderInProgress(table_id))
            );
        }
    }

    #[tokio::test]
    async fn test_change_empty_after_completion() {
        let store = MemoryStore::new();
        let table_id = table(&store, 2, false).await.id.unwrap();
        order(&store, table_id, OrderStatus::Completion).await;

        let changed = store
            .table_service()
            .change_empty(table_id, empty(true))
            .await
            .unwrap();

        assert!(changed.empty);
        // guest count is left as it was
        assert_eq!(changed.number_of_guests, 2);
    }

    #[tokio::test]
    async fn test_change_number_of_guests() {
        let store = MemoryStore::new();
        let table_id = table(&store, 2, false).await.id.unwrap();
        let service = store.table_service();

        for count in [0, 1, 100] {
            let changed = service
                .change_number_of_guests(table_id, guests(count))
                .await
                .unwrap();
            assert_eq!(changed.number_of_guests, count);
        }
    }

    #[tokio::test]
    async fn test_negative_number_of_guests_fails() {
        let store = MemoryStore::new();
        let table_id = table(&store, 2, false).await.id.unwrap();
        let service = store.table_service();

        for count in [-1, -2, -100] {
            let err = service
                .change_number_of_guests(table_id, guests(count))
                .await
                .unwrap_err();
            assert_eq!(
                err.validation(),
                Some(&ValidationError::NegativeNumberOfGuests(count))
            );
        }

        let stored = store.order_tables.find_by_id(table_id).await.unwrap().unwrap();
        assert_eq!(stored.number_of_guests, 2);
    }

    #[tokio::test]
    async fn test_negative_count_is_checked_before_lookup() {
        let store = MemoryStore::new();

        let err = store
            .table_service()
            .change_number_of_guests(99, guests(-1))
            .await
            .unwrap_err();

        assert_eq!(
            err.validation(),
            Some(&ValidationError::NegativeNumberOfGuests(-1))
        );
    }

    #[tokio::test]
    async fn test_number_of_guests_on_empty_table_fails() {
        let store = MemoryStore::new();
        let table_id = table(&store, 0, true).await.id.unwrap();

        let err = store
            .table_service()
            .change_number_of_guests(table_id, guests(3))
            .await
            .unwrap_err();

        assert_eq!(err.validation(), Some(&ValidationError::OrderTableEmpty(table_id)));
    }

    #[tokio::test]
    async fn test_number_of_guests_on_unknown_table_fails() {
        let store = MemoryStore::new();

        let err = store
            .table_service()
            .change_number_of_guests(3, guests(3))
            .await
            .unwrap_err();

        assert_eq!(err.validation(), Some(&ValidationError::OrderTableNotFound(3)));
    }
}
