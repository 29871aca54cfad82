//! # Table Group Service
//!
//! Merging tables for one party and splitting them again.
//!
//! ## Grouping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create([T1, T2])                                                       │
//! │                                                                         │
//! │   T1 empty, ungrouped ─┐                     ┌─► T1 group=G, occupied   │
//! │                        ├─► TableGroup G ─────┤                          │
//! │   T2 empty, ungrouped ─┘   created_date=now  └─► T2 group=G, occupied   │
//! │                                                                         │
//! │  ungroup(G)                                                             │
//! │                                                                         │
//! │   no COOKING/MEAL order on T1 or T2                                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   T1 group=None, occupied      T2 group=None, occupied                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both operations check every member before writing anything, so a
//! rejected request leaves all tables as they were.

use chrono::Utc;
use tracing::{debug, info};

use super::{assigned_id, rejected};
use crate::error::{CoreResult, ValidationError};
use crate::repository::{OrderRepository, OrderTableRepository, TableGroupRepository};
use crate::request::TableGroupRequest;
use crate::types::{Id, OrderStatus, OrderTable, TableGroup};
use crate::validation::{
    validate_table_group_size, validate_tables_found, validate_tables_groupable,
};

/// Groups and ungroups tables.
#[derive(Debug, Clone)]
pub struct TableGroupService<G, T, O> {
    table_groups: G,
    order_tables: T,
    orders: O,
}

impl<G, T, O> TableGroupService<G, T, O>
where
    G: TableGroupRepository,
    T: OrderTableRepository,
    O: OrderRepository,
{
    pub fn new(table_groups: G, order_tables: T, orders: O) -> Self {
        TableGroupService {
            table_groups,
            order_tables,
            orders,
        }
    }

    /// Merges empty, ungrouped tables into a new table group.
    ///
    /// ## Returns
    /// The saved group with its member tables in request order, each now
    /// pointing at the group and marked occupied.
    pub async fn create(&self, request: TableGroupRequest) -> CoreResult<TableGroup> {
        let table_ids = request.table_ids();
        debug!(tables = ?table_ids, "Creating table group");

        validate_table_group_size(table_ids.len()).map_err(rejected)?;

        let tables = self.order_tables.find_all_by_id_in(&table_ids).await?;
        validate_tables_found(table_ids.len(), tables.len()).map_err(rejected)?;
        validate_tables_groupable(&tables).map_err(rejected)?;

        let mut group = self
            .table_groups
            .save(TableGroup {
                id: None,
                created_date: Utc::now(),
                order_tables: Vec::new(),
            })
            .await?;
        let table_group_id = assigned_id(&group)?;

        let mut members = Vec::with_capacity(table_ids.len());
        for table_id in &table_ids {
            let mut table = tables
                .iter()
                .find(|t| t.id == Some(*table_id))
                .cloned()
                .ok_or(ValidationError::OrderTableNotFound(*table_id))
                .map_err(rejected)?;
            table.table_group_id = Some(table_group_id);
            table.empty = false;
            members.push(self.order_tables.save(table).await?);
        }
        group.order_tables = members;

        info!(
            table_group_id,
            tables = ?table_ids,
            "Table group created"
        );
        Ok(group)
    }

    /// Releases every table of a group.
    ///
    /// Members keep `empty = false`. A group id without members is
    /// accepted and changes nothing.
    pub async fn ungroup(&self, table_group_id: Id) -> CoreResult<()> {
        debug!(table_group_id, "Ungrouping tables");

        let tables = self
            .order_tables
            .find_all_by_table_group_id(table_group_id)
            .await?;
        let table_ids: Vec<Id> = tables.iter().filter_map(|t| t.id).collect();

        if self
            .orders
            .exists_by_order_table_id_in_and_order_status_in(&table_ids, &OrderStatus::IN_PROGRESS)
            .await?
        {
            return Err(rejected(ValidationError::TableGroupOrderInProgress(
                table_group_id,
            )));
        }

        for table in tables {
            self.order_tables
                .save(OrderTable {
                    table_group_id: None,
                    empty: false,
                    ..table
                })
                .await?;
        }

        info!(table_group_id, tables = ?table_ids, "Table group ungrouped");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
