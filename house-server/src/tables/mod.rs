//! Table Coordinator
//!
//! Owns table occupancy, grouping and the link to the active order. Grouping
//! pre-occupies the member tables as one logical unit even before an order
//! exists; ordering then goes through the designated primary table.

use crate::events::{EventSender, publish_all};
use crate::store::{Store, StoreTxn, require_table};
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::{Table, TableStatus, TableUpdate};
use std::sync::Arc;

pub struct TableCoordinator<S: Store> {
    store: Arc<S>,
    event_tx: EventSender,
}

impl<S: Store> TableCoordinator<S> {
    pub fn new(store: Arc<S>, event_tx: EventSender) -> Self {
        Self { store, event_tx }
    }

    // ==================== Admin surface ====================

    pub fn create_table(&self, number: u32, capacity: u32) -> DomainResult<Table> {
        let table = self.store.transaction(|txn| {
            let table = Table::new(number, capacity);
            txn.insert_table(table.clone())?;
            Ok(table)
        })?;
        publish_all(
            &self.event_tx,
            vec![DomainEvent::TableStatusChanged {
                table: table.clone(),
            }],
        );
        Ok(table)
    }

    pub fn get_table(&self, number: u32) -> DomainResult<Table> {
        self.store.transaction(|txn| require_table(txn, number))
    }

    pub fn list_tables(&self) -> DomainResult<Vec<Table>> {
        self.store.transaction(|txn| txn.list_tables())
    }

    // ==================== Grouping ====================

    /// Link tables into one logical unit with a designated primary.
    ///
    /// All listed tables must be free and ungrouped; every member becomes
    /// occupied immediately (the group is pre-reserved as a whole).
    pub fn group(&self, table_numbers: &[u32], primary_table_number: u32) -> DomainResult<String> {
        if table_numbers.len() < 2 {
            return Err(DomainError::invalid_state(
                "a group needs at least two tables".to_string(),
            ));
        }
        if !table_numbers.contains(&primary_table_number) {
            return Err(DomainError::invalid_state(format!(
                "primary table {primary_table_number} is not among the grouped tables"
            )));
        }

        let (group_id, events) = self.store.transaction(|txn| {
            let group_id = shared::util::new_id();
            let mut events = Vec::with_capacity(table_numbers.len());
            for &number in table_numbers {
                let mut table = require_table(txn, number)?;
                if table.status != TableStatus::Free {
                    return Err(DomainError::conflict(format!("table {number} is not free")));
                }
                if table.group_id.is_some() {
                    return Err(DomainError::conflict(format!(
                        "table {number} already belongs to a group"
                    )));
                }
                table.group_id = Some(group_id.clone());
                table.is_primary = number == primary_table_number;
                table.status = TableStatus::Occupied;
                txn.update_table(table.clone())?;
                events.push(DomainEvent::TableStatusChanged { table });
            }
            Ok((group_id, events))
        })?;

        publish_all(&self.event_tx, events);
        tracing::info!(group_id = %group_id, tables = ?table_numbers, "tables grouped");
        Ok(group_id)
    }

    /// Dissolve a group. Rejected while any member still owns an order.
    pub fn ungroup(&self, group_id: &str) -> DomainResult<()> {
        let events = self.store.transaction(|txn| {
            let members: Vec<Table> = txn
                .list_tables()?
                .into_iter()
                .filter(|t| t.group_id.as_deref() == Some(group_id))
                .collect();
            if members.is_empty() {
                return Err(DomainError::not_found(format!("table group {group_id}")));
            }
            if let Some(busy) = members.iter().find(|t| t.current_order_id.is_some()) {
                return Err(DomainError::conflict(format!(
                    "table {} still has an active order",
                    busy.number
                )));
            }

            let mut events = Vec::with_capacity(members.len());
            for mut table in members {
                table.group_id = None;
                table.is_primary = false;
                table.status = TableStatus::Free;
                txn.update_table(table.clone())?;
                events.push(DomainEvent::TableStatusChanged { table });
            }
            Ok(events)
        })?;

        publish_all(&self.event_tx, events);
        Ok(())
    }

    // ==================== Direct updates ====================

    /// Direct status transition from an external token.
    ///
    /// Setting a table free also clears its order link and reservation
    /// metadata, correcting any transient occupancy violation.
    pub fn update_status(&self, number: u32, status_token: &str) -> DomainResult<Table> {
        let status = TableStatus::from_token(status_token).ok_or_else(|| {
            DomainError::invalid_state(format!("illegal table status '{status_token}'"))
        })?;
        self.apply(number, |table| {
            table.status = status;
            if status == TableStatus::Free {
                table.current_order_id = None;
                table.clear_reservation();
            }
        })
    }

    /// Partial field update (admin surface).
    pub fn update_table(&self, number: u32, update: &TableUpdate) -> DomainResult<Table> {
        let update = update.clone();
        self.apply(number, move |table| {
            if let Some(capacity) = update.capacity {
                table.capacity = capacity;
            }
            if let Some(status) = update.status {
                table.status = status;
                if status == TableStatus::Free {
                    table.current_order_id = None;
                }
            }
            if let Some(reserved_by) = update.reserved_by {
                table.reserved_by = reserved_by;
            }
            if let Some(reserved_time) = update.reserved_time {
                table.reserved_time = reserved_time;
            }
        })
    }

    /// Load-modify-store one table and broadcast the full row so
    /// subscribers never see partial state.
    fn apply(&self, number: u32, f: impl FnOnce(&mut Table)) -> DomainResult<Table> {
        let table = self.store.transaction(|txn| {
            let mut table = require_table(txn, number)?;
            f(&mut table);
            txn.update_table(table.clone())?;
            Ok(table)
        })?;
        publish_all(
            &self.event_tx,
            vec![DomainEvent::TableStatusChanged {
                table: table.clone(),
            }],
        );
        Ok(table)
    }
}
