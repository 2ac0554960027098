//! MergeOrders action
//!
//! Moves every item from the source table's order into the target table's
//! order (ownership transfer, no copy), retotals the target as a raw sum,
//! deletes the source order and frees the source table.

use super::free_tables_for_order;
use crate::orders::money;
use crate::store::{StoreTxn, require_order, require_table};
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::Order;

pub fn execute(
    txn: &mut impl StoreTxn,
    source_table_number: u32,
    target_table_number: u32,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    if source_table_number == target_table_number {
        return Err(DomainError::invalid_state(
            "cannot merge a table into itself".to_string(),
        ));
    }

    let source_order_id = active_order_id(txn, source_table_number)?;
    let target_order_id = active_order_id(txn, target_table_number)?;

    let mut source = require_order(txn, &source_order_id)?;
    let mut target = require_order(txn, &target_order_id)?;

    target.items.append(&mut source.items);
    target.total = money::to_f64(money::raw_subtotal(&target.items));
    txn.update_order(target.clone())?;
    txn.delete_order(&source.id)?;

    let mut events = vec![DomainEvent::OrderUpdated {
        order: target.clone(),
    }];
    events.extend(free_tables_for_order(txn, &source.id)?);
    events.push(DomainEvent::OrderDeleted {
        order_id: source.id.clone(),
        table_number: source.table_number,
    });

    tracing::info!(
        source = %source.id,
        target = %target.id,
        "orders merged"
    );
    Ok((target, events))
}

fn active_order_id(txn: &impl StoreTxn, table_number: u32) -> DomainResult<String> {
    let table = require_table(txn, table_number)?;
    table.current_order_id.ok_or_else(|| {
        DomainError::conflict(format!("table {table_number} has no active order"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::create_order::{self, CreateOrderInput};
    use crate::orders::actions::split_order;
    use crate::store::{MemStore, Store};
    use shared::models::{MenuItem, OrderItemInput, SplitItem, Table, TableStatus};

    fn seed_two_orders(store: &MemStore) -> (Order, Order) {
        store
            .transaction(|txn| {
                txn.insert_table(Table::new(1, 4))?;
                txn.insert_table(Table::new(2, 4))?;
                txn.insert_menu_item(MenuItem::new("item-a", "Item A", 10.0))?;
                txn.insert_menu_item(MenuItem::new("item-b", "Item B", 5.0))?;
                let (first, _) = create_order::execute(
                    txn,
                    &CreateOrderInput {
                        table_number: Some(1),
                        items: vec![OrderItemInput {
                            menu_item_id: "item-a".to_string(),
                            quantity: 2,
                            notes: None,
                            modifiers: vec![],
                        }],
                        discount: None,
                        created_by: "staff-1".to_string(),
                    },
                )?;
                let (second, _) = create_order::execute(
                    txn,
                    &CreateOrderInput {
                        table_number: Some(2),
                        items: vec![OrderItemInput {
                            menu_item_id: "item-b".to_string(),
                            quantity: 1,
                            notes: None,
                            modifiers: vec![],
                        }],
                        discount: None,
                        created_by: "staff-1".to_string(),
                    },
                )?;
                Ok((first, second))
            })
            .unwrap()
    }

    #[test]
    fn test_merge_combines_items_and_frees_source() {
        let store = MemStore::new();
        let (source_order, target_order) = seed_two_orders(&store);

        let (merged, events) = store.transaction(|txn| execute(txn, 1, 2)).unwrap();

        assert_eq!(merged.id, target_order.id);
        assert_eq!(merged.items.len(), 2);
        assert_eq!(merged.total, 25.0);

        let topics: Vec<&str> = events.iter().map(|e| e.topic()).collect();
        assert_eq!(
            topics,
            vec!["order:updated", "table:status-changed", "order:deleted"]
        );

        assert!(
            store
                .transaction(|txn| txn.get_order(&source_order.id))
                .unwrap()
                .is_none()
        );
        let source_table = store.transaction(|txn| txn.get_table(1)).unwrap().unwrap();
        assert_eq!(source_table.status, TableStatus::Free);
        assert_eq!(source_table.current_order_id, None);
    }

    #[test]
    fn test_merge_requires_active_orders() {
        let store = MemStore::new();
        seed_two_orders(&store);
        store
            .transaction(|txn| {
                txn.insert_table(Table::new(3, 4))?;
                Ok(())
            })
            .unwrap();

        let result = store.transaction(|txn| execute(txn, 3, 2));
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_merge_into_itself_rejected() {
        let store = MemStore::new();
        seed_two_orders(&store);
        let result = store.transaction(|txn| execute(txn, 1, 1));
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }

    #[test]
    fn test_split_then_merge_round_trip_restores_raw_totals() {
        let store = MemStore::new();
        let (source_order, _) = seed_two_orders(&store);
        store
            .transaction(|txn| {
                txn.insert_table(Table::new(5, 2))?;
                Ok(())
            })
            .unwrap();
        let pre_split_total = source_order.total;
        let line = source_order.items[0].id.clone();

        // split one unit off to table 5, then merge table 5 back into table 1
        store
            .transaction(|txn| {
                split_order::execute(
                    txn,
                    &source_order.id,
                    &[SplitItem {
                        item_id: line,
                        quantity: 1,
                    }],
                    5,
                )
            })
            .unwrap();
        let (restored, _) = store.transaction(|txn| execute(txn, 5, 1)).unwrap();

        assert_eq!(restored.total, pre_split_total);
        let table5 = store.transaction(|txn| txn.get_table(5)).unwrap().unwrap();
        assert_eq!(table5.status, TableStatus::Free);
    }
}
