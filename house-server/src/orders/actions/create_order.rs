//! CreateOrder action
//!
//! Opens a new order on a table (or none, for takeout), occupying the table
//! and its grouped siblings.

use super::{build_items, occupy_tables};
use crate::orders::money;
use crate::store::{StoreTxn, require_table};
use serde::{Deserialize, Serialize};
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::{Discount, Order, OrderItemInput, OrderStatus, Table, TableStatus};

/// CreateOrder input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderInput {
    /// None for non-dine-in (takeout) orders
    pub table_number: Option<u32>,
    pub items: Vec<OrderItemInput>,
    pub discount: Option<Discount>,
    /// Staff id of the creator
    pub created_by: String,
}

pub fn execute(
    txn: &mut impl StoreTxn,
    input: &CreateOrderInput,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    let table = match input.table_number {
        Some(number) => {
            let table = require_table(txn, number)?;
            check_table_accepts_order(&table)?;
            Some(table)
        }
        None => None,
    };

    if let Some(discount) = &input.discount {
        money::validate_discount(discount)?;
    }

    let items = build_items(txn, &input.items)?;
    let total = money::order_total(&items, input.discount.as_ref());

    let order = Order {
        id: shared::util::new_id(),
        table_number: input.table_number,
        order_number: txn.next_order_number()?,
        status: OrderStatus::Pending,
        total,
        discount: input.discount,
        is_paid: false,
        payment_method: None,
        hold_status: false,
        parent_order_id: None,
        created_by: input.created_by.clone(),
        items,
        created_at: shared::util::now_millis(),
    };
    txn.insert_order(order.clone())?;

    let mut events = vec![DomainEvent::OrderCreated {
        order: order.clone(),
    }];
    if let Some(table) = table {
        events.extend(occupy_tables(txn, &table, &order.id)?);
    }

    tracing::info!(
        order_id = %order.id,
        order_number = order.order_number,
        table = ?order.table_number,
        total = order.total,
        "order created"
    );
    Ok((order, events))
}

/// A table accepts a new order unless it is occupied; an occupied group
/// primary with no active order is the one exception (grouping pre-occupies
/// its members before an order exists). Non-primary group members never own
/// orders directly.
fn check_table_accepts_order(table: &Table) -> DomainResult<()> {
    if table.is_grouped_secondary() {
        return Err(DomainError::conflict(format!(
            "ordering must occur from the primary table of the group (table {})",
            table.number
        )));
    }
    if table.current_order_id.is_some() {
        return Err(DomainError::conflict(format!(
            "table {} already has an active order",
            table.number
        )));
    }
    if table.status == TableStatus::Occupied && !(table.group_id.is_some() && table.is_primary) {
        return Err(DomainError::conflict(format!(
            "table {} is occupied",
            table.number
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemStore, Store};
    use shared::models::{DiscountKind, ItemModifier, MenuItem};

    fn seed(store: &MemStore) {
        store
            .transaction(|txn| {
                txn.insert_table(Table::new(5, 4))?;
                txn.insert_menu_item(MenuItem::new("item-a", "Item A", 10.0))?;
                txn.insert_menu_item(MenuItem::new("item-b", "Item B", 5.0))?;
                let mut off = MenuItem::new("item-off", "Out of Stock", 3.0);
                off.available = false;
                txn.insert_menu_item(off)
            })
            .unwrap();
    }

    fn line(menu_item_id: &str, quantity: u32) -> OrderItemInput {
        OrderItemInput {
            menu_item_id: menu_item_id.to_string(),
            quantity,
            notes: None,
            modifiers: vec![],
        }
    }

    fn input(items: Vec<OrderItemInput>, discount: Option<Discount>) -> CreateOrderInput {
        CreateOrderInput {
            table_number: Some(5),
            items,
            discount,
            created_by: "staff-1".to_string(),
        }
    }

    #[test]
    fn test_create_order_with_percentage_discount() {
        let store = MemStore::new();
        seed(&store);

        let (order, events) = store
            .transaction(|txn| {
                execute(
                    txn,
                    &input(
                        vec![line("item-a", 2), line("item-b", 1)],
                        Some(Discount {
                            kind: DiscountKind::Percentage,
                            value: 10.0,
                        }),
                    ),
                )
            })
            .unwrap();

        // (20 + 5) × 0.9 = 22.50
        assert_eq!(order.total, 22.50);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_number, 1);

        let topics: Vec<&str> = events.iter().map(|e| e.topic()).collect();
        assert_eq!(topics, vec!["order:created", "table:status-changed"]);

        let table = store
            .transaction(|txn| txn.get_table(5))
            .unwrap()
            .unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.current_order_id, Some(order.id));
    }

    #[test]
    fn test_modifiers_increase_unit_price() {
        let store = MemStore::new();
        seed(&store);

        let mut item = line("item-a", 1);
        item.modifiers = vec![ItemModifier {
            id: "m".to_string(),
            name: "extra".to_string(),
            price: 2.5,
        }];
        let (order, _) = store
            .transaction(|txn| execute(txn, &input(vec![item], None)))
            .unwrap();
        assert_eq!(order.items[0].unit_price, 12.5);
        assert_eq!(order.total, 12.5);
    }

    #[test]
    fn test_unavailable_menu_item_rejected() {
        let store = MemStore::new();
        seed(&store);

        let result = store.transaction(|txn| execute(txn, &input(vec![line("item-off", 1)], None)));
        match result {
            Err(DomainError::InvalidState(msg)) => assert!(msg.contains("unavailable")),
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_occupied_table_rejected() {
        let store = MemStore::new();
        seed(&store);

        store
            .transaction(|txn| execute(txn, &input(vec![line("item-a", 1)], None)))
            .unwrap();
        let result = store.transaction(|txn| execute(txn, &input(vec![line("item-b", 1)], None)));
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_secondary_group_member_rejected() {
        let store = MemStore::new();
        seed(&store);
        store
            .transaction(|txn| {
                let mut t = Table::new(6, 2);
                t.group_id = Some("g-1".to_string());
                t.is_primary = false;
                t.status = TableStatus::Occupied;
                txn.insert_table(t)
            })
            .unwrap();

        let result = store.transaction(|txn| {
            execute(
                txn,
                &CreateOrderInput {
                    table_number: Some(6),
                    items: vec![line("item-a", 1)],
                    discount: None,
                    created_by: "staff-1".to_string(),
                },
            )
        });
        match result {
            Err(DomainError::Conflict(msg)) => assert!(msg.contains("primary table")),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_group_primary_without_order_accepts_and_occupies_siblings() {
        let store = MemStore::new();
        seed(&store);
        store
            .transaction(|txn| {
                let mut primary = Table::new(10, 4);
                primary.group_id = Some("g-1".to_string());
                primary.is_primary = true;
                primary.status = TableStatus::Occupied;
                txn.insert_table(primary)?;
                let mut secondary = Table::new(11, 4);
                secondary.group_id = Some("g-1".to_string());
                secondary.status = TableStatus::Occupied;
                txn.insert_table(secondary)
            })
            .unwrap();

        let (order, events) = store
            .transaction(|txn| {
                execute(
                    txn,
                    &CreateOrderInput {
                        table_number: Some(10),
                        items: vec![line("item-a", 1)],
                        discount: None,
                        created_by: "staff-1".to_string(),
                    },
                )
            })
            .unwrap();

        // order:created + one table event per group member
        assert_eq!(events.len(), 3);
        for number in [10, 11] {
            let t = store
                .transaction(|txn| txn.get_table(number))
                .unwrap()
                .unwrap();
            assert_eq!(t.current_order_id.as_ref(), Some(&order.id));
        }
    }

    #[test]
    fn test_takeout_order_has_no_table() {
        let store = MemStore::new();
        seed(&store);

        let (order, events) = store
            .transaction(|txn| {
                execute(
                    txn,
                    &CreateOrderInput {
                        table_number: None,
                        items: vec![line("item-b", 2)],
                        discount: None,
                        created_by: "staff-1".to_string(),
                    },
                )
            })
            .unwrap();
        assert_eq!(order.table_number, None);
        assert_eq!(order.total, 10.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_unknown_table_is_not_found() {
        let store = MemStore::new();
        seed(&store);
        let result = store.transaction(|txn| {
            execute(
                txn,
                &CreateOrderInput {
                    table_number: Some(99),
                    items: vec![line("item-a", 1)],
                    discount: None,
                    created_by: "staff-1".to_string(),
                },
            )
        });
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
