//! Order engine actions
//!
//! One file per mutating operation. Each action runs inside a store
//! transaction and returns the new state plus the events to publish; the
//! engine broadcasts them after commit.

pub mod add_items;
pub mod create_order;
pub mod merge_orders;
pub mod modify_item;
pub mod split_order;
pub mod update_item_status;
pub mod update_order_status;

use crate::orders::money;
use crate::store::{StoreTxn, require_menu_item};
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::{ItemStatus, OrderItem, OrderItemInput, Table, TableStatus};

/// Resolve input lines against the menu, rejecting unavailable items.
///
/// Unit prices snapshot the list price plus selected modifier prices.
pub(crate) fn build_items(
    txn: &impl StoreTxn,
    inputs: &[OrderItemInput],
) -> DomainResult<Vec<OrderItem>> {
    inputs
        .iter()
        .map(|input| {
            money::validate_item_input(input)?;
            let menu_item = require_menu_item(txn, &input.menu_item_id)?;
            if !menu_item.available {
                return Err(DomainError::invalid_state(format!(
                    "menu item '{}' is unavailable",
                    menu_item.name
                )));
            }
            Ok(OrderItem {
                id: shared::util::new_id(),
                menu_item_id: menu_item.id,
                name: menu_item.name,
                unit_price: money::unit_price(menu_item.price, &input.modifiers),
                quantity: input.quantity,
                notes: input.notes.clone(),
                status: ItemStatus::Pending,
                modifiers: input.modifiers.clone(),
            })
        })
        .collect()
}

/// Occupy `table` (and every grouped sibling) for `order_id`.
///
/// Returns one `table:status-changed` event per affected table.
pub(crate) fn occupy_tables(
    txn: &mut impl StoreTxn,
    table: &Table,
    order_id: &str,
) -> DomainResult<Vec<DomainEvent>> {
    let members = match &table.group_id {
        Some(group_id) => txn
            .list_tables()?
            .into_iter()
            .filter(|t| t.group_id.as_deref() == Some(group_id))
            .collect(),
        None => vec![table.clone()],
    };

    let mut events = Vec::with_capacity(members.len());
    for mut member in members {
        member.status = TableStatus::Occupied;
        member.current_order_id = Some(order_id.to_string());
        member.clear_reservation();
        txn.update_table(member.clone())?;
        events.push(DomainEvent::TableStatusChanged { table: member });
    }
    Ok(events)
}

/// Free every table whose `current_order_id` still points at `order_id`.
///
/// Covers grouped siblings too, since they share the owning reference.
pub(crate) fn free_tables_for_order(
    txn: &mut impl StoreTxn,
    order_id: &str,
) -> DomainResult<Vec<DomainEvent>> {
    let owned: Vec<Table> = txn
        .list_tables()?
        .into_iter()
        .filter(|t| t.current_order_id.as_deref() == Some(order_id))
        .collect();

    let mut events = Vec::with_capacity(owned.len());
    for mut table in owned {
        table.status = TableStatus::Free;
        table.current_order_id = None;
        txn.update_table(table.clone())?;
        events.push(DomainEvent::TableStatusChanged { table });
    }
    Ok(events)
}
