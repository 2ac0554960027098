//! SplitOrder action
//!
//! Moves selected quantities off an order onto a new order at a free table.
//! Full-quantity lines transfer ownership; partial quantities decrement the
//! source line and create a new line under the target. Totals on both sides
//! are recomputed as raw sums: the split intentionally ignores the original
//! discount.

use crate::orders::money;
use crate::store::{StoreTxn, require_order, require_table};
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::{Order, OrderItem, OrderStatus, SplitItem, TableStatus};

pub fn execute(
    txn: &mut impl StoreTxn,
    source_order_id: &str,
    splits: &[SplitItem],
    target_table_number: u32,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    let mut source = require_order(txn, source_order_id)?;

    let mut target_table = require_table(txn, target_table_number)?;
    if target_table.status != TableStatus::Free {
        return Err(DomainError::conflict(format!(
            "target table {target_table_number} is not free"
        )));
    }

    let mut moved: Vec<OrderItem> = Vec::with_capacity(splits.len());
    for split in splits {
        if split.quantity == 0 {
            return Err(DomainError::invalid_state(
                "split quantity must be positive".to_string(),
            ));
        }
        let position = source
            .items
            .iter()
            .position(|i| i.id == split.item_id)
            .ok_or_else(|| DomainError::not_found(format!("order item {}", split.item_id)))?;

        if split.quantity >= source.items[position].quantity {
            // whole line: ownership transfer, same item id
            moved.push(source.items.remove(position));
        } else {
            // partial: decrement source, duplicate under the new order
            let item = &mut source.items[position];
            item.quantity -= split.quantity;
            moved.push(item.duplicate_with_quantity(split.quantity));
        }
    }

    let new_order = Order {
        id: shared::util::new_id(),
        table_number: Some(target_table_number),
        order_number: txn.next_order_number()?,
        status: OrderStatus::Pending,
        total: money::to_f64(money::raw_subtotal(&moved)),
        discount: None,
        is_paid: false,
        payment_method: None,
        hold_status: false,
        parent_order_id: None,
        created_by: source.created_by.clone(),
        items: moved,
        created_at: shared::util::now_millis(),
    };
    txn.insert_order(new_order.clone())?;

    source.total = money::to_f64(money::raw_subtotal(&source.items));
    txn.update_order(source.clone())?;

    target_table.status = TableStatus::Occupied;
    target_table.current_order_id = Some(new_order.id.clone());
    txn.update_table(target_table.clone())?;

    tracing::info!(
        source = %source.id,
        new_order = %new_order.id,
        target_table = target_table_number,
        "order split"
    );
    let events = vec![
        DomainEvent::OrderCreated {
            order: new_order.clone(),
        },
        DomainEvent::OrderUpdated { order: source },
        DomainEvent::TableStatusChanged {
            table: target_table,
        },
    ];
    Ok((new_order, events))
}
