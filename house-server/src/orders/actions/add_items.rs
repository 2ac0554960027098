//! AddItems action
//!
//! The most delicate operation because of sitting chaining: an unpaid order
//! takes the items directly; a paid order stays immutable as a receipt and a
//! new chained order is opened under the same table.

use super::{build_items, occupy_tables};
use crate::orders::money;
use crate::store::{StoreTxn, require_order, require_table};
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::{Order, OrderItemInput, OrderStatus};

pub fn execute(
    txn: &mut impl StoreTxn,
    order_id: &str,
    inputs: &[OrderItemInput],
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    let order = require_order(txn, order_id)?;

    // Cancelled is the only hard terminal state for item mutation.
    if order.status == OrderStatus::Cancelled {
        return Err(DomainError::invalid_state(format!(
            "cannot add items to cancelled order {order_id}"
        )));
    }

    let new_items = build_items(txn, inputs)?;
    if order.is_paid {
        chain_new_round(txn, order, new_items)
    } else {
        append_to_order(txn, order, new_items)
    }
}

/// Unpaid order: append the items, retotal with the order's existing
/// discount settings, and reset a served/ready/delivered order to pending
/// (new items require re-fulfilment).
fn append_to_order(
    txn: &mut impl StoreTxn,
    mut order: Order,
    new_items: Vec<shared::models::OrderItem>,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    order.items.extend(new_items);
    order.total = money::order_total(&order.items, order.discount.as_ref());

    let status_reset = matches!(
        order.status,
        OrderStatus::Served | OrderStatus::Ready | OrderStatus::Delivered
    );
    if status_reset {
        order.status = OrderStatus::Pending;
    }
    txn.update_order(order.clone())?;

    let mut events = vec![DomainEvent::OrderUpdated {
        order: order.clone(),
    }];
    if status_reset {
        events.push(DomainEvent::OrderStatusChanged {
            order: order.clone(),
        });
    }
    Ok((order, events))
}

/// Paid order: open a new round chained via `parent_order_id`, carrying the
/// same table and discount settings; the paid order is preserved as an
/// immutable receipt. The table is re-occupied by the new round.
fn chain_new_round(
    txn: &mut impl StoreTxn,
    paid: Order,
    new_items: Vec<shared::models::OrderItem>,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    let total = money::order_total(&new_items, paid.discount.as_ref());
    let child = Order {
        id: shared::util::new_id(),
        table_number: paid.table_number,
        order_number: txn.next_order_number()?,
        status: OrderStatus::Pending,
        total,
        discount: paid.discount,
        is_paid: false,
        payment_method: None,
        hold_status: false,
        parent_order_id: Some(paid.id.clone()),
        created_by: paid.created_by.clone(),
        items: new_items,
        created_at: shared::util::now_millis(),
    };
    txn.insert_order(child.clone())?;

    let mut events = vec![DomainEvent::OrderCreated {
        order: child.clone(),
    }];
    if let Some(number) = child.table_number {
        let table = require_table(txn, number)?;
        events.extend(occupy_tables(txn, &table, &child.id)?);
    }

    tracing::info!(
        parent = %paid.id,
        child = %child.id,
        "paid order chained into a new round"
    );
    Ok((child, events))
}
