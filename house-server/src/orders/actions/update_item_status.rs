//! UpdateItemStatus action
//!
//! Item transitions are free among the legal values; afterwards the order is
//! re-evaluated and auto-promoted to `Ready` once every non-cancelled item is
//! ready or served. The propagation only fires forward, never downgrades.

use crate::orders::money;
use crate::store::{StoreTxn, require_order};
use shared::error::{DomainError, DomainResult};
use shared::event::NotificationLevel;
use shared::models::{ItemStatus, Order, OrderStatus};
use shared::DomainEvent;

pub fn execute(
    txn: &mut impl StoreTxn,
    order_id: &str,
    item_id: &str,
    status_token: &str,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    let status = ItemStatus::from_token(status_token).ok_or_else(|| {
        DomainError::invalid_state(format!("illegal item status '{status_token}'"))
    })?;

    let mut order = require_order(txn, order_id)?;
    let item = order
        .items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or_else(|| DomainError::not_found(format!("order item {item_id}")))?;
    item.status = status;

    // Cancelling an item changes what is billed.
    order.total = money::order_total(&order.items, order.discount.as_ref());

    let mut events = Vec::new();
    if should_promote(&order) {
        order.status = OrderStatus::Ready;
        events.push(DomainEvent::OrderStatusChanged {
            order: order.clone(),
        });
        events.push(DomainEvent::notify(
            &order.created_by,
            NotificationLevel::Info,
            "Order ready",
            format!("Order #{} is ready to serve", order.order_number),
        ));
    }

    txn.update_order(order.clone())?;
    events.insert(
        0,
        DomainEvent::OrderUpdated {
            order: order.clone(),
        },
    );
    Ok((order, events))
}

/// Promote when every non-cancelled item is ready or served, the order has
/// at least one such item, and the order is not already ready/served.
fn should_promote(order: &Order) -> bool {
    if matches!(order.status, OrderStatus::Ready | OrderStatus::Served) {
        return false;
    }
    let mut any = false;
    for item in order.active_items() {
        any = true;
        if !matches!(item.status, ItemStatus::Ready | ItemStatus::Served) {
            return false;
        }
    }
    any
}
