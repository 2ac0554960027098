//! UpdateOrderStatus action
//!
//! Normalizes the external status token, applies side effects (`served`
//! cascades to items, `cancelled` frees the owning table) and notifies the
//! creator on `ready`/`cancelled`.

use super::free_tables_for_order;
use crate::store::{StoreTxn, require_order};
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::event::NotificationLevel;
use shared::models::{ItemStatus, Order, OrderStatus};

pub fn execute(
    txn: &mut impl StoreTxn,
    order_id: &str,
    status_token: &str,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    let status = OrderStatus::from_token(status_token).ok_or_else(|| {
        DomainError::invalid_state(format!("illegal order status '{status_token}'"))
    })?;

    let mut order = require_order(txn, order_id)?;
    order.status = status;

    if status == OrderStatus::Served {
        for item in &mut order.items {
            if item.status != ItemStatus::Cancelled {
                item.status = ItemStatus::Served;
            }
        }
    }
    txn.update_order(order.clone())?;

    let mut events = vec![DomainEvent::OrderStatusChanged {
        order: order.clone(),
    }];

    if status == OrderStatus::Cancelled {
        events.extend(free_tables_for_order(txn, &order.id)?);
    }

    if matches!(status, OrderStatus::Ready | OrderStatus::Cancelled) && !order.created_by.is_empty()
    {
        let (title, message) = match status {
            OrderStatus::Ready => (
                "Order ready",
                format!("Order #{} is ready to serve", order.order_number),
            ),
            _ => (
                "Order cancelled",
                format!("Order #{} was cancelled", order.order_number),
            ),
        };
        events.push(DomainEvent::notify(
            &order.created_by,
            NotificationLevel::Info,
            title,
            message,
        ));
    }

    tracing::info!(order_id = %order.id, status = ?status, "order status changed");
    Ok((order, events))
}
