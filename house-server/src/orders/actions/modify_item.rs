//! ModifyItem / RemoveItem actions
//!
//! Line edits retotal the order with its existing discount settings; the
//! discount type/value themselves are never recomputed here. Deleting the
//! last item does not auto-cancel the order (left to staff).

use crate::orders::money;
use crate::store::{StoreTxn, require_order};
use serde::{Deserialize, Serialize};
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::Order;

/// Changes to apply to a line; `None` fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemChanges {
    pub quantity: Option<u32>,
    /// `Some(None)` clears the note
    pub notes: Option<Option<String>>,
}

pub fn update_item(
    txn: &mut impl StoreTxn,
    order_id: &str,
    item_id: &str,
    changes: &ItemChanges,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    let mut order = require_order(txn, order_id)?;
    let item = order
        .items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or_else(|| DomainError::not_found(format!("order item {item_id}")))?;

    if let Some(quantity) = changes.quantity {
        if quantity == 0 {
            return Err(DomainError::invalid_state(
                "quantity must be positive; use remove_item to delete a line".to_string(),
            ));
        }
        item.quantity = quantity;
    }
    if let Some(notes) = &changes.notes {
        item.notes = notes.clone();
    }

    order.total = money::order_total(&order.items, order.discount.as_ref());
    txn.update_order(order.clone())?;

    let events = vec![DomainEvent::OrderUpdated {
        order: order.clone(),
    }];
    Ok((order, events))
}

pub fn remove_item(
    txn: &mut impl StoreTxn,
    order_id: &str,
    item_id: &str,
) -> DomainResult<(Order, Vec<DomainEvent>)> {
    let mut order = require_order(txn, order_id)?;
    let before = order.items.len();
    order.items.retain(|i| i.id != item_id);
    if order.items.len() == before {
        return Err(DomainError::not_found(format!("order item {item_id}")));
    }

    order.total = money::order_total(&order.items, order.discount.as_ref());
    txn.update_order(order.clone())?;

    let events = vec![DomainEvent::OrderUpdated {
        order: order.clone(),
    }];
    Ok((order, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::create_order::{self, CreateOrderInput};
    use crate::store::{MemStore, Store};
    use shared::models::{Discount, DiscountKind, MenuItem, OrderItemInput, Table};

    fn seed(store: &MemStore, discount: Option<Discount>) -> Order {
        store
            .transaction(|txn| {
                txn.insert_table(Table::new(1, 4))?;
                txn.insert_menu_item(MenuItem::new("item-a", "Item A", 10.0))?;
                txn.insert_menu_item(MenuItem::new("item-b", "Item B", 5.0))?;
                let (order, _) = create_order::execute(
                    txn,
                    &CreateOrderInput {
                        table_number: Some(1),
                        items: vec![
                            OrderItemInput {
                                menu_item_id: "item-a".to_string(),
                                quantity: 2,
                                notes: None,
                                modifiers: vec![],
                            },
                            OrderItemInput {
                                menu_item_id: "item-b".to_string(),
                                quantity: 1,
                                notes: None,
                                modifiers: vec![],
                            },
                        ],
                        discount,
                        created_by: "staff-1".to_string(),
                    },
                )?;
                Ok(order)
            })
            .unwrap()
    }

    #[test]
    fn test_quantity_change_retotals_with_existing_discount() {
        let store = MemStore::new();
        let order = seed(
            &store,
            Some(Discount {
                kind: DiscountKind::Percentage,
                value: 10.0,
            }),
        );
        assert_eq!(order.total, 22.50);
        let first = order.items[0].id.clone();

        let (updated, _) = store
            .transaction(|txn| {
                update_item(
                    txn,
                    &order.id,
                    &first,
                    &ItemChanges {
                        quantity: Some(1),
                        notes: None,
                    },
                )
            })
            .unwrap();
        // (10 + 5) × 0.9 = 13.50, discount settings untouched
        assert_eq!(updated.total, 13.50);
        assert_eq!(updated.discount, order.discount);
    }

    #[test]
    fn test_note_update_and_clear() {
        let store = MemStore::new();
        let order = seed(&store, None);
        let first = order.items[0].id.clone();

        let (updated, _) = store
            .transaction(|txn| {
                update_item(
                    txn,
                    &order.id,
                    &first,
                    &ItemChanges {
                        quantity: None,
                        notes: Some(Some("no onions".to_string())),
                    },
                )
            })
            .unwrap();
        assert_eq!(updated.items[0].notes.as_deref(), Some("no onions"));

        let (updated, _) = store
            .transaction(|txn| {
                update_item(
                    txn,
                    &order.id,
                    &first,
                    &ItemChanges {
                        quantity: None,
                        notes: Some(None),
                    },
                )
            })
            .unwrap();
        assert_eq!(updated.items[0].notes, None);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let store = MemStore::new();
        let order = seed(&store, None);
        let first = order.items[0].id.clone();
        let result = store.transaction(|txn| {
            update_item(
                txn,
                &order.id,
                &first,
                &ItemChanges {
                    quantity: Some(0),
                    notes: None,
                },
            )
        });
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }

    #[test]
    fn test_remove_item_retotals() {
        let store = MemStore::new();
        let order = seed(&store, None);
        let first = order.items[0].id.clone();

        let (updated, _) = store
            .transaction(|txn| remove_item(txn, &order.id, &first))
            .unwrap();
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.total, 5.0);
    }

    #[test]
    fn test_removing_last_item_does_not_cancel() {
        let store = MemStore::new();
        let order = seed(&store, None);
        let ids: Vec<String> = order.items.iter().map(|i| i.id.clone()).collect();

        let mut updated = order;
        for id in &ids {
            (updated, _) = store
                .transaction(|txn| remove_item(txn, &updated.id, id))
                .unwrap();
        }
        assert!(updated.items.is_empty());
        assert_eq!(updated.total, 0.0);
        assert_ne!(updated.status, shared::models::OrderStatus::Cancelled);
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let store = MemStore::new();
        let order = seed(&store, None);
        let result = store.transaction(|txn| remove_item(txn, &order.id, "ghost"));
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
