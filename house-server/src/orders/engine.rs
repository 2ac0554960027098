//! OrderEngine - transactional facade over the order actions
//!
//! Holds the store and the event channel; each operation delegates to its
//! action, commits, then broadcasts the returned events fire-and-forget.

use super::actions::create_order::CreateOrderInput;
use super::actions::modify_item::ItemChanges;
use super::chain::SittingView;
use super::{actions, chain};
use crate::events::{EventSender, publish_all};
use crate::store::{Store, StoreTxn, require_order};
use shared::DomainEvent;
use shared::error::DomainResult;
use shared::models::{Order, OrderItemInput, SplitItem};
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct OrderEngine<S: Store> {
    store: Arc<S>,
    event_tx: EventSender,
}

impl<S: Store> OrderEngine<S> {
    pub fn new(store: Arc<S>, event_tx: EventSender) -> Self {
        Self { store, event_tx }
    }

    /// Subscribe to the domain event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.event_tx.subscribe()
    }

    // ==================== Operations ====================

    pub fn create_order(&self, input: CreateOrderInput) -> DomainResult<Order> {
        self.run(|txn| actions::create_order::execute(txn, &input))
    }

    pub fn add_items(&self, order_id: &str, items: &[OrderItemInput]) -> DomainResult<Order> {
        self.run(|txn| actions::add_items::execute(txn, order_id, items))
    }

    pub fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status_token: &str,
    ) -> DomainResult<Order> {
        self.run(|txn| actions::update_item_status::execute(txn, order_id, item_id, status_token))
    }

    pub fn update_order_status(&self, order_id: &str, status_token: &str) -> DomainResult<Order> {
        self.run(|txn| actions::update_order_status::execute(txn, order_id, status_token))
    }

    pub fn update_item(
        &self,
        order_id: &str,
        item_id: &str,
        changes: &ItemChanges,
    ) -> DomainResult<Order> {
        self.run(|txn| actions::modify_item::update_item(txn, order_id, item_id, changes))
    }

    pub fn remove_item(&self, order_id: &str, item_id: &str) -> DomainResult<Order> {
        self.run(|txn| actions::modify_item::remove_item(txn, order_id, item_id))
    }

    pub fn split_order(
        &self,
        order_id: &str,
        splits: &[SplitItem],
        target_table_number: u32,
    ) -> DomainResult<Order> {
        self.run(|txn| actions::split_order::execute(txn, order_id, splits, target_table_number))
    }

    /// Merge the source table's order into the target table's order; returns
    /// the combined target order.
    pub fn merge_orders(
        &self,
        source_table_number: u32,
        target_table_number: u32,
    ) -> DomainResult<Order> {
        self.run(|txn| actions::merge_orders::execute(txn, source_table_number, target_table_number))
    }

    /// Toggle the kitchen hold flag.
    pub fn set_hold(&self, order_id: &str, hold: bool) -> DomainResult<Order> {
        self.run(|txn| {
            let mut order = require_order(txn, order_id)?;
            order.hold_status = hold;
            txn.update_order(order.clone())?;
            let events = vec![DomainEvent::OrderUpdated {
                order: order.clone(),
            }];
            Ok((order, events))
        })
    }

    // ==================== Queries ====================

    pub fn get_order(&self, order_id: &str) -> DomainResult<Order> {
        self.store.transaction(|txn| require_order(txn, order_id))
    }

    pub fn list_orders(&self) -> DomainResult<Vec<Order>> {
        self.store.transaction(|txn| txn.list_orders())
    }

    /// Denormalized view of the sitting: the order, every ancestor with its
    /// payments, and `previous_paid_total`.
    pub fn sitting(&self, order_id: &str) -> DomainResult<SittingView> {
        self.store.transaction(|txn| {
            let order = require_order(txn, order_id)?;
            chain::sitting_view(txn, &order)
        })
    }

    fn run(
        &self,
        f: impl FnOnce(&mut S::Txn) -> DomainResult<(Order, Vec<DomainEvent>)>,
    ) -> DomainResult<Order> {
        let (order, events) = self.store.transaction(f)?;
        publish_all(&self.event_tx, events);
        Ok(order)
    }
}
