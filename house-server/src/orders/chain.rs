//! Sitting chain traversal
//!
//! A dining sitting can span several orders linked by `parent_order_id`
//! (each payment round chains a new order onto the paid one). The chain is a
//! parent-pointer linked list; traversal is iterative with a hard depth cap
//! so a cycle introduced by a data bug surfaces as an integrity error, never
//! a hang.

use crate::orders::money;
use crate::store::{StoreTxn, require_order};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{DomainError, DomainResult};
use shared::models::{Order, PaymentTransaction};

/// Traversal cap; a longer chain than this is a data-integrity error.
pub const MAX_CHAIN_DEPTH: usize = 100;

/// One ancestor order with its payment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AncestorEntry {
    pub order: Order,
    pub payments: Vec<PaymentTransaction>,
}

/// Denormalized view of a whole sitting, newest order first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SittingView {
    pub order: Order,
    pub ancestors: Vec<AncestorEntry>,
    /// Sum of every ancestor order's total
    pub previous_paid_total: f64,
}

/// Collect every ancestor of `order`, nearest first.
pub fn collect_ancestors(txn: &impl StoreTxn, order: &Order) -> DomainResult<Vec<Order>> {
    let mut ancestors = Vec::new();
    let mut next = order.parent_order_id.clone();

    while let Some(id) = next {
        if ancestors.len() >= MAX_CHAIN_DEPTH {
            return Err(DomainError::integrity(format!(
                "order chain for {} exceeds depth {MAX_CHAIN_DEPTH}",
                order.id
            )));
        }
        let parent = require_order(txn, &id)?;
        next = parent.parent_order_id.clone();
        ancestors.push(parent);
    }

    Ok(ancestors)
}

/// Sum of ancestor totals for `order` (0 when the order has no parent).
pub fn previous_paid_total(txn: &impl StoreTxn, order: &Order) -> DomainResult<f64> {
    let ancestors = collect_ancestors(txn, order)?;
    Ok(sum_totals(&ancestors))
}

/// Build the denormalized sitting view for an order.
pub fn sitting_view(txn: &impl StoreTxn, order: &Order) -> DomainResult<SittingView> {
    let ancestors = collect_ancestors(txn, order)?;
    let previous_paid_total = sum_totals(&ancestors);
    let entries = ancestors
        .into_iter()
        .map(|ancestor| {
            let payments = txn.list_payments_for(&ancestor.id)?;
            Ok(AncestorEntry {
                order: ancestor,
                payments,
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(SittingView {
        order: order.clone(),
        ancestors: entries,
        previous_paid_total,
    })
}

fn sum_totals(orders: &[Order]) -> f64 {
    let sum = orders
        .iter()
        .fold(Decimal::ZERO, |acc, o| acc + money::to_decimal(o.total));
    money::to_f64(sum)
}
