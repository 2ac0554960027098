//! Payment Ledger
//!
//! Records payment transactions against orders and decides when an order is
//! settled. Settlement is judged over the whole sitting: the amount due is
//! the session total (current order plus every chained ancestor) minus all
//! non-refunded payments anywhere in the chain, compared within the money
//! tolerance. Refunds flip the transaction row only; an order once settled
//! stays settled.

use crate::events::{EventSender, publish_all};
use crate::orders::{chain, money};
use crate::store::{Store, StoreTxn, require_order, require_payment};
use rust_decimal::Decimal;
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::{Order, PaymentMethod, PaymentStatus, PaymentTransaction};
use std::sync::Arc;

pub struct PaymentLedger<S: Store> {
    store: Arc<S>,
    event_tx: EventSender,
}

impl<S: Store> PaymentLedger<S> {
    pub fn new(store: Arc<S>, event_tx: EventSender) -> Self {
        Self { store, event_tx }
    }

    /// Record a payment against an order.
    ///
    /// The order flips to paid once cumulative non-refunded payments cover
    /// the session total within [`money::MONEY_TOLERANCE`]. Overpayment is
    /// accepted and recorded as given.
    pub fn record_payment(
        &self,
        order_id: &str,
        amount: f64,
        method_token: &str,
    ) -> DomainResult<PaymentTransaction> {
        money::validate_payment_amount(amount)?;
        let method = PaymentMethod::from_token(method_token).ok_or_else(|| {
            DomainError::invalid_state(format!("illegal payment method '{method_token}'"))
        })?;

        let (payment, events) = self.store.transaction(|txn| {
            let mut order = require_order(txn, order_id)?;
            if order.is_paid {
                return Err(DomainError::invalid_state(format!(
                    "order {order_id} is already paid"
                )));
            }

            let payment = PaymentTransaction::new(order.id.clone(), amount, method);
            txn.insert_payment(payment.clone())?;

            let session_total = money::to_decimal(order.total)
                + money::to_decimal(chain::previous_paid_total(txn, &order)?);
            let paid = settled_amount(txn, &order)?;

            let mut events = Vec::new();
            if paid + money::MONEY_TOLERANCE >= session_total {
                order.is_paid = true;
                order.payment_method = Some(method);
                txn.update_order(order.clone())?;
                tracing::info!(order_id = %order.id, %method, "order settled");
            }
            events.push(DomainEvent::OrderUpdated { order });
            Ok((payment, events))
        })?;

        publish_all(&self.event_tx, events);
        Ok(payment)
    }

    /// Mark a completed transaction refunded.
    ///
    /// A settled order is not reopened; the refund only changes the ledger
    /// row and the amount a later inspection reports as paid.
    pub fn refund(&self, transaction_id: &str) -> DomainResult<PaymentTransaction> {
        let (payment, order) = self.store.transaction(|txn| {
            let mut payment = require_payment(txn, transaction_id)?;
            if payment.status == PaymentStatus::Refunded {
                return Err(DomainError::invalid_state(format!(
                    "payment transaction {transaction_id} is already refunded"
                )));
            }
            payment.status = PaymentStatus::Refunded;
            txn.update_payment(payment.clone())?;
            let order = require_order(txn, &payment.order_id)?;
            Ok((payment, order))
        })?;

        tracing::info!(transaction_id = %payment.id, order_id = %order.id, "payment refunded");
        publish_all(&self.event_tx, vec![DomainEvent::OrderUpdated { order }]);
        Ok(payment)
    }

    /// Payment history of one order (refunded rows included).
    pub fn list_payments(&self, order_id: &str) -> DomainResult<Vec<PaymentTransaction>> {
        self.store
            .transaction(|txn| txn.list_payments_for(order_id))
    }

    /// Remaining balance on the sitting the order belongs to. Never
    /// negative; an overpaid sitting reports zero.
    pub fn amount_due(&self, order_id: &str) -> DomainResult<f64> {
        self.store.transaction(|txn| {
            let order = require_order(txn, order_id)?;
            let session_total = money::to_decimal(order.total)
                + money::to_decimal(chain::previous_paid_total(txn, &order)?);
            let due = session_total - settled_amount(txn, &order)?;
            Ok(money::to_f64(due.max(Decimal::ZERO)))
        })
    }
}

/// Sum of non-refunded payments across the order and its ancestors.
fn settled_amount(txn: &impl StoreTxn, order: &Order) -> DomainResult<Decimal> {
    let mut sum = Decimal::ZERO;
    let mut orders = chain::collect_ancestors(txn, order)?;
    orders.push(order.clone());
    for o in &orders {
        for payment in txn.list_payments_for(&o.id)? {
            if payment.status != PaymentStatus::Refunded {
                sum += money::to_decimal(payment.amount);
            }
        }
    }
    Ok(sum)
}
