//! In-process store
//!
//! State lives behind a `parking_lot::RwLock`; a transaction clones the
//! state, applies the closure to the clone and swaps it back on success.
//! An `Err` from the closure discards the clone, which gives the same
//! all-or-nothing guarantee a relational store provides.

use super::{Store, StoreTxn};
use parking_lot::RwLock;
use shared::error::{DomainError, DomainResult};
use shared::models::{MenuItem, Order, PaymentTransaction, Reservation, Table};
use std::collections::HashMap;

/// Whole-store state; also the transaction handle.
#[derive(Debug, Clone, Default)]
pub struct MemState {
    tables: HashMap<u32, Table>,
    menu_items: HashMap<String, MenuItem>,
    orders: HashMap<String, Order>,
    payments: HashMap<String, PaymentTransaction>,
    reservations: HashMap<String, Reservation>,
    order_counter: u64,
}

/// In-process [`Store`] implementation.
#[derive(Debug, Default)]
pub struct MemStore {
    state: RwLock<MemState>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemStore {
    type Txn = MemState;

    fn transaction<T>(&self, f: impl FnOnce(&mut MemState) -> DomainResult<T>) -> DomainResult<T> {
        let mut guard = self.state.write();
        let mut draft = guard.clone();
        let value = f(&mut draft)?;
        *guard = draft;
        Ok(value)
    }
}

impl StoreTxn for MemState {
    // ==================== Tables ====================

    fn get_table(&self, number: u32) -> DomainResult<Option<Table>> {
        Ok(self.tables.get(&number).cloned())
    }

    fn list_tables(&self) -> DomainResult<Vec<Table>> {
        let mut tables: Vec<Table> = self.tables.values().cloned().collect();
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    fn insert_table(&mut self, table: Table) -> DomainResult<()> {
        if self.tables.contains_key(&table.number) {
            return Err(DomainError::conflict(format!(
                "table {} already exists",
                table.number
            )));
        }
        self.tables.insert(table.number, table);
        Ok(())
    }

    fn update_table(&mut self, table: Table) -> DomainResult<()> {
        match self.tables.get_mut(&table.number) {
            Some(slot) => {
                *slot = table;
                Ok(())
            }
            None => Err(DomainError::not_found(format!("table {}", table.number))),
        }
    }

    // ==================== Menu ====================

    fn get_menu_item(&self, id: &str) -> DomainResult<Option<MenuItem>> {
        Ok(self.menu_items.get(id).cloned())
    }

    fn insert_menu_item(&mut self, item: MenuItem) -> DomainResult<()> {
        self.menu_items.insert(item.id.clone(), item);
        Ok(())
    }

    // ==================== Orders ====================

    fn get_order(&self, id: &str) -> DomainResult<Option<Order>> {
        Ok(self.orders.get(id).cloned())
    }

    fn list_orders(&self) -> DomainResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.values().cloned().collect();
        orders.sort_by_key(|o| o.order_number);
        Ok(orders)
    }

    fn insert_order(&mut self, order: Order) -> DomainResult<()> {
        self.orders.insert(order.id.clone(), order);
        Ok(())
    }

    fn update_order(&mut self, order: Order) -> DomainResult<()> {
        match self.orders.get_mut(&order.id) {
            Some(slot) => {
                *slot = order;
                Ok(())
            }
            None => Err(DomainError::not_found(format!("order {}", order.id))),
        }
    }

    fn delete_order(&mut self, id: &str) -> DomainResult<()> {
        self.orders
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))
    }

    fn next_order_number(&mut self) -> DomainResult<u64> {
        self.order_counter += 1;
        Ok(self.order_counter)
    }

    // ==================== Payments ====================

    fn get_payment(&self, id: &str) -> DomainResult<Option<PaymentTransaction>> {
        Ok(self.payments.get(id).cloned())
    }

    fn list_payments_for(&self, order_id: &str) -> DomainResult<Vec<PaymentTransaction>> {
        let mut payments: Vec<PaymentTransaction> = self
            .payments
            .values()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.created_at);
        Ok(payments)
    }

    fn insert_payment(&mut self, txn: PaymentTransaction) -> DomainResult<()> {
        self.payments.insert(txn.id.clone(), txn);
        Ok(())
    }

    fn update_payment(&mut self, txn: PaymentTransaction) -> DomainResult<()> {
        match self.payments.get_mut(&txn.id) {
            Some(slot) => {
                *slot = txn;
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "payment transaction {}",
                txn.id
            ))),
        }
    }

    // ==================== Reservations ====================

    fn get_reservation(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(id).cloned())
    }

    fn list_reservations(&self) -> DomainResult<Vec<Reservation>> {
        let mut reservations: Vec<Reservation> = self.reservations.values().cloned().collect();
        reservations.sort_by(|a, b| (&a.date, &a.start_time).cmp(&(&b.date, &b.start_time)));
        Ok(reservations)
    }

    fn insert_reservation(&mut self, reservation: Reservation) -> DomainResult<()> {
        self.reservations.insert(reservation.id.clone(), reservation);
        Ok(())
    }

    fn update_reservation(&mut self, reservation: Reservation) -> DomainResult<()> {
        match self.reservations.get_mut(&reservation.id) {
            Some(slot) => {
                *slot = reservation;
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "reservation {}",
                reservation.id
            ))),
        }
    }
}
