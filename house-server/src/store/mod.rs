//! Transactional store seam
//!
//! The engine is written against [`Store`] / [`StoreTxn`] so the durable
//! backend is pluggable. Every multi-row mutation in the engine is a single
//! [`Store::transaction`] call: a concurrent reader never observes a
//! half-updated order/table pair, and a returned error rolls the whole
//! mutation back.
//!
//! [`memory::MemStore`] is the in-process implementation used by the binary
//! and the test suite.

pub mod memory;

pub use memory::MemStore;

use shared::error::{DomainError, DomainResult};
use shared::models::{MenuItem, Order, PaymentTransaction, Reservation, Table};

/// Row-level operations available inside a transaction.
///
/// Order items are embedded in their owning [`Order`]; payments and
/// reservations are keyed by id.
pub trait StoreTxn {
    // ==================== Tables ====================

    fn get_table(&self, number: u32) -> DomainResult<Option<Table>>;
    fn list_tables(&self) -> DomainResult<Vec<Table>>;
    /// Insert a new table; duplicate numbers are a conflict.
    fn insert_table(&mut self, table: Table) -> DomainResult<()>;
    /// Replace an existing table row.
    fn update_table(&mut self, table: Table) -> DomainResult<()>;

    // ==================== Menu ====================

    fn get_menu_item(&self, id: &str) -> DomainResult<Option<MenuItem>>;
    fn insert_menu_item(&mut self, item: MenuItem) -> DomainResult<()>;

    // ==================== Orders ====================

    fn get_order(&self, id: &str) -> DomainResult<Option<Order>>;
    fn list_orders(&self) -> DomainResult<Vec<Order>>;
    fn insert_order(&mut self, order: Order) -> DomainResult<()>;
    fn update_order(&mut self, order: Order) -> DomainResult<()>;
    fn delete_order(&mut self, id: &str) -> DomainResult<()>;
    /// Next value of the sequential human-facing order number.
    fn next_order_number(&mut self) -> DomainResult<u64>;

    // ==================== Payments ====================

    fn get_payment(&self, id: &str) -> DomainResult<Option<PaymentTransaction>>;
    fn list_payments_for(&self, order_id: &str) -> DomainResult<Vec<PaymentTransaction>>;
    fn insert_payment(&mut self, txn: PaymentTransaction) -> DomainResult<()>;
    fn update_payment(&mut self, txn: PaymentTransaction) -> DomainResult<()>;

    // ==================== Reservations ====================

    fn get_reservation(&self, id: &str) -> DomainResult<Option<Reservation>>;
    fn list_reservations(&self) -> DomainResult<Vec<Reservation>>;
    fn insert_reservation(&mut self, reservation: Reservation) -> DomainResult<()>;
    fn update_reservation(&mut self, reservation: Reservation) -> DomainResult<()>;
}

/// Transactional store.
pub trait Store: Send + Sync + 'static {
    type Txn: StoreTxn;

    /// Run `f` atomically: commit on `Ok`, discard every write on `Err`.
    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Self::Txn) -> DomainResult<T>,
    ) -> DomainResult<T>;
}

// ==================== Lookup helpers ====================

/// Load a table or fail with `NotFound`.
pub fn require_table(txn: &impl StoreTxn, number: u32) -> DomainResult<Table> {
    txn.get_table(number)?
        .ok_or_else(|| DomainError::not_found(format!("table {number}")))
}

/// Load an order or fail with `NotFound`.
pub fn require_order(txn: &impl StoreTxn, id: &str) -> DomainResult<Order> {
    txn.get_order(id)?
        .ok_or_else(|| DomainError::not_found(format!("order {id}")))
}

/// Load a menu item or fail with `NotFound`.
pub fn require_menu_item(txn: &impl StoreTxn, id: &str) -> DomainResult<MenuItem> {
    txn.get_menu_item(id)?
        .ok_or_else(|| DomainError::not_found(format!("menu item {id}")))
}

/// Load a reservation or fail with `NotFound`.
pub fn require_reservation(txn: &impl StoreTxn, id: &str) -> DomainResult<Reservation> {
    txn.get_reservation(id)?
        .ok_or_else(|| DomainError::not_found(format!("reservation {id}")))
}

/// Load a payment transaction or fail with `NotFound`.
pub fn require_payment(txn: &impl StoreTxn, id: &str) -> DomainResult<PaymentTransaction> {
    txn.get_payment(id)?
        .ok_or_else(|| DomainError::not_found(format!("payment transaction {id}")))
}
