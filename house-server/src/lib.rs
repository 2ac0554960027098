//! Front-of-House Engine
//!
//! Real-time engine for a restaurant floor: tables, orders, payments and
//! reservations kept consistent across waiter, kitchen and admin clients.
//!
//! # Module structure
//!
//! ```text
//! house-server/src/
//! ├── config.rs       # Env-driven configuration
//! ├── logger.rs       # tracing setup
//! ├── store/          # Transactional store seam + in-process implementation
//! ├── orders/         # Order engine (actions, money, sitting chain)
//! ├── tables/         # Table coordinator (grouping, occupancy)
//! ├── payments/       # Payment ledger (partial payments, refunds)
//! └── reservations/   # Reservation ops + activation/expiry scheduler
//! ```
//!
//! Every mutating operation runs inside a single store transaction and
//! returns the domain events to broadcast; publishing is fire-and-forget so
//! an unavailable subscriber can never fail a mutation.

pub mod config;
pub mod events;
pub mod logger;
pub mod orders;
pub mod payments;
pub mod reservations;
pub mod store;
pub mod tables;

// Re-export public types
pub use config::Config;
pub use orders::OrderEngine;
pub use payments::PaymentLedger;
pub use reservations::{ReservationScheduler, Reservations};
pub use store::{MemStore, Store, StoreTxn};
pub use tables::TableCoordinator;
