//! Data models
//!
//! Shared between the engine crate and transport adapters. All monetary
//! amounts are `f64` rounded to 2 decimals; arithmetic on them goes through
//! the engine's money module, never raw float math.

pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod reservation;
pub mod table;

// Re-exports
pub use menu_item::*;
pub use order::*;
pub use order_item::*;
pub use payment::*;
pub use reservation::*;
pub use table::*;
