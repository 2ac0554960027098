//! Order Engine
//!
//! Owns order creation, item mutation, total/discount computation, sitting
//! chaining, split and merge. Every operation validates and writes inside a
//! single store transaction, then broadcasts the resulting events.
//!
//! ```text
//! operation → transaction(validate + mutate) → commit → broadcast events
//! ```

pub mod actions;
pub mod chain;
pub mod engine;
pub mod money;

pub use actions::create_order::CreateOrderInput;
pub use actions::modify_item::ItemChanges;
pub use chain::{AncestorEntry, SittingView};
pub use engine::OrderEngine;
