//! Shared types for the front-of-house engine
//!
//! Domain models, typed errors and domain events used by the engine crate
//! and by any transport adapter (socket bridge, printer, admin console).

pub mod error;
pub mod event;
pub mod models;
pub mod util;

// Re-exports
pub use error::{DomainError, DomainResult};
pub use event::{DomainEvent, NotificationLevel};
pub use serde::{Deserialize, Serialize};
