//! Domain events
//!
//! Every mutating operation in the engine returns the events to publish;
//! a thin adapter performs the actual broadcast. Payloads are denormalized
//! (order with items, table with group and reservation metadata) so
//! subscribers never need a follow-up read.

use crate::models::{Order, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Notification Level ====================

/// Notification severity shown to staff clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ==================== Domain Events ====================

/// Broadcast event, one variant per wire topic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DomainEvent {
    OrderCreated {
        order: Order,
    },
    OrderUpdated {
        order: Order,
    },
    OrderStatusChanged {
        order: Order,
    },
    OrderDeleted {
        order_id: String,
        table_number: Option<u32>,
    },
    TableStatusChanged {
        table: Table,
    },
    Notification {
        /// Staff id the notification is addressed to
        recipient: String,
        level: NotificationLevel,
        title: String,
        message: String,
    },
}

impl DomainEvent {
    /// Wire topic for the pub/sub broadcaster.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::OrderCreated { .. } => "order:created",
            Self::OrderUpdated { .. } => "order:updated",
            Self::OrderStatusChanged { .. } => "order:status-changed",
            Self::OrderDeleted { .. } => "order:deleted",
            Self::TableStatusChanged { .. } => "table:status-changed",
            Self::Notification { .. } => "notification:new",
        }
    }

    /// Convenience constructor for a staff notification.
    pub fn notify(
        recipient: impl Into<String>,
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Notification {
            recipient: recipient.into(),
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics() {
        let e = DomainEvent::OrderDeleted {
            order_id: "o-1".to_string(),
            table_number: Some(3),
        };
        assert_eq!(e.topic(), "order:deleted");

        let n = DomainEvent::notify("staff-1", NotificationLevel::Info, "Ready", "Order 12 ready");
        assert_eq!(n.topic(), "notification:new");
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let e = DomainEvent::OrderDeleted {
            order_id: "o-1".to_string(),
            table_number: None,
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"type\":\"OrderDeleted\""));
    }
}
