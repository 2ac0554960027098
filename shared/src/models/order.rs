//! Order Model

use super::order_item::OrderItem;
use super::payment::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// `Cancelled` is the only hard terminal state for item mutation: adding
/// items to a served/delivered order resets it to `Pending` (new items need
/// re-fulfilment), a deliberate policy carried over from the floor workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Normalize an external status token into the closed enum.
    ///
    /// Single mapping table for every boundary; `"in-progress"` and
    /// `"completed"` are legacy client tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "preparing" | "in-progress" => Some(Self::Preparing),
            "ready" => Some(Self::Ready),
            "served" => Some(Self::Served),
            "delivered" | "completed" => Some(Self::Delivered),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Discount kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// Percentage of the order subtotal, clamped to [0, 100]
    Percentage,
    /// Flat amount, clamped so the total never goes below 0
    Amount,
}

/// Discount settings attached to an order
///
/// Applied to the pre-tax subtotal of the order's own items only, never to
/// ancestor orders in the same sitting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: f64,
}

/// Order entity
///
/// `total` always equals the discount-adjusted sum of its own `items`; it
/// never includes ancestor totals (those are computed on demand by walking
/// `parent_order_id`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// None for non-dine-in (takeout) orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    /// Sequential, human-facing
    pub order_number: u64,
    pub status: OrderStatus,
    /// Derived, 2-decimal
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub hold_status: bool,
    /// Links to the order that preceded it in the same dining sitting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_order_id: Option<String>,
    /// Staff id of the creator (notification recipient)
    pub created_by: String,
    pub items: Vec<OrderItem>,
    /// Unix millis
    pub created_at: i64,
}

impl Order {
    /// Items that still count toward fulfilment and totals.
    pub fn active_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items
            .iter()
            .filter(|i| i.status != super::order_item::ItemStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_tokens() {
        assert_eq!(
            OrderStatus::from_token("in-progress"),
            Some(OrderStatus::Preparing)
        );
        assert_eq!(
            OrderStatus::from_token("COMPLETED"),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(
            OrderStatus::from_token("canceled"),
            Some(OrderStatus::Cancelled)
        );
        assert_eq!(OrderStatus::from_token("paid"), None);
    }
}
