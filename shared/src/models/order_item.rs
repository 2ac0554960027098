//! Order Item Model

use serde::{Deserialize, Serialize};

/// Order item status
///
/// Transitions among these values are free at the item level; the order-level
/// propagation rules live in the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl ItemStatus {
    /// Normalize an external status token into the closed enum.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "preparing" | "in-progress" => Some(Self::Preparing),
            "ready" => Some(Self::Ready),
            "served" => Some(Self::Served),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Selected modifier snapshot (price captured at order time)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemModifier {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// Order line item
///
/// Owned exclusively by one order at a time. Split/merge transfer ownership;
/// a partial-quantity split creates a new item under the target order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    /// Name snapshot at order time
    pub name: String,
    /// List price plus the sum of selected modifier prices
    pub unit_price: f64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ItemModifier>,
}

impl OrderItem {
    /// Clone this line under a new id with the given quantity.
    ///
    /// Used by partial-quantity splits; status and notes carry over.
    pub fn duplicate_with_quantity(&self, quantity: u32) -> Self {
        Self {
            id: crate::util::new_id(),
            quantity,
            ..self.clone()
        }
    }
}

/// Input line for creating an order or adding items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ItemModifier>,
}

/// One line of a split request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitItem {
    pub item_id: String,
    pub quantity: u32,
}
