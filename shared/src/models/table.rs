//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Free,
    Occupied,
    Reserved,
}

impl TableStatus {
    /// Normalize an external status token into the closed enum.
    ///
    /// The only place tokens are mapped; handlers must not infer ad hoc.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "free" | "available" => Some(Self::Free),
            "occupied" => Some(Self::Occupied),
            "reserved" => Some(Self::Reserved),
            _ => None,
        }
    }
}

/// Dining table entity
///
/// `number` is the unique business key used by staff; `id`-less on purpose.
/// A table with `group_id` set and `is_primary = false` never directly owns
/// an order; ordering goes through the primary table of its group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub number: u32,
    pub capacity: u32,
    pub status: TableStatus,
    /// Shared by physically combined tables; None when ungrouped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Meaningful only when grouped
    #[serde(default)]
    pub is_primary: bool,
    /// Owning reference to the active order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
    /// Reservation metadata, informational only (not authoritative for status)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_time: Option<String>,
}

impl Table {
    pub fn new(number: u32, capacity: u32) -> Self {
        Self {
            number,
            capacity,
            status: TableStatus::Free,
            group_id: None,
            is_primary: false,
            current_order_id: None,
            reserved_by: None,
            reserved_time: None,
        }
    }

    /// Whether this table is a grouped, non-primary member.
    pub fn is_grouped_secondary(&self) -> bool {
        self.group_id.is_some() && !self.is_primary
    }

    /// Clear reservation metadata (on check-in, expiry or cancel).
    pub fn clear_reservation(&mut self) {
        self.reserved_by = None;
        self.reserved_time = None;
    }
}

/// Update payload for direct table edits (admin surface)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TableUpdate {
    pub capacity: Option<u32>,
    pub status: Option<TableStatus>,
    pub reserved_by: Option<Option<String>>,
    pub reserved_time: Option<Option<String>>,
}
