//! Menu Item Model
//!
//! Catalog editing is out of scope for the engine; this model exists so
//! availability and price lookups at order time are typed.

use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// List price per unit
    pub price: f64,
    /// Unavailable items are rejected at order time
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            available: true,
            category: None,
        }
    }
}
