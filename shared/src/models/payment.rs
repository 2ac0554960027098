//! Payment Transaction Model
//!
//! Append-only ledger. A refund never deletes a row, it flips `status` so
//! audit history is preserved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    /// Normalize an external method token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "upi" => Some(Self::Upi),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
            Self::Upi => write!(f, "upi"),
        }
    }
}

/// Payment transaction status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Completed,
    Refunded,
}

/// Ledger entry for one payment against one order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentTransaction {
    pub id: String,
    pub order_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Unix millis
    pub created_at: i64,
}

impl PaymentTransaction {
    pub fn new(order_id: impl Into<String>, amount: f64, method: PaymentMethod) -> Self {
        Self {
            id: crate::util::new_id(),
            order_id: order_id.into(),
            amount,
            method,
            status: PaymentStatus::Completed,
            created_at: crate::util::now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_tokens() {
        assert_eq!(PaymentMethod::from_token("CASH"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::from_token("upi"), Some(PaymentMethod::Upi));
        assert_eq!(PaymentMethod::from_token("cheque"), None);
    }

    #[test]
    fn test_new_transaction_is_completed() {
        let t = PaymentTransaction::new("o-1", 12.5, PaymentMethod::Card);
        assert_eq!(t.status, PaymentStatus::Completed);
        assert_eq!(t.order_id, "o-1");
    }
}
