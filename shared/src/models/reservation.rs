//! Reservation Model

use serde::{Deserialize, Serialize};

/// Reservation lifecycle status
///
/// Created `Pending`; `CheckedIn` and `Cancelled` via explicit staff action;
/// `Expired` automatically once the grace period elapses past `end_time`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Pending,
    CheckedIn,
    Expired,
    Cancelled,
}

/// Reservation entity
///
/// `date` is "YYYY-MM-DD", `start_time`/`end_time` are local "HH:MM" strings;
/// the scheduler parses them at tick time and skips unparseable rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub table_number: u32,
    pub customer_name: String,
    pub customer_phone: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn new(
        table_number: u32,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::util::new_id(),
            table_number,
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            status: ReservationStatus::Pending,
        }
    }
}
