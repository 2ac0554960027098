//! Reservation Book
//!
//! Creation, check-in and cancellation of table reservations. Time fields
//! are stored as plain strings ("YYYY-MM-DD" date, "HH:MM" local times) and
//! parsed only where a comparison is needed; the background
//! [`scheduler::ReservationScheduler`] handles table activation and
//! auto-expiry.

pub mod scheduler;

pub use scheduler::ReservationScheduler;

use crate::events::{EventSender, publish_all};
use crate::store::{Store, StoreTxn, require_reservation, require_table};
use chrono::NaiveTime;
use shared::DomainEvent;
use shared::error::{DomainError, DomainResult};
use shared::models::{Reservation, ReservationStatus, TableStatus};
use std::sync::Arc;

pub struct Reservations<S: Store> {
    store: Arc<S>,
    event_tx: EventSender,
}

pub(crate) fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Two half-open [start, end) windows overlap.
fn windows_overlap(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && b_start < a_end
}

impl<S: Store> Reservations<S> {
    pub fn new(store: Arc<S>, event_tx: EventSender) -> Self {
        Self { store, event_tx }
    }

    /// Book a table. Rejected when the window overlaps another live
    /// (pending or checked-in) reservation on the same table and date.
    pub fn create(&self, reservation: Reservation) -> DomainResult<Reservation> {
        let start = parse_time(&reservation.start_time).ok_or_else(|| {
            DomainError::invalid_state(format!("bad start time '{}'", reservation.start_time))
        })?;
        let end = parse_time(&reservation.end_time).ok_or_else(|| {
            DomainError::invalid_state(format!("bad end time '{}'", reservation.end_time))
        })?;
        if start >= end {
            return Err(DomainError::invalid_state(
                "reservation must end after it starts".to_string(),
            ));
        }

        self.store.transaction(|txn| {
            require_table(txn, reservation.table_number)?;
            for other in txn.list_reservations()? {
                if other.table_number != reservation.table_number
                    || other.date != reservation.date
                    || !matches!(
                        other.status,
                        ReservationStatus::Pending | ReservationStatus::CheckedIn
                    )
                {
                    continue;
                }
                let (Some(other_start), Some(other_end)) =
                    (parse_time(&other.start_time), parse_time(&other.end_time))
                else {
                    continue;
                };
                if windows_overlap(start, end, other_start, other_end) {
                    return Err(DomainError::conflict(format!(
                        "table {} is already reserved {}-{} on {}",
                        other.table_number, other.start_time, other.end_time, other.date
                    )));
                }
            }
            txn.insert_reservation(reservation.clone())?;
            tracing::info!(
                reservation_id = %reservation.id,
                table = reservation.table_number,
                "reservation created"
            );
            Ok(reservation.clone())
        })
    }

    pub fn list(&self) -> DomainResult<Vec<Reservation>> {
        self.store.transaction(|txn| txn.list_reservations())
    }

    /// Seat the party: the reservation becomes checked-in and its table
    /// occupied, atomically.
    pub fn check_in(&self, reservation_id: &str) -> DomainResult<Reservation> {
        let (reservation, table) = self.store.transaction(|txn| {
            let mut reservation = require_reservation(txn, reservation_id)?;
            if reservation.status != ReservationStatus::Pending {
                return Err(DomainError::invalid_state(format!(
                    "reservation {reservation_id} is not pending"
                )));
            }
            let mut table = require_table(txn, reservation.table_number)?;
            if table.status == TableStatus::Occupied {
                return Err(DomainError::conflict(format!(
                    "table {} is occupied",
                    table.number
                )));
            }

            reservation.status = ReservationStatus::CheckedIn;
            txn.update_reservation(reservation.clone())?;
            table.status = TableStatus::Occupied;
            table.clear_reservation();
            txn.update_table(table.clone())?;
            Ok((reservation, table))
        })?;

        tracing::info!(reservation_id = %reservation.id, table = table.number, "checked in");
        publish_all(&self.event_tx, vec![DomainEvent::TableStatusChanged { table }]);
        Ok(reservation)
    }

    /// Cancel a pending reservation, releasing the table if it was being
    /// held for this party.
    pub fn cancel(&self, reservation_id: &str) -> DomainResult<Reservation> {
        let (reservation, table) = self.store.transaction(|txn| {
            let mut reservation = require_reservation(txn, reservation_id)?;
            if reservation.status != ReservationStatus::Pending {
                return Err(DomainError::invalid_state(format!(
                    "reservation {reservation_id} is not pending"
                )));
            }
            reservation.status = ReservationStatus::Cancelled;
            txn.update_reservation(reservation.clone())?;

            let mut table = require_table(txn, reservation.table_number)?;
            let held_for_party =
                table.reserved_by.as_deref() == Some(reservation.customer_name.as_str());
            if held_for_party {
                table.clear_reservation();
                if table.status == TableStatus::Reserved {
                    table.status = TableStatus::Free;
                }
                txn.update_table(table.clone())?;
                return Ok((reservation, Some(table)));
            }
            Ok((reservation, None))
        })?;

        if let Some(table) = table {
            publish_all(&self.event_tx, vec![DomainEvent::TableStatusChanged { table }]);
        }
        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_channel;
    use crate::store::MemStore;
    use shared::models::Table;

    fn setup() -> Reservations<MemStore> {
        let store = Arc::new(MemStore::new());
        store
            .transaction(|txn| {
                txn.insert_table(Table::new(1, 4))?;
                txn.insert_table(Table::new(2, 2))
            })
            .unwrap();
        let (tx, _rx) = event_channel();
        Reservations::new(store, tx)
    }

    fn booking(table: u32, start: &str, end: &str) -> Reservation {
        Reservation::new(table, "Ana", "555-0100", "2026-08-23", start, end)
    }

    #[test]
    fn test_create_and_list() {
        let reservations = setup();
        reservations.create(booking(1, "18:00", "19:00")).unwrap();
        reservations.create(booking(2, "18:00", "19:00")).unwrap();
        assert_eq!(reservations.list().unwrap().len(), 2);
    }

    #[test]
    fn test_overlapping_window_rejected() {
        let reservations = setup();
        reservations.create(booking(1, "18:00", "19:00")).unwrap();

        assert!(matches!(
            reservations.create(booking(1, "18:30", "19:30")),
            Err(DomainError::Conflict(_))
        ));
        // back to back is fine
        reservations.create(booking(1, "19:00", "20:00")).unwrap();
        // cancelled reservations do not block
        let second = reservations.create(booking(2, "18:00", "19:00")).unwrap();
        reservations.cancel(&second.id).unwrap();
        reservations.create(booking(2, "18:15", "18:45")).unwrap();
    }

    #[test]
    fn test_inverted_window_rejected() {
        let reservations = setup();
        assert!(matches!(
            reservations.create(booking(1, "19:00", "18:00")),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_check_in_occupies_table() {
        let reservations = setup();
        let reservation = reservations.create(booking(1, "18:00", "19:00")).unwrap();
        let checked_in = reservations.check_in(&reservation.id).unwrap();
        assert_eq!(checked_in.status, ReservationStatus::CheckedIn);

        let table = reservations
            .store
            .transaction(|txn| require_table(txn, 1))
            .unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.reserved_by, None);

        // second check-in is no longer pending
        assert!(matches!(
            reservations.check_in(&reservation.id),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_check_in_rejected_when_table_occupied() {
        let reservations = setup();
        let reservation = reservations.create(booking(1, "18:00", "19:00")).unwrap();
        reservations
            .store
            .transaction(|txn| {
                let mut table = require_table(txn, 1)?;
                table.status = TableStatus::Occupied;
                txn.update_table(table)
            })
            .unwrap();

        let result = reservations.check_in(&reservation.id);
        assert!(matches!(result, Err(DomainError::Conflict(_))));
        let row = reservations
            .store
            .transaction(|txn| require_reservation(txn, &reservation.id))
            .unwrap();
        assert_eq!(row.status, ReservationStatus::Pending, "rolled back");
    }

    #[test]
    fn test_cancel_releases_held_table() {
        let reservations = setup();
        let reservation = reservations.create(booking(1, "18:00", "19:00")).unwrap();
        reservations
            .store
            .transaction(|txn| {
                let mut table = require_table(txn, 1)?;
                table.status = TableStatus::Reserved;
                table.reserved_by = Some("Ana".to_string());
                table.reserved_time = Some("18:00".to_string());
                txn.update_table(table)
            })
            .unwrap();

        let cancelled = reservations.cancel(&reservation.id).unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        let table = reservations
            .store
            .transaction(|txn| require_table(txn, 1))
            .unwrap();
        assert_eq!(table.status, TableStatus::Free);
        assert_eq!(table.reserved_by, None);
    }

    #[test]
    fn test_cancel_leaves_table_held_for_someone_else() {
        let reservations = setup();
        let reservation = reservations.create(booking(1, "18:00", "19:00")).unwrap();
        reservations
            .store
            .transaction(|txn| {
                let mut table = require_table(txn, 1)?;
                table.status = TableStatus::Reserved;
                table.reserved_by = Some("Ben".to_string());
                txn.update_table(table)
            })
            .unwrap();

        reservations.cancel(&reservation.id).unwrap();
        let table = reservations
            .store
            .transaction(|txn| require_table(txn, 1))
            .unwrap();
        assert_eq!(table.status, TableStatus::Reserved);
        assert_eq!(table.reserved_by.as_deref(), Some("Ben"));
    }
}
