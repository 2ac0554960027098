//! Reservation scheduler
//!
//! Background task that drives time-based reservation behavior:
//!
//! * activation: once a pending reservation's window opens and its table is
//!   still free, the table flips to reserved and is annotated with the
//!   party's name and start time (the reservation row itself stays pending
//!   until staff check the party in)
//! * expiry: once the window's end plus a configurable grace period has
//!   passed, the reservation expires and any hold on the table is released
//!
//! Each reservation is handled in its own transaction so one bad row never
//! blocks the rest; rows with unparseable date or time fields are logged and
//! skipped.

use crate::config::Config;
use crate::events::{EventSender, publish_all};
use crate::store::{Store, StoreTxn, require_reservation, require_table};
use chrono::{DateTime, Duration, Local, NaiveDate};
use shared::DomainEvent;
use shared::error::DomainResult;
use shared::models::{Reservation, ReservationStatus, TableStatus};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct ReservationScheduler<S: Store> {
    store: Arc<S>,
    event_tx: EventSender,
    grace_period: Duration,
    tick_interval: std::time::Duration,
}

impl<S: Store> ReservationScheduler<S> {
    pub fn new(store: Arc<S>, event_tx: EventSender, config: &Config) -> Self {
        Self {
            store,
            event_tx,
            grace_period: Duration::minutes(config.grace_period_minutes),
            tick_interval: std::time::Duration::from_secs(config.reservation_tick_secs),
        }
    }

    /// Run until cancelled. One tick fires immediately on start.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick_interval);
        tracing::info!(
            interval_secs = self.tick_interval.as_secs(),
            "reservation scheduler started"
        );
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("reservation scheduler stopped");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.tick(Local::now()) {
                        tracing::error!(error = %e, "reservation tick failed");
                    }
                }
            }
        }
    }

    /// One pass over all pending reservations at clock time `now`.
    ///
    /// `now` is injected so the pass is deterministic under test. The pass is
    /// idempotent: re-running it at the same instant changes nothing.
    pub fn tick(&self, now: DateTime<Local>) -> DomainResult<()> {
        let pending: Vec<Reservation> = self
            .store
            .transaction(|txn| txn.list_reservations())?
            .into_iter()
            .filter(|r| r.status == ReservationStatus::Pending)
            .collect();

        for reservation in pending {
            let Some(window) = parse_window(&reservation) else {
                tracing::warn!(
                    reservation_id = %reservation.id,
                    date = %reservation.date,
                    "skipping reservation with unparseable date or time"
                );
                continue;
            };

            let outcome = if now.naive_local() > window.end + self.grace_period {
                self.expire(&reservation)
            } else if now.naive_local() >= window.start && now.naive_local() < window.end {
                self.activate(&reservation)
            } else {
                Ok(())
            };
            if let Err(e) = outcome {
                tracing::error!(reservation_id = %reservation.id, error = %e, "reservation pass failed");
            }
        }
        Ok(())
    }

    /// Hold the table for the arriving party if it is still free.
    fn activate(&self, reservation: &Reservation) -> DomainResult<()> {
        let events = self.store.transaction(|txn| {
            let mut table = require_table(txn, reservation.table_number)?;
            if table.status != TableStatus::Free {
                return Ok(vec![]);
            }
            table.status = TableStatus::Reserved;
            table.reserved_by = Some(reservation.customer_name.clone());
            table.reserved_time = Some(reservation.start_time.clone());
            txn.update_table(table.clone())?;
            tracing::info!(
                reservation_id = %reservation.id,
                table = table.number,
                "table held for reservation"
            );
            Ok(vec![DomainEvent::TableStatusChanged { table }])
        })?;
        publish_all(&self.event_tx, events);
        Ok(())
    }

    /// Expire an overdue reservation and release any hold on its table.
    fn expire(&self, reservation: &Reservation) -> DomainResult<()> {
        let events = self.store.transaction(|txn| {
            let mut row = require_reservation(txn, &reservation.id)?;
            if row.status != ReservationStatus::Pending {
                return Ok(vec![]);
            }
            row.status = ReservationStatus::Expired;
            txn.update_reservation(row)?;
            tracing::info!(reservation_id = %reservation.id, "reservation expired");

            let mut table = require_table(txn, reservation.table_number)?;
            let held_for_party =
                table.reserved_by.as_deref() == Some(reservation.customer_name.as_str());
            if !held_for_party {
                return Ok(vec![]);
            }
            table.clear_reservation();
            if table.status == TableStatus::Reserved {
                table.status = TableStatus::Free;
            }
            txn.update_table(table.clone())?;
            Ok(vec![DomainEvent::TableStatusChanged { table }])
        })?;
        publish_all(&self.event_tx, events);
        Ok(())
    }
}

struct Window {
    start: chrono::NaiveDateTime,
    end: chrono::NaiveDateTime,
}

fn parse_window(reservation: &Reservation) -> Option<Window> {
    let date = NaiveDate::parse_from_str(&reservation.date, "%Y-%m-%d").ok()?;
    let start = super::parse_time(&reservation.start_time)?;
    let end = super::parse_time(&reservation.end_time)?;
    Some(Window {
        start: date.and_time(start),
        end: date.and_time(end),
    })
}
