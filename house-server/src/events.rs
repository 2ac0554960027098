//! Event broadcast plumbing
//!
//! Engines compute their state change plus a list of events inside a store
//! transaction, then hand the events to [`publish_all`] after commit. The
//! broadcast is fire-and-forget: a missing or lagging subscriber never fails
//! the underlying mutation.

use shared::DomainEvent;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
pub const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Sender half shared by all engines
pub type EventSender = broadcast::Sender<DomainEvent>;

/// Create the process-wide event channel.
pub fn event_channel() -> (EventSender, broadcast::Receiver<DomainEvent>) {
    broadcast::channel(EVENT_CHANNEL_CAPACITY)
}

/// Publish a batch of events, ignoring delivery failures.
pub fn publish_all(tx: &EventSender, events: Vec<DomainEvent>) {
    for event in events {
        tracing::debug!(topic = event.topic(), "broadcasting event");
        // send only errors when there are no receivers; that is fine here
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::event::NotificationLevel;

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let (tx, rx) = event_channel();
        drop(rx);
        publish_all(
            &tx,
            vec![DomainEvent::notify(
                "staff-1",
                NotificationLevel::Info,
                "t",
                "m",
            )],
        );
    }

    #[tokio::test]
    async fn test_subscriber_receives_in_order() {
        let (tx, mut rx) = event_channel();
        publish_all(
            &tx,
            vec![
                DomainEvent::OrderDeleted {
                    order_id: "o-1".to_string(),
                    table_number: None,
                },
                DomainEvent::notify("s", NotificationLevel::Info, "t", "m"),
            ],
        );
        assert_eq!(rx.recv().await.unwrap().topic(), "order:deleted");
        assert_eq!(rx.recv().await.unwrap().topic(), "notification:new");
    }
}
