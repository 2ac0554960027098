//! Server configuration
//!
//! # Environment variables
//!
//! Every setting can be overridden via environment variable:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | ENVIRONMENT | development | Runtime environment |
//! | GRACE_PERIOD_MINUTES | 15 | Minutes past a reservation's end time before auto-expiry |
//! | RESERVATION_TICK_SECS | 60 | Reservation scheduler cadence |
//!
//! # Example
//!
//! ```ignore
//! GRACE_PERIOD_MINUTES=30 cargo run
//! ```

#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Grace period for reservation expiry, in minutes
    pub grace_period_minutes: i64,
    /// Reservation scheduler tick interval, in seconds
    pub reservation_tick_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            grace_period_minutes: std::env::var("GRACE_PERIOD_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            reservation_tick_secs: std::env::var("RESERVATION_TICK_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            grace_period_minutes: 15,
            reservation_tick_secs: 60,
        }
    }
}
