//! # Reminders Feature
//!
//! Daily recurring alert scheduling: converts `{message, HH:mm}` specs into
//! armed timers that fire every day at that wall-clock time until cancelled.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: Merge specs sharing a time slot into one firing (no orphaned timers)
//! - 1.1.0: Add notify_now for immediate one-shot alerts
//! - 1.0.0: Initial release with schedule/clear/clear-all lifecycle

pub mod scheduler;
pub mod time_of_day;

pub use scheduler::{AlertScheduler, NotificationSpec, SlotState};
pub use time_of_day::{next_fire_delay, TimeOfDay};
