//! # Core Module
//!
//! Core domain types, configuration, and error handling for the scheduler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with clock, config, and error modules

pub mod clock;
pub mod config;
pub mod error;

// Re-export commonly used items
pub use clock::{Clock, SystemClock};
pub use config::{SchedulerConfig, DEFAULT_RECURRENCE};
pub use error::ScheduleError;
