//! # Features Layer
//!
//! All feature modules: alert capabilities, firing analytics, and the
//! recurring reminder scheduler.

pub mod alerts;
pub mod analytics;
pub mod reminders;

pub use alerts::{ensure_permission, AlertSink, PermissionState};
pub use analytics::{FiringLog, FiringRecord};
pub use reminders::{AlertScheduler, NotificationSpec, SlotState, TimeOfDay};
