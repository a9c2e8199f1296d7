// Core layer - shared types, configuration, and capabilities
pub mod core;

// Features layer - all feature modules
pub mod features;

// Re-export core items for ergonomic use
pub use core::{Clock, ScheduleError, SchedulerConfig, SystemClock};

// Re-export feature items
pub use features::{
    // Alerts
    ensure_permission, AlertSink, PermissionState,
    // Analytics
    FiringLog, FiringRecord,
    // Reminders
    AlertScheduler, NotificationSpec, SlotState, TimeOfDay,
};
