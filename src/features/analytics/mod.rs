//! # Analytics Feature
//!
//! Diagnostic record of every alert firing, whether or not the platform
//! actually displayed it.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod firing_log;

pub use firing_log::{FiringLog, FiringRecord};
