//! # Feature: Alert Sink
//!
//! Capability seam for the platform's notification surface: permission state,
//! permission requests, and alert presentation.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add ensure_permission helper for app-startup permission prompts
//! - 1.0.0: Initial release with AlertSink trait and PermissionState

pub mod sink;

pub use sink::{ensure_permission, AlertSink, PermissionState};
