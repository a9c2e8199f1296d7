//! Scheduler configuration.

use std::time::Duration;

/// Default recurrence period: one firing per day.
pub const DEFAULT_RECURRENCE: Duration = Duration::from_secs(24 * 60 * 60);

/// Tunables for an [`AlertScheduler`](crate::AlertScheduler) instance.
///
/// The defaults match the production behavior (daily recurrence, automatic
/// permission request). Tests shrink the period so repeats can be observed
/// without advancing a full day.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Fixed period between repeat firings after the first one.
    pub recurrence_period: Duration,

    /// Whether `schedule_notifications` fires off a permission request when the
    /// sink reports an undetermined state. Arming never blocks on the request.
    pub request_permission_on_schedule: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            recurrence_period: DEFAULT_RECURRENCE,
            request_permission_on_schedule: true,
        }
    }
}

impl SchedulerConfig {
    /// Config with a custom recurrence period, other fields at defaults.
    pub fn with_period(recurrence_period: Duration) -> Self {
        Self {
            recurrence_period,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_period_is_one_day() {
        let config = SchedulerConfig::default();
        assert_eq!(config.recurrence_period, Duration::from_secs(86_400));
        assert!(config.request_permission_on_schedule);
    }
}
