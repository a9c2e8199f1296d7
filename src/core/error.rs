//! Error kinds for the scheduling core.
//!
//! Every error here is contained to the single spec that caused it: a bad spec
//! is logged and skipped, the rest of the batch still arms. Nothing in this
//! crate treats a scheduling failure as fatal.

/// A notification spec that could not be armed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The time string does not match `HH:mm` with hours 00-23 and minutes 00-59.
    MalformedTime(String),
    /// The message is empty (or whitespace only) after trimming.
    EmptyMessage,
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::MalformedTime(raw) => {
                write!(f, "malformed time {raw:?}: expected HH:mm (00:00-23:59)")
            }
            ScheduleError::EmptyMessage => write!(f, "notification message is empty"),
        }
    }
}

impl std::error::Error for ScheduleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_offending_input() {
        let err = ScheduleError::MalformedTime("25:00".to_string());
        assert!(err.to_string().contains("25:00"));
        assert!(err.to_string().contains("HH:mm"));
    }
}
