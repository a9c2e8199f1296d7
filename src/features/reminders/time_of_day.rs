//! Time-of-day parsing and delay computation.
//!
//! A `TimeOfDay` is the `HH:mm` key identifying a daily recurrence slot. The
//! math here is pure: the clock is read by the caller and passed in, so every
//! edge (target in the past, target exactly now, day rollover) is testable
//! with fixed instants.

use chrono::{DateTime, Days, Local, TimeZone};
use std::time::Duration;

use crate::core::error::ScheduleError;

/// A wall-clock time of day, local to the host. Seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Build from components, range-checked.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::MalformedTime(format!("{hour}:{minute}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// This time on the same calendar day as `now`, with seconds and
    /// sub-seconds zeroed.
    ///
    /// If the local timeline skips this wall time on that day (DST spring
    /// forward), the first valid instant after the gap is used.
    pub fn on_day_of(&self, now: DateTime<Local>) -> DateTime<Local> {
        let naive = now
            .date_naive()
            .and_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or_else(|| now.date_naive().and_hms_opt(0, 0, 0).unwrap());

        match Local.from_local_datetime(&naive) {
            chrono::LocalResult::Single(dt) => dt,
            // Fall-back hour: take the earlier of the two occurrences.
            chrono::LocalResult::Ambiguous(earliest, _) => earliest,
            // Spring-forward gap: interpret with the pre-gap offset, which
            // lands on the first valid instant after it.
            chrono::LocalResult::None => Local.from_utc_datetime(&(naive - *now.offset())),
        }
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Parse exactly `HH:mm`: two digits, a colon, two digits, in range.
    fn from_str(s: &str) -> Result<Self, ScheduleError> {
        let malformed = || ScheduleError::MalformedTime(s.to_string());

        let (hh, mm) = s.split_once(':').ok_or_else(malformed)?;
        if hh.len() != 2 || mm.len() != 2 {
            return Err(malformed());
        }
        if !hh.bytes().all(|b| b.is_ascii_digit()) || !mm.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let hour: u8 = hh.parse().map_err(|_| malformed())?;
        let minute: u8 = mm.parse().map_err(|_| malformed())?;
        Self::new(hour, minute).map_err(|_| malformed())
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Delay from `now` until the next firing of `target`.
///
/// A target at or before `now` advances by one calendar day, not by a flat
/// 24 hours, so the alert stays pinned to its wall-clock time across a DST
/// change. The result is never negative.
pub fn next_fire_delay(target: DateTime<Local>, now: DateTime<Local>) -> Duration {
    let next = if target <= now {
        // checked_add_days re-resolves the wall time on the next day; it only
        // fails at the end of the representable calendar range.
        target
            .checked_add_days(Days::new(1))
            .unwrap_or(target + chrono::Duration::hours(24))
    } else {
        target
    };

    (next - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(y, mo, d)
                    .unwrap()
                    .and_hms_opt(h, mi, s)
                    .unwrap(),
            )
            .single()
            .unwrap()
    }

    #[test]
    fn test_parse_valid() {
        let t: TimeOfDay = "09:30".parse().unwrap();
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 30);
        assert_eq!("00:00".parse::<TimeOfDay>().unwrap().to_string(), "00:00");
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap().to_string(), "23:59");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in ["", "9:30", "09:3", "0930", "09-30", "09:30:00", "ab:cd", " 09:30", "09:30 "] {
            assert!(
                bad.parse::<TimeOfDay>().is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("99:99".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_display_zero_pads() {
        let t = TimeOfDay::new(7, 5).unwrap();
        assert_eq!(t.to_string(), "07:05");
    }

    #[test]
    fn test_on_day_of_zeroes_seconds() {
        let now = local(2025, 6, 15, 14, 45, 37);
        let t: TimeOfDay = "09:00".parse().unwrap();
        let target = t.on_day_of(now);
        assert_eq!(target, local(2025, 6, 15, 9, 0, 0));
    }

    #[test]
    fn test_delay_for_future_target_is_exact() {
        let now = local(2025, 6, 15, 8, 0, 0);
        let target = local(2025, 6, 15, 9, 30, 0);
        assert_eq!(
            next_fire_delay(target, now),
            Duration::from_secs(90 * 60)
        );
    }

    #[test]
    fn test_delay_for_past_target_rolls_to_next_day() {
        // 09:00 armed at 09:05 -> next day 09:00, 23h55m away
        let now = local(2025, 6, 15, 9, 5, 0);
        let target = local(2025, 6, 15, 9, 0, 0);
        assert_eq!(
            next_fire_delay(target, now),
            Duration::from_secs((23 * 60 + 55) * 60)
        );
    }

    #[test]
    fn test_delay_for_target_equal_to_now_is_full_day() {
        let now = local(2025, 6, 15, 9, 0, 0);
        assert_eq!(
            next_fire_delay(now, now),
            Duration::from_secs(24 * 60 * 60)
        );
    }

    #[test]
    fn test_delay_never_negative_and_bounded() {
        let now = local(2025, 6, 15, 23, 59, 0);
        let target = local(2025, 6, 15, 0, 0, 0);
        let delay = next_fire_delay(target, now);
        assert!(delay > Duration::ZERO);
        assert!(delay <= Duration::from_secs(25 * 60 * 60));
    }
}
