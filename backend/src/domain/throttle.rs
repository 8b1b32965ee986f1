//! Per-match notification throttle.
//!
//! The store keeps one timestamp per match and enforces nothing. Policy lives
//! in [`ThrottleRecord::decide`]: a new notification is allowed once the
//! configured interval has passed since the last one.

use chrono::{DateTime, TimeDelta, Utc};

/// Last time a derived-statistics notification went out for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleRecord {
    match_id: i32,
    last_notified_at: DateTime<Utc>,
}

impl ThrottleRecord {
    /// Record a notification for `match_id` at `last_notified_at`.
    pub fn new(match_id: i32, last_notified_at: DateTime<Utc>) -> Self {
        Self {
            match_id,
            last_notified_at,
        }
    }

    /// Throttled match.
    pub fn match_id(&self) -> i32 {
        self.match_id
    }

    /// Time of the notification still in effect.
    pub fn last_notified_at(&self) -> DateTime<Utc> {
        self.last_notified_at
    }

    /// Milliseconds to wait at `now` before `min_interval` has elapsed, or
    /// `None` when a notification may go out. Partial milliseconds round up,
    /// so a suppressed caller never sees a zero wait.
    ///
    /// A timestamp in the future (clock skew between writers) counts as just
    /// notified.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeDelta, TimeZone, Utc};
    /// use league_backend::domain::ThrottleRecord;
    ///
    /// let last = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid time");
    /// let record = ThrottleRecord::new(4, last);
    /// let wait = record.retry_after(last + TimeDelta::milliseconds(400), TimeDelta::seconds(1));
    /// assert_eq!(wait, Some(600));
    /// ```
    pub fn retry_after(&self, now: DateTime<Utc>, min_interval: TimeDelta) -> Option<u64> {
        let elapsed = (now - self.last_notified_at).max(TimeDelta::zero());
        if elapsed >= min_interval {
            return None;
        }
        let remaining = min_interval - elapsed;
        let whole_ms = remaining.num_milliseconds();
        let rounded_up = if remaining > TimeDelta::milliseconds(whole_ms) {
            whole_ms.saturating_add(1)
        } else {
            whole_ms
        };
        u64::try_from(rounded_up).ok()
    }
}

/// Outcome of asking whether a match may notify now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Notify; the record now carries the current time.
    Emit {
        /// Record as written.
        record: ThrottleRecord,
    },
    /// Hold back until `retry_after_ms` has passed.
    Suppress {
        /// Timestamp of the notification that is still in effect.
        last_notified_at: DateTime<Utc>,
        /// Remaining wait in milliseconds.
        retry_after_ms: u64,
    },
}

impl ThrottleDecision {
    /// Whether the caller should send its notification.
    pub fn should_emit(&self) -> bool {
        matches!(self, Self::Emit { .. })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn last() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case(999, Some(1))]
    #[case(1_000, None)]
    #[case(5_000, None)]
    fn retry_after_tracks_interval(
        last: DateTime<Utc>,
        #[case] elapsed_ms: i64,
        #[case] expected: Option<u64>,
    ) {
        let record = ThrottleRecord::new(1, last);
        let now = last + TimeDelta::milliseconds(elapsed_ms);
        assert_eq!(record.retry_after(now, TimeDelta::seconds(1)), expected);
    }

    #[rstest]
    fn future_timestamp_counts_as_just_notified(last: DateTime<Utc>) {
        let record = ThrottleRecord::new(1, last + TimeDelta::seconds(10));
        assert_eq!(record.retry_after(last, TimeDelta::seconds(1)), Some(1_000));
    }

    #[rstest]
    #[case(TimeDelta::microseconds(999_999), 1)]
    #[case(TimeDelta::microseconds(998_500), 2)]
    #[case(TimeDelta::microseconds(400_000), 600)]
    fn partial_milliseconds_round_up(
        last: DateTime<Utc>,
        #[case] elapsed: TimeDelta,
        #[case] expected: u64,
    ) {
        let record = ThrottleRecord::new(1, last);
        assert_eq!(
            record.retry_after(last + elapsed, TimeDelta::seconds(1)),
            Some(expected)
        );
    }

    #[rstest]
    fn zero_interval_never_suppresses(last: DateTime<Utc>) {
        let record = ThrottleRecord::new(1, last);
        assert_eq!(record.retry_after(last, TimeDelta::zero()), None);
    }
}
