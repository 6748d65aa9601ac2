use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One interval of work. A span without a stop time is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
}

impl TimeSpan {
    pub fn open(start: DateTime<Utc>) -> Self {
        Self { start, stop: None }
    }

    pub fn closed(start: DateTime<Utc>, stop: DateTime<Utc>) -> Self {
        Self {
            start,
            stop: Some(stop),
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_none()
    }

    /// Zero while the span is running.
    pub fn duration(&self) -> Duration {
        self.stop
            .map(|stop| stop - self.start)
            .unwrap_or_else(Duration::zero)
    }

    /// Like [TimeSpan::duration], but counts a running span up to `now`.
    pub fn duration_until(&self, now: DateTime<Utc>) -> Duration {
        match self.stop {
            Some(stop) => stop - self.start,
            None if now > self.start => now - self.start,
            None => Duration::zero(),
        }
    }

    pub fn total_duration<'a>(spans: impl IntoIterator<Item = &'a TimeSpan>) -> Duration {
        spans
            .into_iter()
            .map(TimeSpan::duration)
            .fold(Duration::zero(), |sum, v| sum + v)
    }
}
