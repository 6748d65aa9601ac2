//! Tasks and the spans of time recorded against them.
//!
//! A [Task] is either idle or running. Running means its last [TimeSpan] has no stop time.
//! The total kept on a task only counts closed spans, so it never moves while a timer runs.

pub mod size;
pub mod task;
pub mod time_span;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub use size::Size;
pub use task::Task;
pub use time_span::TimeSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u32);

impl Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TaskId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Stores a [chrono::Duration] as whole milliseconds.
pub(crate) mod duration_ms {
    use chrono::Duration;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_milliseconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = i64::deserialize(deserializer)?;
        Ok(Duration::milliseconds(ms))
    }
}
