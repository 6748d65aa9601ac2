use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::InvalidState, utils::time::format_elapsed};

use super::{duration_ms, size::optional_size, Size, TaskId, TimeSpan};

pub const DEFAULT_DESCRIPTION: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    #[serde(with = "optional_size")]
    size: Option<Size>,
    /// Total of all closed spans.
    #[serde(with = "duration_ms", rename = "total_time_ms")]
    total_time: Duration,
    spans: Vec<TimeSpan>,
    tags: Vec<String>,
}

impl Task {
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: Option<String>,
        size: Option<Size>,
        tags: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            size,
            total_time: Duration::zero(),
            spans: vec![],
            tags: dedup_tags(tags),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn spans(&self) -> &[TimeSpan] {
        &self.spans
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|v| v == tag)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_size(&mut self, size: Option<Size>) {
        self.size = size;
    }

    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = String>) {
        self.tags = dedup_tags(tags);
    }

    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    pub fn total_time_str(&self) -> String {
        format_elapsed(self.total_time)
    }

    /// Total time including a span that is still running at `now`.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        match self.most_recent_span() {
            Some(span) if span.is_running() => self.total_time + span.duration_until(now),
            _ => self.total_time,
        }
    }

    pub fn most_recent_span(&self) -> Option<&TimeSpan> {
        self.spans.last()
    }

    pub fn is_running(&self) -> bool {
        self.most_recent_span().is_some_and(TimeSpan::is_running)
    }

    /// Opens a new span at `start`. Fails without touching the task if a span is already open.
    pub fn start(&mut self, start: DateTime<Utc>) -> Result<(), InvalidState> {
        if self.is_running() {
            return Err(InvalidState::AlreadyRunning);
        }
        self.spans.push(TimeSpan::open(start));
        Ok(())
    }

    /// Closes the open span at `stop` and recomputes the total.
    pub fn stop(&mut self, stop: DateTime<Utc>) -> Result<(), InvalidState> {
        let Some(span) = self.spans.last_mut().filter(|v| v.is_running()) else {
            return Err(InvalidState::NotRunning);
        };
        if stop < span.start {
            return Err(InvalidState::StopBeforeStart);
        }
        span.stop = Some(stop);
        self.total_time = TimeSpan::total_duration(&self.spans);
        Ok(())
    }

    /// Checks a task read back from storage. Only the last span may be open and no span may
    /// stop before it starts. The stored total is replaced by the sum of the closed spans.
    pub fn restore(mut self) -> Result<Self, InvalidState> {
        let earlier = self.spans.split_last().map_or(&[][..], |(_, v)| v);
        if earlier.iter().any(TimeSpan::is_running) {
            return Err(InvalidState::EarlierSpanRunning);
        }
        if self
            .spans
            .iter()
            .any(|v| v.stop.is_some_and(|stop| stop < v.start))
        {
            return Err(InvalidState::StopBeforeStart);
        }
        self.total_time = TimeSpan::total_duration(&self.spans);
        Ok(self)
    }
}

fn dedup_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut result = Vec::<String>::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || result.iter().any(|v| v == tag) {
            continue;
        }
        result.push(tag.to_string());
    }
    result
}
