use chrono::{DateTime, Utc};

use crate::{
    error::{Result, TaskError},
    model::{Size, Task, TaskId},
    summary::{self, GroupTotal, Statistics},
    utils::time::format_elapsed,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    /// Closed spans only.
    pub elapsed: String,
    /// Set while the task runs, counting the open span up to now.
    pub live_elapsed: Option<String>,
}

impl TaskRow {
    pub fn new(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            elapsed: task.total_time_str(),
            live_elapsed: task
                .is_running()
                .then(|| format_elapsed(task.elapsed_at(now))),
        }
    }

    pub fn running(&self) -> bool {
        self.live_elapsed.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub label: String,
    pub elapsed: String,
    pub task_count: usize,
}

impl<K: ToString> From<GroupTotal<K>> for GroupRow {
    fn from(value: GroupTotal<K>) -> Self {
        Self {
            label: value.key.to_string(),
            elapsed: format_elapsed(value.duration),
            task_count: value.task_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsView {
    Values {
        min: String,
        max: String,
        average: String,
    },
    /// Nothing to compute statistics over.
    Empty,
}

impl StatsView {
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Result<Self> {
        match summary::statistics(tasks) {
            Ok(Statistics {
                min, max, average, ..
            }) => Ok(Self::Values {
                min: format_elapsed(min),
                max: format_elapsed(max),
                average: format_elapsed(average),
            }),
            Err(TaskError::NoData) => Ok(Self::Empty),
            Err(e) => Err(e),
        }
    }
}

/// One summary screen. Each page filters on at most one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Overview {
        tasks: Vec<TaskRow>,
        sizes: Vec<GroupRow>,
        tags: Vec<GroupRow>,
        stats: StatsView,
    },
    Size {
        size: Size,
        tasks: Vec<TaskRow>,
        stats: StatsView,
    },
    Tag {
        options: Vec<String>,
        tag: String,
        tasks: Vec<TaskRow>,
        sizes: Vec<GroupRow>,
        stats: StatsView,
    },
}

pub(super) fn task_rows<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    now: DateTime<Utc>,
) -> Vec<TaskRow> {
    tasks.into_iter().map(|v| TaskRow::new(v, now)).collect()
}

pub(super) fn size_rows<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<GroupRow> {
    summary::per_size(tasks).into_iter().map(GroupRow::from).collect()
}

pub(super) fn tag_rows<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<GroupRow> {
    summary::per_tag(tasks).into_iter().map(GroupRow::from).collect()
}
