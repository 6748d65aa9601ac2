//! Read-only views computed over a snapshot of tasks. Nothing here mutates a [Task].
//!
//! Grouped views are ordered deterministically: sizes follow [Size] order, tags are sorted.

pub mod statistics;

use std::collections::BTreeMap;

use chrono::Duration;

use crate::model::{Size, Task, TaskId};

pub use statistics::{statistics, Statistics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTotal {
    pub id: TaskId,
    pub title: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTotal<K> {
    pub key: K,
    pub duration: Duration,
    pub task_count: usize,
}

impl<K> GroupTotal<K> {
    fn new(key: K) -> Self {
        Self {
            key,
            duration: Duration::zero(),
            task_count: 0,
        }
    }

    fn add(&mut self, task: &Task) {
        self.duration += task.total_time();
        self.task_count += 1;
    }
}

pub fn per_task<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<TaskTotal> {
    tasks
        .into_iter()
        .map(|task| TaskTotal {
            id: task.id(),
            title: task.title().to_string(),
            duration: task.total_time(),
        })
        .collect()
}

/// Sums tracked time for every size that occurs. Tasks without a size are left out.
pub fn per_size<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<GroupTotal<Size>> {
    let mut map = BTreeMap::<Size, GroupTotal<Size>>::new();
    for task in tasks {
        let Some(size) = task.size() else {
            continue;
        };
        map.entry(size)
            .or_insert_with(|| GroupTotal::new(size))
            .add(task);
    }
    map.into_values().collect()
}

/// Sums tracked time per tag. A task counts towards each of its tags.
pub fn per_tag<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<GroupTotal<String>> {
    let mut map = BTreeMap::<&str, GroupTotal<String>>::new();
    for task in tasks {
        for tag in task.tags() {
            map.entry(tag.as_str())
                .or_insert_with(|| GroupTotal::new(tag.clone()))
                .add(task);
        }
    }
    map.into_values().collect()
}

pub fn filter_by_size(tasks: &[Task], size: Size) -> Vec<&Task> {
    tasks.iter().filter(|v| v.size() == Some(size)).collect()
}

pub fn filter_by_tag<'a>(tasks: &'a [Task], tag: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|v| v.has_tag(tag)).collect()
}

/// Distinct tags of the given tasks, sorted.
pub fn available_tags<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<String> {
    let mut tags = tasks
        .into_iter()
        .flat_map(|v| v.tags().iter().cloned())
        .collect::<Vec<_>>();
    tags.sort();
    tags.dedup();
    tags
}
