use chrono::Duration;
use tracing::trace;

use crate::{
    error::{Result, TaskError},
    model::Task,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub min: Duration,
    pub max: Duration,
    /// Mean in whole milliseconds, rounded towards zero.
    pub average: Duration,
    pub count: usize,
}

/// Minimum, maximum and average tracked time over `tasks` in one pass.
/// Returns [TaskError::NoData] when there is nothing to average.
pub fn statistics<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Result<Statistics> {
    let mut iter = tasks.into_iter().map(Task::total_time);
    let first = iter.next().ok_or(TaskError::NoData)?;

    let (min, max, sum, count) = iter.fold(
        (first, first, first.num_milliseconds(), 1usize),
        |(min, max, sum, count), v| (min.min(v), max.max(v), sum + v.num_milliseconds(), count + 1),
    );
    trace!("Statistics over {count} tasks, {sum}ms total");

    Ok(Statistics {
        min,
        max,
        average: Duration::milliseconds(sum / count as i64),
        count,
    })
}
