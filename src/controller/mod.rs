//! The controller owns the task collection. Presentation sends it [Intent]s and reads back
//! [Page]s; nothing else mutates tasks.

pub mod view;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{InvalidState, NotFound, Result, TaskError},
    model::{Size, Task, TaskId},
    storage::task_store::TaskStore,
    summary,
    utils::clock::Clock,
};

pub use view::{GroupRow, Page, StatsView, TaskRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Size(Size),
    Tag(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub size: Option<Size>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CreateTask(NewTask),
    StartTask(TaskId),
    StopTask(TaskId),
    DeleteTask(TaskId),
    SelectFilter(Filter),
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(TaskId),
    Started(TaskId),
    Stopped { id: TaskId, total: Duration },
    Deleted(TaskId),
    FilterSelected,
    Refreshed { count: usize },
}

type Transition = fn(&mut Task, DateTime<Utc>) -> Result<(), InvalidState>;

pub struct Controller<S> {
    store: S,
    clock: Box<dyn Clock>,
    tasks: Vec<Task>,
    filter: Filter,
}

impl<S: TaskStore> Controller<S> {
    pub async fn load(store: S, clock: Box<dyn Clock>) -> Result<Self> {
        let tasks = store.load_all_tasks().await?;
        Ok(Self {
            store,
            clock,
            tasks,
            filter: Filter::All,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn task(&self, id: TaskId) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|v| v.id() == id)
            .ok_or_else(|| NotFound::Task(id).into())
    }

    #[instrument(skip(self))]
    pub async fn handle(&mut self, intent: Intent) -> Result<Outcome> {
        match intent {
            Intent::CreateTask(new_task) => self.create(new_task).await.map(Outcome::Created),
            Intent::StartTask(id) => {
                self.transition(id, Task::start).await?;
                Ok(Outcome::Started(id))
            }
            Intent::StopTask(id) => {
                let total = self.transition(id, Task::stop).await?;
                Ok(Outcome::Stopped { id, total })
            }
            Intent::DeleteTask(id) => {
                self.delete(id).await?;
                Ok(Outcome::Deleted(id))
            }
            Intent::SelectFilter(filter) => {
                self.select_filter(filter)?;
                Ok(Outcome::FilterSelected)
            }
            Intent::Refresh => {
                self.tasks = self.store.load_all_tasks().await?;
                Ok(Outcome::Refreshed {
                    count: self.tasks.len(),
                })
            }
        }
    }

    /// Rows for every task, whatever the filter.
    pub fn task_rows(&self) -> Vec<TaskRow> {
        view::task_rows(&self.tasks, self.clock.time())
    }

    /// Renders the page for the selected filter.
    pub fn page(&self) -> Result<Page> {
        let now = self.clock.time();
        let page = match &self.filter {
            Filter::All => Page::Overview {
                tasks: view::task_rows(&self.tasks, now),
                sizes: view::size_rows(&self.tasks),
                tags: view::tag_rows(&self.tasks),
                stats: StatsView::of(&self.tasks)?,
            },
            Filter::Size(size) => {
                let filtered = summary::filter_by_size(&self.tasks, *size);
                Page::Size {
                    size: *size,
                    tasks: view::task_rows(filtered.iter().copied(), now),
                    stats: StatsView::of(filtered)?,
                }
            }
            Filter::Tag(tag) => {
                let filtered = summary::filter_by_tag(&self.tasks, tag);
                Page::Tag {
                    options: summary::available_tags(&self.tasks),
                    tag: tag.clone(),
                    tasks: view::task_rows(filtered.iter().copied(), now),
                    sizes: view::size_rows(filtered.iter().copied()),
                    stats: StatsView::of(filtered)?,
                }
            }
        };
        Ok(page)
    }

    async fn create(&mut self, new_task: NewTask) -> Result<TaskId> {
        let id = self.store.next_task_id().await?;
        let task = Task::new(
            id,
            new_task.title,
            new_task.description,
            new_task.size,
            new_task.tags,
        );
        self.store.save(&task).await?;
        info!("Created task {id} {:?}", task.title());
        self.tasks.push(task);
        Ok(id)
    }

    /// Applies a state change and persists it. The task is left as it was if either step fails.
    async fn transition(&mut self, id: TaskId, apply: Transition) -> Result<Duration> {
        let now = self.clock.time();
        let task = find_mut(&mut self.tasks, id)?;
        let previous = task.clone();

        apply(task, now).map_err(|e| TaskError::invalid_state(id, e))?;

        let saved = self.store.save(task).await;
        if let Err(e) = saved {
            warn!("Failed to save task {id}, reverting: {e:?}");
            *task = previous;
            return Err(e);
        }
        debug!("Task {id} is now running: {}", task.is_running());
        Ok(task.total_time())
    }

    async fn delete(&mut self, id: TaskId) -> Result<()> {
        let index = self
            .tasks
            .iter()
            .position(|v| v.id() == id)
            .ok_or(NotFound::Task(id))?;
        self.store.delete(id).await?;
        self.tasks.remove(index);
        info!("Deleted task {id}");
        Ok(())
    }

    fn select_filter(&mut self, filter: Filter) -> Result<()> {
        if let Filter::Tag(tag) = &filter {
            if !self.tasks.iter().any(|v| v.has_tag(tag)) {
                return Err(NotFound::Tag(tag.clone()).into());
            }
        }
        self.filter = filter;
        Ok(())
    }
}

fn find_mut(tasks: &mut [Task], id: TaskId) -> Result<&mut Task> {
    tasks
        .iter_mut()
        .find(|v| v.id() == id)
        .ok_or_else(|| NotFound::Task(id).into())
}
