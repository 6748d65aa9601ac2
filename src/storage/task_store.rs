use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    error::{NotFound, Result},
    model::{Task, TaskId},
};

use super::{
    entities::StoredRecord,
    object_store::{CorruptRecord, ObjectStore},
};

pub const TASK_OBJECT_PREFIX: &str = "Task-";
pub const TASK_COUNTER_ID: &str = "TaskCounter";
pub const TASK_RECORD_VERSION: u32 = 1;

pub fn object_id_for(id: TaskId) -> String {
    format!("{TASK_OBJECT_PREFIX}{id}")
}

/// Everything the controller needs from persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn next_task_id(&self) -> Result<TaskId>;

    /// Every readable task, ordered by id.
    async fn load_all_tasks(&self) -> Result<Vec<Task>>;

    async fn save(&self, task: &Task) -> Result<()>;

    /// Fails with [NotFound::Task] if nothing was stored under `id`.
    async fn delete(&self, id: TaskId) -> Result<()>;
}

/// [TaskStore] that keeps each task as a versioned record of an [ObjectStore].
pub struct RecordTaskStore<O> {
    objects: O,
}

impl<O: ObjectStore> RecordTaskStore<O> {
    pub fn new(objects: O) -> Self {
        Self { objects }
    }

    fn decode(record: StoredRecord) -> Option<Task> {
        if record.version != TASK_RECORD_VERSION {
            warn!(
                "Skipping {} with unsupported version {}",
                record.object_id, record.version
            );
            return None;
        }
        let task = match serde_json::from_value::<Task>(record.data) {
            Ok(v) => v,
            Err(e) => {
                warn!("Skipping {}, it isn't a task: {e}", record.object_id);
                return None;
            }
        };
        match task.restore() {
            Ok(task) => Some(task),
            Err(e) => {
                warn!("Skipping {}, its spans are broken: {e}", record.object_id);
                None
            }
        }
    }
}

#[async_trait]
impl<O: ObjectStore + Send + Sync> TaskStore for RecordTaskStore<O> {
    async fn next_task_id(&self) -> Result<TaskId> {
        let id = self.objects.generate_id(TASK_COUNTER_ID).await?;
        Ok(TaskId(id))
    }

    async fn load_all_tasks(&self) -> Result<Vec<Task>> {
        let ids = self.objects.list(TASK_OBJECT_PREFIX).await?;
        let mut tasks = Vec::with_capacity(ids.len());
        for object_id in ids {
            match self.objects.get(&object_id).await {
                Ok(Some(record)) => tasks.extend(Self::decode(record)),
                // Removed between listing and reading
                Ok(None) => {}
                Err(e) if e.is::<CorruptRecord>() => warn!("Skipping {object_id}: {e}"),
                Err(e) => return Err(e.into()),
            }
        }
        tasks.sort_by_key(Task::id);
        debug!("Loaded {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn save(&self, task: &Task) -> Result<()> {
        let record = StoredRecord::new(
            object_id_for(task.id()),
            TASK_RECORD_VERSION,
            serde_json::to_value(task)?,
        );
        self.objects.put(record).await?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        if self.objects.delete(&object_id_for(id)).await? {
            Ok(())
        } else {
            Err(NotFound::Task(id).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use tempfile::tempdir;

    use crate::{
        error::{NotFound, TaskError},
        model::{Size, Task, TaskId, TimeSpan},
        storage::{
            entities::StoredRecord,
            object_store::{FileObjectStore, ObjectStore},
        },
        utils::logging::TEST_LOGGING,
    };

    use super::{RecordTaskStore, TaskStore};

    fn test_store(dir: &std::path::Path) -> Result<RecordTaskStore<FileObjectStore>> {
        Ok(RecordTaskStore::new(FileObjectStore::new(dir.to_owned())?))
    }

    fn tracked(id: TaskId) -> Task {
        let start = Utc.with_ymd_and_hms(2021, 2, 22, 6, 0, 0).unwrap();
        let mut task = Task::new(
            id,
            "Task",
            Some("with spans".into()),
            Some(Size::L),
            vec!["work".to_string(), "home".to_string()],
        );
        task.start(start).unwrap();
        task.stop(start + Duration::hours(25)).unwrap();
        task.start(start + Duration::hours(26)).unwrap();
        task
    }

    #[tokio::test]
    async fn test_task_store_round_trip() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = test_store(dir.path())?;

        let first = tracked(store.next_task_id().await?);
        let second = Task::new(store.next_task_id().await?, "Second", None, None, vec![]);
        assert_eq!(first.id(), TaskId(1));
        assert_eq!(second.id(), TaskId(2));

        store.save(&second).await?;
        store.save(&first).await?;

        let loaded = store.load_all_tasks().await?;
        assert_eq!(loaded, vec![first, second]);
        assert_eq!(loaded[0].total_time(), Duration::hours(25));
        assert!(loaded[0].is_running());
        Ok(())
    }

    #[tokio::test]
    async fn test_task_store_ids_survive_restart() -> Result<()> {
        let dir = tempdir()?;
        test_store(dir.path())?.next_task_id().await?;
        let id = test_store(dir.path())?.next_task_id().await?;
        assert_eq!(id, TaskId(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_task_store_delete() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        let task = tracked(TaskId(7));
        store.save(&task).await?;

        store.delete(TaskId(7)).await?;
        assert!(store.load_all_tasks().await?.is_empty());
        assert!(matches!(
            store.delete(TaskId(7)).await,
            Err(TaskError::NotFound(NotFound::Task(TaskId(7))))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_task_store_skips_unreadable_records() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let objects = FileObjectStore::new(dir.path().to_owned())?;
        objects
            .put(StoredRecord::new(
                "Task-1",
                2,
                serde_json::to_value(tracked(TaskId(1)))?,
            ))
            .await?;
        objects
            .put(StoredRecord::new("Task-2", 1, json!({"title": 5})))
            .await?;
        std::fs::write(dir.path().join("records").join("Task-3.json"), "{{{")?;
        objects
            .put(StoredRecord::new(
                "Task-4",
                1,
                serde_json::to_value(tracked(TaskId(4)))?,
            ))
            .await?;

        let store = RecordTaskStore::new(objects);
        let loaded = store.load_all_tasks().await?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), TaskId(4));
        Ok(())
    }

    #[tokio::test]
    async fn test_task_store_checks_loaded_spans() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let objects = FileObjectStore::new(dir.path().to_owned())?;
        let start = Utc.with_ymd_and_hms(2021, 2, 22, 0, 0, 0).unwrap();
        let hour = Duration::hours(1);

        let mut open_first = serde_json::to_value(Task::new(TaskId(1), "A", None, None, vec![]))?;
        open_first["spans"] = serde_json::to_value([
            TimeSpan::open(start),
            TimeSpan::closed(start + hour, start + hour * 2),
        ])?;
        open_first["total_time_ms"] = 999.into();
        objects
            .put(StoredRecord::new("Task-1", 1, open_first))
            .await?;

        let mut stale_total = serde_json::to_value(Task::new(TaskId(2), "B", None, None, vec![]))?;
        stale_total["spans"] = serde_json::to_value([TimeSpan::closed(start, start + hour)])?;
        stale_total["total_time_ms"] = 999.into();
        objects
            .put(StoredRecord::new("Task-2", 1, stale_total))
            .await?;

        let loaded = RecordTaskStore::new(objects).load_all_tasks().await?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), TaskId(2));
        assert_eq!(loaded[0].total_time(), hour);
        Ok(())
    }

    #[tokio::test]
    async fn test_task_store_propagates_read_failures() -> Result<()> {
        let dir = tempdir()?;
        let store = test_store(dir.path())?;
        store.save(&tracked(TaskId(1))).await?;
        std::fs::create_dir(dir.path().join("records").join("Task-2.json"))?;

        assert!(matches!(
            store.load_all_tasks().await,
            Err(TaskError::Storage(_))
        ));
        Ok(())
    }
}
