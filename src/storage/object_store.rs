use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use fs4::tokio::AsyncFileExt;
use thiserror::Error;
use tokio::fs::{self, File};
use tracing::{debug, instrument};

use super::entities::StoredRecord;

const RECORD_EXTENSION: &str = "json";
const LOCK_FILE: &str = ".lock";

/// Interface for abstracting storage of objects.
pub trait ObjectStore {
    /// Retrieves an object. Missing objects are `None`.
    fn get(&self, object_id: &str) -> impl Future<Output = Result<Option<StoredRecord>>> + Send;

    /// Creates or replaces the object named by `record.object_id`.
    fn put(&self, record: StoredRecord) -> impl Future<Output = Result<()>> + Send;

    /// Returns whether there was anything to delete.
    fn delete(&self, object_id: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Object ids starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Next value of a named counter. The first value handed out is 1.
    fn generate_id(&self, counter_name: &str) -> impl Future<Output = Result<u32>> + Send;
}

/// A record file exists but doesn't hold the requested record.
#[derive(Debug, Error)]
#[error("corrupt record in {path:?}: {reason}")]
pub struct CorruptRecord {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// The main realization of [ObjectStore].
pub struct FileObjectStore {
    records_dir: PathBuf,
    counters_dir: PathBuf,
    lock_path: PathBuf,
}

impl FileObjectStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        let records_dir = dir.join("records");
        let counters_dir = dir.join("counters");
        std::fs::create_dir_all(&records_dir)?;
        std::fs::create_dir_all(&counters_dir)?;

        Ok(Self {
            records_dir,
            counters_dir,
            lock_path: dir.join(LOCK_FILE),
        })
    }

    async fn lock(&self, mode: LockMode) -> Result<File> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .await
            .with_context(|| format!("Failed to open lock file {:?}", self.lock_path))?;
        match mode {
            LockMode::Shared => file.lock_shared()?,
            LockMode::Exclusive => file.lock_exclusive()?,
        }
        Ok(file)
    }

    fn record_path(&self, object_id: &str) -> Result<PathBuf> {
        validate_name(object_id)?;
        Ok(self
            .records_dir
            .join(format!("{object_id}.{RECORD_EXTENSION}")))
    }

    async fn get_inner(&self, object_id: &str) -> Result<Option<StoredRecord>> {
        let path = self.record_path(object_id)?;
        debug!("Reading {path:?}");
        let content = match fs::read_to_string(&path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => Err(e)?,
        };
        let record = match serde_json::from_str::<StoredRecord>(&content) {
            Ok(v) => v,
            Err(e) => Err(CorruptRecord {
                path: path.clone(),
                reason: e.to_string(),
            })?,
        };
        if record.object_id != object_id {
            return Err(CorruptRecord {
                path,
                reason: format!("belongs to {}", record.object_id),
            }
            .into());
        }
        Ok(Some(record))
    }

    async fn put_inner(&self, record: &StoredRecord) -> Result<()> {
        let path = self.record_path(&record.object_id)?;
        atomic_write(&path, &serde_json::to_vec_pretty(record)?).await
    }

    async fn delete_inner(&self, object_id: &str) -> Result<bool> {
        let path = self.record_path(object_id)?;
        match fs::remove_file(&path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)?,
        }
    }

    async fn list_inner(&self, prefix: &str) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.records_dir).await?;
        let mut ids = vec![];
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|v| v.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|v| v.to_str()) else {
                continue;
            };
            if id.starts_with(prefix) {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn generate_id_inner(&self, counter_name: &str) -> Result<u32> {
        validate_name(counter_name)?;
        let path = self.counters_dir.join(counter_name);
        let current = match fs::read_to_string(&path).await {
            Ok(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Counter {counter_name} is corrupted"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => Err(e)?,
        };
        let Some(next) = current.checked_add(1) else {
            bail!("Counter {counter_name} is exhausted");
        };
        atomic_write(&path, next.to_string().as_bytes()).await?;
        Ok(next)
    }
}

impl ObjectStore for FileObjectStore {
    #[instrument(skip(self))]
    async fn get(&self, object_id: &str) -> Result<Option<StoredRecord>> {
        let lock = self.lock(LockMode::Shared).await?;
        let result = self.get_inner(object_id).await;
        lock.unlock_async().await?;
        result
    }

    #[instrument(skip_all, fields(object_id = %record.object_id))]
    async fn put(&self, record: StoredRecord) -> Result<()> {
        let lock = self.lock(LockMode::Exclusive).await?;
        let result = self.put_inner(&record).await;
        lock.unlock_async().await?;
        result
    }

    #[instrument(skip(self))]
    async fn delete(&self, object_id: &str) -> Result<bool> {
        let lock = self.lock(LockMode::Exclusive).await?;
        let result = self.delete_inner(object_id).await;
        lock.unlock_async().await?;
        result
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let lock = self.lock(LockMode::Shared).await?;
        let result = self.list_inner(prefix).await;
        lock.unlock_async().await?;
        result
    }

    #[instrument(skip(self))]
    async fn generate_id(&self, counter_name: &str) -> Result<u32> {
        let lock = self.lock(LockMode::Exclusive).await?;
        let result = self.generate_id_inner(counter_name).await;
        lock.unlock_async().await?;
        result
    }
}

/// Object ids and counter names become file names, so they can't leave the store directory.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control)
    {
        bail!("Illegal object name {name:?}");
    }
    Ok(())
}

/// Write to a .tmp file then rename, so readers never see half a record.
async fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents).await?;
    fs::rename(&tmp_path, path).await?;
    Ok(())
}
