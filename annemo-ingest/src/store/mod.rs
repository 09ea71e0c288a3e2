//! Append-only log store
//!
//! Maps each `LogKey` to one growing file in the results directory. Writers
//! are serialized per key through an async mutex, so records for the same key
//! never interleave and land in the order their `append` calls complete.
//! Different keys hold different mutexes and never wait on each other.

use annemo_common::{Error, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::record::LogRecord;

pub mod key;
pub mod names;

pub use key::{LogKey, Stream};
pub use names::{is_log_file_name, resolve_target, LOG_EXTENSION};

type WriterLock = Arc<tokio::sync::Mutex<()>>;

pub struct AppendLogStore {
    dir: PathBuf,
    sync_writes: bool,
    /// One lock per file name, present only while some caller holds it
    writers: Mutex<HashMap<String, WriterLock>>,
}

/// Claim on a per-file lock; the map entry goes away with the last claim
struct WriterSlot<'a> {
    store: &'a AppendLogStore,
    name: String,
    lock: WriterLock,
}

impl Drop for WriterSlot<'_> {
    fn drop(&mut self) {
        let mut writers = self.store.writers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = writers.get(&self.name) {
            // The map and this slot are the only holders
            if Arc::ptr_eq(entry, &self.lock) && Arc::strong_count(entry) == 2 {
                writers.remove(&self.name);
            }
        }
    }
}

impl AppendLogStore {
    /// Open the store, creating the results directory if needed
    pub async fn open(dir: impl Into<PathBuf>, sync_writes: bool) -> Result<Self> {
        let dir = dir.into();
        create_results_dir(&dir).await?;
        Ok(Self {
            dir,
            sync_writes,
            writers: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn writer(&self, name: &str) -> WriterSlot<'_> {
        let mut writers = self.writers.lock().unwrap_or_else(|e| e.into_inner());
        let lock = writers.entry(name.to_string()).or_default().clone();
        WriterSlot {
            store: self,
            name: name.to_string(),
            lock,
        }
    }

    /// Number of files with a lock currently claimed
    pub fn active_writers(&self) -> usize {
        self.writers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Append `record` plus a newline to the file for `key`
    ///
    /// Returns once the line has been handed to the OS (and synced when
    /// `sync_writes` is set). Returns the path written.
    pub async fn append(&self, key: &LogKey, record: &LogRecord) -> Result<PathBuf> {
        let name = key.file_name();
        let path = self.dir.join(&name);
        let writer = self.writer(&name);
        let _guard = writer.lock.lock().await;

        let write_error = |source| Error::Write {
            path: path.clone(),
            source,
        };

        let mut file = match open_append(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Results directory {} missing, recreating", self.dir.display());
                create_results_dir(&self.dir).await?;
                open_append(&path).await.map_err(write_error)?
            }
            Err(e) => return Err(write_error(e)),
        };

        file.write_all(&record.to_line()).await.map_err(write_error)?;
        file.flush().await.map_err(write_error)?;
        if self.sync_writes {
            file.sync_data().await.map_err(write_error)?;
        }

        debug!("Appended {} bytes to {}", record.as_str().len() + 1, name);
        Ok(path)
    }

    /// Whether the results directory exists and permits writes
    pub async fn is_writable(&self) -> bool {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => false,
        }
    }

    /// Names of all log files, sorted
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // DirEntry::file_type does not follow symlinks
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_log_file_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolved name and contents of the log file named by `raw`
    pub async fn read(&self, raw: &str) -> Result<(String, Vec<u8>)> {
        let name = resolve_target(raw)?;
        let writer = self.writer(&name);
        let _guard = writer.lock.lock().await;

        let path = self.regular_file(&name).await?;
        let contents = tokio::fs::read(&path).await?;
        Ok((name, contents))
    }

    /// Remove the log file named by `raw`; returns the resolved name
    pub async fn delete(&self, raw: &str) -> Result<String> {
        let name = resolve_target(raw)?;
        let writer = self.writer(&name);
        let _guard = writer.lock.lock().await;

        let path = self.regular_file(&name).await?;
        tokio::fs::remove_file(&path).await?;
        Ok(name)
    }

    /// Path of `name` inside the directory, if it is a regular file
    async fn regular_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.dir.join(name);
        match tokio::fs::symlink_metadata(&path).await {
            Ok(meta) if meta.file_type().is_file() => Ok(path),
            Ok(_) => Err(Error::InvalidDeletionTarget(name.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound(name.to_string())),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

async fn open_append(path: &Path) -> std::io::Result<tokio::fs::File> {
    tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
}

async fn create_results_dir(dir: &Path) -> Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(dir).await.map_err(|source| Error::Write {
        path: dir.to_path_buf(),
        source,
    })
}
