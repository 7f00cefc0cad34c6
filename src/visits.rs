//! File-backed visit counter
//!
//! The count lives in a single file as its decimal string. Every failure is
//! fail-open: loads fall back to zero, saves are dropped, and neither ever
//! reaches the request that triggered it.

use crate::metrics::Metrics;
use std::ffi::OsString;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

/// Persistence failure of the visit counter file
#[derive(Error, Debug)]
pub enum VisitStoreError {
    #[error("Failed to read visit counter {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Visit counter {path} holds {content:?}, not a count: {source}")]
    Parse {
        path: PathBuf,
        content: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Failed to create directory {path} for visit counter: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write visit counter {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VisitStoreError {
    /// Operation label used for `visit_store_failures_total`
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Read { .. } | Self::Parse { .. } => "load",
            Self::CreateDir { .. } | Self::Write { .. } => "save",
        }
    }
}

/// Durable visit counter backed by one file
///
/// Increments are serialized by an internal lock, so concurrent requests in
/// one process never lose an update. Reads skip the lock; writes go through
/// a temporary file and a rename, so a reader sees either the old or the new
/// count.
pub struct VisitStore {
    path: PathBuf,
    increment_lock: Mutex<()>,
    metrics: Option<Metrics>,
}

impl VisitStore {
    /// Create a store for `path`. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            increment_lock: Mutex::new(()),
            metrics: None,
        }
    }

    /// Count persistence failures in `metrics`
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted count
    ///
    /// A missing file is the first-run state and yields `Ok(0)`.
    pub async fn try_load(&self) -> Result<u64, VisitStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %self.path.display(),
                    "Visit counter file does not exist yet, starting from zero"
                );
                return Ok(0);
            }
            Err(source) => {
                return Err(VisitStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        content
            .trim()
            .parse::<u64>()
            .map_err(|source| VisitStoreError::Parse {
                path: self.path.clone(),
                content,
                source,
            })
    }

    /// Read the persisted count, or `0` on any failure
    pub async fn load(&self) -> u64 {
        match self.try_load().await {
            Ok(count) => count,
            Err(e) => {
                self.report(&e);
                0
            }
        }
    }

    /// Write `count`, creating missing parent directories
    pub async fn try_save(&self, count: u64) -> Result<(), VisitStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| VisitStoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let tmp_path = self.tmp_path();
        let write_err = |source: std::io::Error| VisitStoreError::Write {
            path: self.path.clone(),
            source,
        };

        tokio::fs::write(&tmp_path, count.to_string())
            .await
            .map_err(write_err)?;

        if let Err(source) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(write_err(source));
        }

        Ok(())
    }

    /// Write `count`; failures are logged and dropped
    pub async fn save(&self, count: u64) {
        if let Err(e) = self.try_save(count).await {
            self.report(&e);
        }
    }

    /// Add one visit and return the new count
    ///
    /// The returned count is what the store attempted to persist; if the
    /// write failed it may not survive.
    pub async fn increment(&self) -> u64 {
        let _guard = self.increment_lock.lock().await;
        let count = self.load().await.saturating_add(1);
        self.save(count).await;
        count
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn report(&self, error: &VisitStoreError) {
        tracing::warn!(
            error = %error,
            operation = error.operation(),
            path = %self.path.display(),
            "Visit counter persistence failed, continuing without it"
        );
        if let Some(metrics) = &self.metrics {
            metrics.visit_store_failure(error.operation());
        }
    }
}
