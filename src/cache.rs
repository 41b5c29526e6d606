//! On-disk response cache
//!
//! One JSON file per entry, named after the MD5 of its key. An entry is fresh
//! while its file modification time is younger than the configured lifetime.
//! Writes land in a temporary file that is renamed into place, so readers
//! never observe partial JSON; concurrent writers race and the last rename wins.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use md5::{Digest, Md5};
use rand::RngExt;
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;
use tracing::{debug, instrument, warn};

use crate::Result;

pub const CACHE_FILE_PREFIX: &str = "weather_cache_backend_";
const CACHE_FILE_SUFFIX: &str = ".json";

/// Where a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit { age_seconds: u64 },
    Miss,
}

impl CacheStatus {
    #[must_use]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit { .. })
    }

    /// 0 on a miss
    #[must_use]
    pub fn age_seconds(&self) -> u64 {
        match self {
            CacheStatus::Hit { age_seconds } => *age_seconds,
            CacheStatus::Miss => 0,
        }
    }

    /// Value of the `X-Cache` header
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit { .. } => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// A value together with its cache status
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub status: CacheStatus,
}

impl<T> Cached<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Cached<U> {
        Cached {
            value: f(self.value),
            status: self.status,
        }
    }
}

/// Outcome of [`ResponseCache::clear`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearReport {
    pub cache_directory: String,
    /// Cache files found before deleting
    pub cache_files: Vec<String>,
    pub deleted_files: Vec<String>,
    pub delete_count: usize,
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    directory: PathBuf,
    lifetime: Duration,
}

impl ResponseCache {
    pub fn new(directory: impl Into<PathBuf>, lifetime: Duration) -> Self {
        Self {
            directory: directory.into(),
            lifetime,
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// File backing `key`
    #[must_use]
    pub fn file_path(&self, key: &str) -> PathBuf {
        let digest = hex::encode(Md5::digest(key.as_bytes()));
        self.directory
            .join(format!("{CACHE_FILE_PREFIX}{digest}{CACHE_FILE_SUFFIX}"))
    }

    /// Fresh entry for `key`, `None` when absent, expired or unreadable.
    #[instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Cached<T>>> {
        let path = self.file_path(key);
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Key not found");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        // an mtime in the future counts as brand new
        let age = metadata.modified()?.elapsed().unwrap_or_default();
        if age >= self.lifetime {
            debug!(age_seconds = age.as_secs(), "Key found but expired");
            return Ok(None);
        }

        let bytes = fs::read(&path).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!(age_seconds = age.as_secs(), "Key found and still fresh");
                Ok(Some(Cached {
                    value,
                    status: CacheStatus::Hit {
                        age_seconds: age.as_secs(),
                    },
                }))
            }
            Err(err) => {
                warn!(error = %err, path = %path.display(), "Ignoring unreadable cache entry");
                Ok(None)
            }
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    #[instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        fs::create_dir_all(&self.directory).await?;

        let path = self.file_path(key);
        let suffix: u32 = rand::rng().random();
        let tmp_path = path.with_extension(format!("{}.{suffix:08x}.tmp", std::process::id()));
        fs::write(&tmp_path, &bytes).await?;
        if let Err(err) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        Ok(())
    }

    /// Serve `key` from the cache or run `fetch` and store its result.
    ///
    /// Failed fetches are returned as-is and never stored. A cache that cannot
    /// be read or written degrades to always fetching.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, fetch: F) -> Result<Cached<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.get(key).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(err) => warn!(key, error = %err, "Cache lookup failed, fetching"),
        }

        let value = fetch().await?;
        if let Err(err) = self.put(key, &value).await {
            warn!(key, error = %err, "Failed to write cache entry");
        }

        Ok(Cached {
            value,
            status: CacheStatus::Miss,
        })
    }

    /// Delete every cache file in the directory.
    ///
    /// Files that fail to delete are left out of `deleted_files`. A missing
    /// directory is an empty cache.
    #[instrument(level = "info", skip(self))]
    pub async fn clear(&self) -> Result<ClearReport> {
        let mut report = ClearReport {
            cache_directory: self.directory.display().to_string(),
            ..ClearReport::default()
        };

        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(report),
            Err(err) => return Err(err.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !(name.starts_with(CACHE_FILE_PREFIX) && name.ends_with(CACHE_FILE_SUFFIX)) {
                continue;
            }
            report.cache_files.push(name.clone());

            match fs::remove_file(entry.path()).await {
                Ok(()) => report.deleted_files.push(name),
                Err(err) => warn!(file = %name, error = %err, "Failed to delete cache file"),
            }
        }

        report.cache_files.sort();
        report.deleted_files.sort();
        report.delete_count = report.deleted_files.len();
        tracing::info!(deleted = report.delete_count, "Cache cleared");
        Ok(report)
    }
}
