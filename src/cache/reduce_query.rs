//! # Daily freshness cache.
//!
//! [`ReduceQuery`] keeps the tabular result of an expensive query for the rest
//! of the calendar day, in two tiers: an in-memory copy and a CSV file whose
//! modification date tells when it was produced.
//!
//! ## Flow
//! ```text
//! call(args)
//!   ├─ always_query ──────────────────────► target(args)
//!   ├─ memory fresh ─► [disk stale] save ─► memory rows
//!   ├─ disk fresh   ─► load into memory ──► disk rows
//!   └─ both stale   ─► target(args) ─► memory ─► save ─► fresh rows
//! ```
//!
//! ## Rules
//! - The target runs only when both tiers are stale: once per calendar day
//!   per wrapper, whatever the call volume.
//! - A missing file counts as stale.
//! - A stale file next to fresh memory is rewritten from memory on the next
//!   call; nothing refreshes the file between calls.
//! - Calls are serialized by an async mutex held across the whole check, so
//!   concurrent callers never query twice for the same day.
//! - A failing target leaves both tiers untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::cache::clock::{Clock, LocalClock};
use crate::cache::store::CsvFile;
use crate::calls::{Call, Site};
use crate::error::{CacheError, CallError, ConfigError};

/// In-memory tier.
struct Entry<R> {
    rows: Vec<R>,
    produced: NaiveDate,
}

fn cache_err<E: From<CallError>>(e: CacheError) -> E {
    tracing::warn!(label = e.as_label(), path = ?e.path(), error = %e, "cache file unusable");
    CallError::Cache(e).into()
}

/// Two-tier, once-a-day query cache.
pub struct ReduceQuery<W, R> {
    inner: W,
    file: CsvFile,
    always_query: bool,
    clock: Arc<dyn Clock>,
    memory: Mutex<Option<Entry<R>>>,
}

impl<W, R> ReduceQuery<W, R> {
    /// Caches the results of `inner` in memory and in the CSV file at `path`.
    ///
    /// Returns [`ConfigError::EmptyCachePath`] if `path` is empty.
    pub fn new(inner: W, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyCachePath);
        }
        Ok(Self {
            inner,
            file: CsvFile::new(path),
            always_query: false,
            clock: Arc::new(LocalClock),
            memory: Mutex::new(None),
        })
    }

    /// Bypasses both tiers: every call runs the target and nothing is stored.
    pub fn always_query(mut self, always: bool) -> Self {
        self.always_query = always;
        self
    }

    /// Replaces the local-time clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Cache file location.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Drops the in-memory tier; the file is left alone.
    pub async fn invalidate(&self) {
        *self.memory.lock().await = None;
    }
}

#[async_trait]
impl<A, W, R, E> Call<A> for ReduceQuery<W, R>
where
    A: Send + 'static,
    W: Call<A, Output = Result<Vec<R>, E>>,
    R: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    E: From<CallError> + Send + 'static,
{
    type Output = Result<Vec<R>, E>;

    fn site(&self) -> &Site {
        self.inner.site()
    }

    async fn call(&self, args: A) -> Result<Vec<R>, E> {
        if self.always_query {
            return self.inner.call(args).await;
        }

        let mut memory = self.memory.lock().await;
        let today = self.clock.today();
        let disk_fresh = self
            .file
            .modified()
            .await
            .map_err(cache_err::<E>)?
            .is_some_and(|at| self.clock.date_of(at) == today);

        if let Some(entry) = memory.as_ref().filter(|e| e.produced == today) {
            if !disk_fresh {
                tracing::debug!(call = self.inner.name(), path = ?self.path(), "rewriting stale cache file from memory");
                self.file.save(&entry.rows).await.map_err(cache_err::<E>)?;
            }
            return Ok(entry.rows.clone());
        }

        if disk_fresh {
            tracing::debug!(call = self.inner.name(), path = ?self.path(), "serving cache file");
            let rows: Vec<R> = self.file.load().await.map_err(cache_err::<E>)?;
            *memory = Some(Entry {
                rows: rows.clone(),
                produced: today,
            });
            return Ok(rows);
        }

        tracing::debug!(call = self.inner.name(), %today, "cache stale, querying");
        let rows = self.inner.call(args).await?;
        *memory = Some(Entry {
            rows: rows.clone(),
            produced: today,
        });
        self.file.save(&rows).await.map_err(cache_err::<E>)?;
        Ok(rows)
    }
}
