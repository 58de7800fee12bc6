//! Sync run — fetch every Notion record, map it, upsert it.
//!
//! A run is a single pass:
//! 1. `TaskSource::fetch_all()` — all pages, or a fatal error
//! 2. `map_pages()` — never fails, degrades missing fields
//! 3. `TaskStore::ensure_schema()` then `write_rows()` — per-row isolation
//!
//! Nothing is written unless the fetch completed.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::PropertyNames;
use crate::error::Result;
use crate::source::TaskSource;
use crate::store::{RowFailure, TaskStore, write_rows};
use crate::tasks::map_pages;

/// Summary of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Records returned by the source.
    pub fetched: usize,
    /// Rows committed to the destination.
    pub written: usize,
    /// Rows that were rolled back.
    pub failed: Vec<RowFailure>,
    /// Timestamp stamped on every row written in this run.
    pub synced_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Wall-clock time from the start of the run to the last write.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.synced_at
    }
}

/// Run one full sync from `source` into `store`.
pub async fn run_sync(
    source: &dyn TaskSource,
    store: &dyn TaskStore,
    properties: &PropertyNames,
) -> Result<SyncReport> {
    let synced_at = Utc::now();
    info!("Starting Notion task sync");

    let pages = source.fetch_all().await?;
    let fetched = pages.len();
    info!(fetched, "Fetch complete");

    let rows = map_pages(&pages, properties);

    store.ensure_schema().await?;
    let write = write_rows(store, &rows, synced_at).await;

    let report = SyncReport {
        fetched,
        written: write.written,
        failed: write.failed,
        synced_at,
        finished_at: Utc::now(),
    };

    if report.is_clean() {
        info!(fetched, written = report.written, "Sync complete");
    } else {
        warn!(
            fetched,
            written = report.written,
            failed = report.failed.len(),
            "Sync complete with failed rows"
        );
    }
    Ok(report)
}
