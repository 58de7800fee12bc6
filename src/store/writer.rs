//! Upsert writer — pushes mapped rows into a [`TaskStore`] one at a time.
//!
//! Every row gets its own transaction. A row that fails is rolled back,
//! logged and recorded in the report; the rows after it are still written.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::store::traits::TaskStore;
use crate::tasks::model::TaskRow;

/// Log a running total after this many rows.
const PROGRESS_EVERY: usize = 100;

/// A row that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub id: String,
    pub reason: String,
}

/// Outcome of writing one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Rows committed.
    pub written: usize,
    /// Rows rolled back, in the order they were attempted.
    pub failed: Vec<RowFailure>,
}

impl WriteReport {
    pub fn attempted(&self) -> usize {
        self.written + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upsert every row in order, stamping each with `synced_at`.
pub async fn write_rows(
    store: &dyn TaskStore,
    rows: &[TaskRow],
    synced_at: DateTime<Utc>,
) -> WriteReport {
    let mut report = WriteReport::default();

    for (i, row) in rows.iter().enumerate() {
        match store.upsert_task(row, synced_at).await {
            Ok(()) => report.written += 1,
            Err(e) => {
                error!(id = %row.id, error = %e, "Failed to upsert task, row rolled back");
                report.failed.push(RowFailure {
                    id: row.id.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let done = i + 1;
        if done % PROGRESS_EVERY == 0 && done < rows.len() {
            info!(
                done,
                total = rows.len(),
                written = report.written,
                failed = report.failed.len(),
                "Upsert progress"
            );
        }
    }

    report
}
