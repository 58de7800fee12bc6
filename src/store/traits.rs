//! `TaskStore` trait — the destination interface the writer drives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DatabaseError;
use crate::tasks::model::{StoredTask, TaskRow};

/// Backend-agnostic destination for synced tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create the tasks table if it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), DatabaseError>;

    /// Insert a row, or overwrite the existing row with the same id.
    ///
    /// Runs in its own transaction: on error nothing from this call is kept.
    async fn upsert_task(&self, row: &TaskRow, synced_at: DateTime<Utc>)
    -> Result<(), DatabaseError>;

    /// Look up a stored task by id.
    async fn get_task(&self, id: &str) -> Result<Option<StoredTask>, DatabaseError>;

    /// Number of rows in the tasks table.
    async fn count_tasks(&self) -> Result<usize, DatabaseError>;
}
