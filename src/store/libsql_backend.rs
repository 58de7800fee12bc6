//! libSQL backend — async `TaskStore` implementation.
//!
//! Supports local file, in-memory and remote libSQL databases. A single
//! connection is opened per backend and held for the whole run.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::config::DestinationConfig;
use crate::error::DatabaseError;
use crate::store::traits::TaskStore;
use crate::tasks::model::{StoredTask, TaskRow};

/// Destination table name.
const TASKS_TABLE: &str = "notion_tasks";

const CREATE_TASKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS notion_tasks (
    id TEXT PRIMARY KEY,
    name TEXT,
    status TEXT,
    due_date DATE,
    last_synced TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const UPSERT_TASK: &str = "INSERT INTO notion_tasks (id, name, status, due_date, last_synced)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT (id) DO UPDATE SET
         name = excluded.name,
         status = excluded.status,
         due_date = excluded.due_date,
         last_synced = excluded.last_synced";

const TASK_COLUMNS: &str = "id, name, status, due_date, last_synced";

/// libSQL database backend.
pub struct LibSqlBackend {
    // Keeps the database handle alive for as long as `conn` is in use.
    _db: LibSqlDatabase,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open the destination described by `config`.
    pub async fn open(config: &DestinationConfig) -> Result<Self, DatabaseError> {
        match config {
            DestinationConfig::Local { path } => Self::new_local(path).await,
            DestinationConfig::Remote { url, auth_token } => {
                Self::new_remote(url, auth_token).await
            }
        }
    }

    /// Open (or create) a local database file.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::connect(db)?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        Self::connect(db)
    }

    /// Connect to a remote libSQL server.
    pub async fn new_remote(url: &str, auth_token: &SecretString) -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_remote(url.to_string(), auth_token.expose_secret().to_string())
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open remote database {url}: {e}")))?;

        let backend = Self::connect(db)?;
        info!(url, "Remote database opened");
        Ok(backend)
    }

    fn connect(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self { _db: db, conn })
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // RFC 3339 is what upsert_task writes
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // CURRENT_TIMESTAMP default
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ndt.and_utc());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(ndt.and_utc());
    }
    None
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Map a libsql Row to a StoredTask. Column order matches TASK_COLUMNS.
fn row_to_task(row: &libsql::Row) -> Result<StoredTask, DatabaseError> {
    let id: String = row
        .get(0)
        .map_err(|e| DatabaseError::Query(format!("task.id: {e}")))?;
    let name: String = row.get(1).unwrap_or_default();
    let status: String = row.get(2).unwrap_or_default();
    let due_date = row
        .get::<String>(3)
        .ok()
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());
    let last_synced_str: String = row.get(4).unwrap_or_default();
    let last_synced = parse_datetime(&last_synced_str).unwrap_or_else(|| {
        warn!(
            id = %id,
            value = %last_synced_str,
            "Unparseable last_synced, reading it back as the minimum timestamp"
        );
        DateTime::<Utc>::MIN_UTC
    });

    Ok(StoredTask {
        id,
        name,
        status,
        due_date,
        last_synced,
    })
}

#[async_trait]
impl TaskStore for LibSqlBackend {
    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        self.conn()
            .execute(CREATE_TASKS_TABLE, ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("create {TASKS_TABLE}: {e}")))?;
        debug!(table = TASKS_TABLE, "Schema ensured");
        Ok(())
    }

    async fn upsert_task(
        &self,
        row: &TaskRow,
        synced_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let tx = self
            .conn()
            .transaction()
            .await
            .map_err(|e| DatabaseError::Query(format!("begin upsert_task {}: {e}", row.id)))?;

        let result = tx
            .execute(
                UPSERT_TASK,
                params![
                    row.id.as_str(),
                    row.name.as_str(),
                    row.status.as_str(),
                    row.due_date.map(format_date),
                    synced_at.to_rfc3339_opts(SecondsFormat::Micros, true)
                ],
            )
            .await;

        match result {
            Ok(_) => {
                tx.commit().await.map_err(|e| {
                    DatabaseError::Query(format!("commit upsert_task {}: {e}", row.id))
                })?;
                debug!(id = %row.id, "Task upserted");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(id = %row.id, error = %rollback_err, "Rollback after failed upsert failed");
                }
                Err(DatabaseError::Query(format!("upsert_task {}: {e}", row.id)))
            }
        }
    }

    async fn get_task(&self, id: &str) -> Result<Option<StoredTask>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {TASK_COLUMNS} FROM {TASKS_TABLE} WHERE id = ?1"),
                params![id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_task: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_task(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_task: {e}"))),
        }
    }

    async fn count_tasks(&self) -> Result<usize, DatabaseError> {
        let mut rows = self
            .conn()
            .query(&format!("SELECT COUNT(*) FROM {TASKS_TABLE}"), ())
            .await
            .map_err(|e| DatabaseError::Query(format!("count_tasks: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let count: i64 = row.get(0).unwrap_or(0);
                Ok(count.max(0) as usize)
            }
            Ok(None) => Ok(0),
            Err(e) => Err(DatabaseError::Query(format!("count_tasks: {e}"))),
        }
    }
}
