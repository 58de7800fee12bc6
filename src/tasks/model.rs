//! Task rows — the flat shape written to the `notion_tasks` table.

use chrono::{DateTime, NaiveDate, Utc};

/// A task after mapping, ready to be upserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    /// Notion page ID, used verbatim as the primary key.
    pub id: String,
    /// Page title. Empty when the page has none.
    pub name: String,
    /// Selected status option. Empty when unset.
    pub status: String,
    /// Start of the due date property, if it holds a parseable date.
    pub due_date: Option<NaiveDate>,
}

impl TaskRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            status: String::new(),
            due_date: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A row as it currently sits in the destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTask {
    pub id: String,
    pub name: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub last_synced: DateTime<Utc>,
}

impl StoredTask {
    /// The mapped-row portion of this stored task.
    pub fn row(&self) -> TaskRow {
        TaskRow {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status.clone(),
            due_date: self.due_date,
        }
    }
}
