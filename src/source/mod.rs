//! Remote source — reads task records out of a Notion database.

pub mod client;
pub mod model;

pub use client::NotionClient;
pub use model::{NotionPage, QueryResponse};

use async_trait::async_trait;

use crate::error::SourceError;

/// Anything that can hand over the complete, ordered list of raw records.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetch every record. Either all of them or an error, never a partial list.
    async fn fetch_all(&self) -> Result<Vec<NotionPage>, SourceError>;
}
