//! Notion query client — walks every page of a database query.

use std::collections::HashSet;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::source::TaskSource;
use crate::source::model::{ApiErrorBody, NotionPage, QueryRequest, QueryResponse};

/// HTTP client for one Notion database.
pub struct NotionClient {
    config: SourceConfig,
    client: reqwest::Client,
}

impl NotionClient {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn query_url(&self) -> String {
        format!(
            "{}/v1/databases/{}/query",
            self.config.api_url.trim_end_matches('/'),
            self.config.database_id
        )
    }

    /// Issue a single query request, continuing from `cursor` if given.
    pub async fn query_page(&self, cursor: Option<&str>) -> Result<QueryResponse, SourceError> {
        let body = QueryRequest {
            page_size: self.config.page_size,
            start_cursor: cursor,
        };

        let resp = self
            .client
            .post(self.query_url())
            .bearer_auth(self.config.token.expose_secret())
            .header("Notion-Version", &self.config.notion_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Http {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let api_error: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                code: api_error.code.unwrap_or_else(|| "unknown".to_string()),
                message: api_error.message.unwrap_or(text),
            });
        }

        resp.json::<QueryResponse>()
            .await
            .map_err(|e| SourceError::InvalidResponse {
                reason: e.to_string(),
            })
    }

    /// Fetch every record in the database, following continuation cursors.
    ///
    /// Pages are requested one after another and concatenated in the order
    /// Notion returns them. Any failed request aborts the whole fetch, as
    /// does a cursor that was already requested earlier in the walk.
    pub async fn fetch_all(&self) -> Result<Vec<NotionPage>, SourceError> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen: HashSet<String> = HashSet::new();
        let mut requests = 0usize;

        loop {
            let page = self.query_page(cursor.as_deref()).await?;
            requests += 1;
            debug!(
                request = requests,
                records = page.results.len(),
                has_more = page.has_more,
                "Fetched query page"
            );
            records.extend(page.results);

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => {
                    if !seen.insert(next.clone()) {
                        return Err(SourceError::RepeatedCursor { cursor: next });
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        info!(
            database_id = %self.config.database_id,
            records = records.len(),
            requests,
            "Fetched all task records"
        );
        Ok(records)
    }
}

#[async_trait]
impl TaskSource for NotionClient {
    async fn fetch_all(&self) -> Result<Vec<NotionPage>, SourceError> {
        NotionClient::fetch_all(self).await
    }
}
