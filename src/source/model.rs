//! Wire types for the Notion database query endpoint.
//!
//! Only the parts of a page the sync reads are modeled. Properties stay as
//! raw JSON on [`NotionPage`] and are projected into the typed shapes below
//! one field at a time, so an unexpected property type on a page never fails
//! the whole response.

use serde::{Deserialize, Serialize};

/// One page of results from `POST /v1/databases/{id}/query`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<NotionPage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Request body for the query endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

/// A database row as returned by Notion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// Error body Notion sends alongside non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Property shapes ─────────────────────────────────────────────────

/// A `title` property.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleProperty {
    #[serde(default)]
    pub title: Option<Vec<RichText>>,
}

/// One rich-text segment. Formatting changes split text into segments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: Option<String>,
    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub content: Option<String>,
}

impl RichText {
    /// Segment text, preferring `text.content` over `plain_text`.
    pub fn content(&self) -> Option<&str> {
        self.text
            .as_ref()
            .and_then(|t| t.content.as_deref())
            .or(self.plain_text.as_deref())
    }
}

/// A `select` or `status` property. Both carry a named option.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionProperty {
    #[serde(default)]
    pub select: Option<SelectOption>,
    #[serde(default)]
    pub status: Option<SelectOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: Option<String>,
}

/// A `date` property.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateProperty {
    #[serde(default)]
    pub date: Option<DateValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
}
