//! Record mapper — projects a raw Notion page onto a [`TaskRow`].
//!
//! Each column has its own projection returning `None` when the value is
//! absent or unusable. Mapping a page never fails; missing values become an
//! empty string or no due date.

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::PropertyNames;
use crate::source::model::{DateProperty, NotionPage, OptionProperty, TitleProperty};
use crate::tasks::model::TaskRow;

/// Map one page to a row.
pub fn map_page(page: &NotionPage, names: &PropertyNames) -> TaskRow {
    TaskRow {
        id: page.id.clone(),
        name: extract_name(page, &names.title).unwrap_or_default(),
        status: extract_status(page, &names.status).unwrap_or_default(),
        due_date: extract_due_date(page, &names.due_date),
    }
}

/// Map a batch of pages, preserving order.
pub fn map_pages(pages: &[NotionPage], names: &PropertyNames) -> Vec<TaskRow> {
    pages.iter().map(|page| map_page(page, names)).collect()
}

/// Concatenated text of the title property.
pub fn extract_name(page: &NotionPage, property: &str) -> Option<String> {
    let title = property_as::<TitleProperty>(page, property)?.title?;
    let name: String = title.iter().filter_map(|segment| segment.content()).collect();
    (!name.is_empty()).then_some(name)
}

/// Option name of a `select` or `status` property.
pub fn extract_status(page: &NotionPage, property: &str) -> Option<String> {
    let prop = property_as::<OptionProperty>(page, property)?;
    prop.select
        .or(prop.status)
        .and_then(|option| option.name)
        .filter(|name| !name.is_empty())
}

/// Calendar date at the start of a `date` property.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 date-times (reduced to their date).
/// Anything else is logged and dropped.
pub fn extract_due_date(page: &NotionPage, property: &str) -> Option<NaiveDate> {
    let raw = property_as::<DateProperty>(page, property)?.date?.start?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match parse_calendar_date(raw) {
        Some(date) => Some(date),
        None => {
            warn!(
                page_id = %page.id,
                property,
                value = raw,
                "Unparseable due date, syncing task without one"
            );
            None
        }
    }
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Deserialize a named property into `T`, or `None` if absent or mis-shaped.
fn property_as<T: DeserializeOwned>(page: &NotionPage, property: &str) -> Option<T> {
    let value = page.properties.get(property)?;
    T::deserialize(value).ok()
}
