//! notion-sync — one-shot Notion database to libSQL task synchronizer.

pub mod config;
pub mod error;
pub mod source;
pub mod store;
pub mod sync;
pub mod tasks;
