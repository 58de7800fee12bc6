//! Task rows and the mapping from raw Notion pages.

pub mod mapper;
pub mod model;

pub use mapper::{map_page, map_pages};
pub use model::{StoredTask, TaskRow};
