//! Persistence layer — libSQL-backed destination for synced tasks.

pub mod libsql_backend;
pub mod traits;
pub mod writer;

pub use libsql_backend::LibSqlBackend;
pub use traits::TaskStore;
pub use writer::{RowFailure, WriteReport, write_rows};
