//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services wrap the shared `Database` handle.

mod existence;
mod export;
mod import;

pub use existence::ExistenceChecker;
pub use export::{ExportService, POSTS_HEADERS, POSTS_SHEET_NAME, build_posts_workbook};
pub use import::ImportService;
