//! API layer
//!
//! HTTP handlers for:
//! - User existence checks and imports
//! - Post existence checks, bulk imports and spreadsheet downloads
//! - Metrics (Prometheus)

mod dto;
mod extract;
pub mod metrics;
mod posts;
mod users;

pub use dto::*;
pub use extract::{ApiJson, ApiQuery};

pub use metrics::{metrics_router, track_requests};
pub use posts::{XLSX_CONTENT_TYPE, posts_router};
pub use users::users_router;
