//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite connection pool and migrations
//! - User and post queries

mod database;
mod models;

pub use database::Database;
pub use models::*;
