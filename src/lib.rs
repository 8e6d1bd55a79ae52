//! Location Sync - CSV to SQLite location reference data
//!
//! Merges geo-target location rows from a CSV file into a `location` table
//! keyed by `criteria_id`.
//!
//! # Features
//!
//! - Header and integer validation of the source file
//! - Staging in a transaction-scoped TEMP table
//! - Insert-or-overwrite merge, all rows or none
//! - Structured logging, metrics and layered configuration

/// Configuration management
pub mod config;
/// Database handle and location queries
pub mod db;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Database schema definitions
pub mod schema;
/// CSV staging and merge
pub mod sync;

// Re-export key components for easier access
pub use db::Database;
pub use error::{ErrorKind, Result, SyncError};
pub use models::{Location, SyncReport};
pub use sync::{sync_locations, sync_locations_from_reader};
