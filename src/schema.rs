//! Database schema definitions
//!
//! This module provides constants for table and column names used with rusqlite.

/// Location table schema
pub mod location {
    /// Table name
    pub const TABLE: &str = "location";
    /// Primary key column, also the merge conflict key
    pub const CRITERIA_ID: &str = "criteria_id";
    /// Display name column
    pub const NAME: &str = "name";
    /// Fully-qualified name column
    pub const CANONICAL_NAME: &str = "canonical_name";
    /// Parent location id, NULL for top-level locations; not a foreign key
    pub const PARENT_ID: &str = "parent_id";
    /// Country code column
    pub const COUNTRY_CODE: &str = "country_code";
    /// Target type column (City, Country, ...)
    pub const TARGET_TYPE: &str = "target_type";
    /// Lifecycle status column
    pub const STATUS: &str = "status";

    /// All columns in CSV header order
    pub const COLUMNS: [&str; 7] = [
        CRITERIA_ID,
        NAME,
        CANONICAL_NAME,
        PARENT_ID,
        COUNTRY_CODE,
        TARGET_TYPE,
        STATUS,
    ];

    /// DDL for a fresh destination table
    pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS location (
        criteria_id    INTEGER PRIMARY KEY,
        name           TEXT NOT NULL,
        canonical_name TEXT NOT NULL,
        parent_id      INTEGER,
        country_code   TEXT NOT NULL,
        target_type    TEXT NOT NULL,
        status         TEXT NOT NULL
    )";
}

/// Staging table schema
///
/// Lives in the `temp` schema and only for the duration of one sync
/// transaction. Everything except `criteria_id` is kept as raw text.
pub mod location_staging {
    /// Qualified table name
    pub const TABLE: &str = "temp.location_staging";

    /// DDL for the staging table
    pub const CREATE_TABLE: &str = "CREATE TEMP TABLE location_staging (
        criteria_id    INTEGER NOT NULL,
        name           TEXT NOT NULL,
        canonical_name TEXT NOT NULL,
        parent_id      TEXT NOT NULL,
        country_code   TEXT NOT NULL,
        target_type    TEXT NOT NULL,
        status         TEXT NOT NULL
    )";

    /// DDL removing the staging table
    pub const DROP_TABLE: &str = "DROP TABLE IF EXISTS temp.location_staging";
}
