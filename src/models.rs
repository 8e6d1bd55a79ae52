//! Data models for location synchronization
//!
//! This module contains the raw CSV row, its staged and projected forms,
//! and the report returned by a successful sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// One CSV data row, every field as read
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceRow {
    /// Integer identifier, still unparsed
    pub criteria_id: String,
    /// Display name
    pub name: String,
    /// Fully-qualified name
    pub canonical_name: String,
    /// Empty or an integer referencing another location
    pub parent_id: String,
    /// Country code, may be empty
    pub country_code: String,
    /// Category label
    pub target_type: String,
    /// Lifecycle label
    pub status: String,
}

impl SourceRow {
    /// Parse `criteria_id`, the only column typed at staging time.
    ///
    /// `line` is reported back in the error so the offending record can be
    /// found in the file.
    pub fn into_staged(self, line: u64) -> Result<StagedRow> {
        let criteria_id = self
            .criteria_id
            .trim()
            .parse::<i64>()
            .map_err(|_| SyncError::InvalidCriteriaId {
                line,
                value: self.criteria_id.clone(),
            })?;

        Ok(StagedRow {
            criteria_id,
            name: self.name,
            canonical_name: self.canonical_name,
            parent_id: self.parent_id,
            country_code: self.country_code,
            target_type: self.target_type,
            status: self.status,
        })
    }
}

/// A row as held in the staging table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedRow {
    /// Parsed identifier
    pub criteria_id: i64,
    /// Display name
    pub name: String,
    /// Fully-qualified name
    pub canonical_name: String,
    /// Raw parent text
    pub parent_id: String,
    /// Country code
    pub country_code: String,
    /// Category label
    pub target_type: String,
    /// Lifecycle label
    pub status: String,
}

impl StagedRow {
    /// Project into the destination shape.
    ///
    /// An empty `parent_id` becomes `None`; anything else must be an integer.
    pub fn into_location(self) -> Result<Location> {
        let parent_id = parse_parent_id(&self.parent_id).ok_or_else(|| SyncError::InvalidParentId {
            criteria_id: self.criteria_id,
            value: self.parent_id.clone(),
        })?;

        Ok(Location {
            criteria_id: self.criteria_id,
            name: self.name,
            canonical_name: self.canonical_name,
            parent_id,
            country_code: self.country_code,
            target_type: self.target_type,
            status: self.status,
        })
    }
}

// Outer None means "not parseable", inner None means "no parent".
// Only the exact empty string means no parent; blanks are not a number.
fn parse_parent_id(raw: &str) -> Option<Option<i64>> {
    if raw.is_empty() {
        return Some(None);
    }
    raw.trim().parse::<i64>().ok().map(Some)
}

/// A row of the destination `location` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Primary key
    pub criteria_id: i64,
    /// Display name
    pub name: String,
    /// Fully-qualified name
    pub canonical_name: String,
    /// Parent location, `None` at the top of the hierarchy
    pub parent_id: Option<i64>,
    /// Country code
    pub country_code: String,
    /// Category label
    pub target_type: String,
    /// Lifecycle label
    pub status: String,
}

/// Outcome of a successful sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// File path, or a label for reader input
    pub source: String,
    /// Data rows staged from the file
    pub rows_read: u64,
    /// Distinct `criteria_id` values in the file
    pub distinct_ids: u64,
    /// Ids that were not in the table before
    pub inserted: u64,
    /// Ids that were already in the table and got overwritten
    pub updated: u64,
    /// When the transaction was opened
    pub started_at: DateTime<Utc>,
    /// When the transaction committed
    pub finished_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} rows read, {} distinct ids, {} inserted, {} updated in {} ms",
            self.source, self.rows_read, self.distinct_ids, self.inserted, self.updated, self.duration_ms
        )
    }
}
