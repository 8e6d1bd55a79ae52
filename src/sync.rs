//! Location synchronization
//!
//! A sync reads a CSV file of locations, stages the raw rows in a TEMP
//! table, then upserts every staged row into `location` keyed by
//! `criteria_id`. The whole run is one transaction: on any error the
//! transaction is dropped, which rolls it back and takes the staging table
//! with it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{SourceRow, StagedRow, SyncReport};
use crate::schema::{location, location_staging};

/// Merge a CSV file into the `location` table.
pub fn sync_locations(conn: &mut Connection, path: &Path) -> Result<SyncReport> {
    let file = File::open(path)?;
    sync_locations_from_reader(conn, file, &path.display().to_string())
}

/// Merge CSV data from any reader into the `location` table.
///
/// `source` only labels the run in logs and in the returned report.
pub fn sync_locations_from_reader<R: Read>(
    conn: &mut Connection,
    reader: R,
    source: &str,
) -> Result<SyncReport> {
    let timer = OperationTimer::new("location_sync");
    let metrics = MetricsCollector::default();

    info!(source, "Starting location sync");
    let result = run(conn, reader, source);
    let elapsed = timer.finish();

    match &result {
        Ok(report) => {
            info!(
                source,
                rows_read = report.rows_read,
                inserted = report.inserted,
                updated = report.updated,
                "Location sync committed"
            );
            metrics.record_sync_success(report, elapsed);
        }
        Err(e) => {
            warn!(source, error = %e, "Location sync rolled back");
            metrics.record_sync_failure(e.kind(), elapsed);
        }
    }

    result
}

fn run<R: Read>(conn: &mut Connection, reader: R, source: &str) -> Result<SyncReport> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    check_headers(&mut csv_reader)?;

    let started_at = Utc::now();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    // Tables declaring a parent_id foreign key still accept children before parents
    tx.pragma_update(None, "defer_foreign_keys", true)?;

    tx.execute_batch(location_staging::DROP_TABLE)?;
    tx.execute_batch(location_staging::CREATE_TABLE)?;

    let rows_read = stage_rows(&tx, &mut csv_reader)?;
    debug!(rows_read, "Staged CSV rows");

    let (distinct_ids, existing) = count_existing(&tx)?;
    let merged = merge_staged(&tx)?;
    debug!(merged, distinct_ids, existing, "Merged staged rows");

    tx.execute_batch(location_staging::DROP_TABLE)?;
    tx.commit()?;

    let finished_at = Utc::now();
    Ok(SyncReport {
        source: source.to_string(),
        rows_read,
        distinct_ids,
        inserted: distinct_ids - existing,
        updated: existing,
        started_at,
        finished_at,
        duration_ms: u64::try_from((finished_at - started_at).num_milliseconds()).unwrap_or_default(),
    })
}

/// Header must be exactly the location columns, in order.
fn check_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<()> {
    let headers = reader.headers()?;
    if headers.iter().eq(location::COLUMNS.iter().copied()) {
        return Ok(());
    }

    Err(SyncError::HeaderMismatch {
        expected: location::COLUMNS.join(","),
        found: headers.iter().collect::<Vec<_>>().join(","),
    })
}

fn stage_rows<R: Read>(tx: &Transaction<'_>, reader: &mut csv::Reader<R>) -> Result<u64> {
    let headers = reader.headers()?.clone();
    let mut insert = tx.prepare(&format!(
        "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        location_staging::TABLE,
        location::COLUMNS.join(", ")
    ))?;

    let mut rows_read = 0;
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: SourceRow = record.deserialize(Some(&headers))?;
        let staged = row.into_staged(line)?;

        insert.execute(params![
            staged.criteria_id,
            staged.name,
            staged.canonical_name,
            staged.parent_id,
            staged.country_code,
            staged.target_type,
            staged.status,
        ])?;
        rows_read += 1;
    }

    Ok(rows_read)
}

/// Returns (distinct staged ids, how many of them already exist in `location`).
fn count_existing(tx: &Transaction<'_>) -> Result<(u64, u64)> {
    let (distinct, existing): (i64, i64) = tx.query_row(
        &format!(
            "SELECT COUNT(*), COALESCE(SUM(EXISTS (SELECT 1 FROM {table} l WHERE l.{key} = s.{key})), 0)
             FROM (SELECT DISTINCT {key} FROM {staging}) s",
            table = location::TABLE,
            key = location::CRITERIA_ID,
            staging = location_staging::TABLE,
        ),
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok((
        u64::try_from(distinct).unwrap_or_default(),
        u64::try_from(existing).unwrap_or_default(),
    ))
}

/// Project staged rows in file order and upsert each one.
///
/// Later rows win over earlier rows with the same `criteria_id`.
fn merge_staged(tx: &Transaction<'_>) -> Result<u64> {
    let mut select = tx.prepare(&format!(
        "SELECT {} FROM {} ORDER BY rowid",
        location::COLUMNS.join(", "),
        location_staging::TABLE
    ))?;
    let mut upsert = tx.prepare(&upsert_sql())?;

    let staged = select.query_map([], |row| {
        Ok(StagedRow {
            criteria_id: row.get(0)?,
            name: row.get(1)?,
            canonical_name: row.get(2)?,
            parent_id: row.get(3)?,
            country_code: row.get(4)?,
            target_type: row.get(5)?,
            status: row.get(6)?,
        })
    })?;

    let mut merged = 0;
    for row in staged {
        let location = row?.into_location()?;
        upsert.execute(params![
            location.criteria_id,
            location.name,
            location.canonical_name,
            location.parent_id,
            location.country_code,
            location.target_type,
            location.status,
        ])?;
        merged += 1;
    }

    Ok(merged)
}

fn upsert_sql() -> String {
    let assignments = location::COLUMNS[1..]
        .iter()
        .map(|column| format!("{column} = excluded.{column}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT ({}) DO UPDATE SET {}",
        location::TABLE,
        location::COLUMNS.join(", "),
        location::CRITERIA_ID,
        assignments
    )
}
