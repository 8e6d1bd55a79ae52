use std::fs;
use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::Result;
use crate::models::{Location, SyncReport};
use crate::schema::location;
use crate::sync::sync_locations;

/// Database handle owning a single SQLite connection
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `path`.
    ///
    /// The `location` table is not created here; a sync expects it to exist.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        debug!(path = %path.display(), "Opened location database");

        Ok(Self { conn })
    }

    /// Open an in-memory database, mostly useful for tests
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the `location` table if it does not exist yet
    pub fn create_location_table(&self) -> Result<()> {
        self.conn.execute_batch(location::CREATE_TABLE)?;
        Ok(())
    }

    /// Borrow the underlying connection
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Mutably borrow the underlying connection, needed to open transactions
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Merge a CSV file into the `location` table
    pub fn sync_file(&mut self, path: &Path) -> Result<SyncReport> {
        sync_locations(&mut self.conn, path)
    }

    /// Get a location by its criteria id
    pub fn get_location(&self, criteria_id: i64) -> Result<Option<Location>> {
        let location = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE {} = ?",
                    location::COLUMNS.join(", "),
                    location::TABLE,
                    location::CRITERIA_ID
                ),
                params![criteria_id],
                map_location,
            )
            .optional()?;

        Ok(location)
    }

    /// All locations ordered by criteria id
    pub fn list_locations(&self) -> Result<Vec<Location>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY {} ASC",
            location::COLUMNS.join(", "),
            location::TABLE,
            location::CRITERIA_ID
        ))?;

        let location_iter = stmt.query_map([], map_location)?;

        let mut results = Vec::new();
        for location in location_iter {
            results.push(location?);
        }

        Ok(results)
    }

    /// Number of rows in the `location` table
    pub fn count_locations(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", location::TABLE),
            [],
            |row| row.get(0),
        )?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

/// Map a database row to a Location
fn map_location(row: &Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        criteria_id: row.get(location::CRITERIA_ID)?,
        name: row.get(location::NAME)?,
        canonical_name: row.get(location::CANONICAL_NAME)?,
        parent_id: row.get(location::PARENT_ID)?,
        country_code: row.get(location::COUNTRY_CODE)?,
        target_type: row.get(location::TARGET_TYPE)?,
        status: row.get(location::STATUS)?,
    })
}
