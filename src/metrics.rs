use std::time::Duration;

use metrics::{counter, histogram};

use crate::error::ErrorKind;
use crate::models::SyncReport;

/// Metric names emitted by a sync
///
/// Nothing is exported unless the embedding application installs a
/// `metrics` recorder; without one every call is a no-op.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    /// Counter of sync runs, labelled by `status` and `error_kind`
    pub sync_runs_total: &'static str,
    /// Counter of rows read from CSV and staged
    pub rows_staged_total: &'static str,
    /// Counter of new locations
    pub rows_inserted_total: &'static str,
    /// Counter of overwritten locations
    pub rows_updated_total: &'static str,
    /// Histogram of sync duration in seconds
    pub sync_duration: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            sync_runs_total: "location_sync_runs_total",
            rows_staged_total: "location_sync_rows_staged_total",
            rows_inserted_total: "location_sync_rows_inserted_total",
            rows_updated_total: "location_sync_rows_updated_total",
            sync_duration: "location_sync_duration_seconds",
        }
    }
}

impl MetricsCollector {
    /// Record a committed sync
    pub fn record_sync_success(&self, report: &SyncReport, duration: Duration) {
        counter!(self.sync_runs_total, "status" => "success").increment(1);
        counter!(self.rows_staged_total).increment(report.rows_read);
        counter!(self.rows_inserted_total).increment(report.inserted);
        counter!(self.rows_updated_total).increment(report.updated);
        histogram!(self.sync_duration, "status" => "success").record(duration.as_secs_f64());
    }

    /// Record a rolled back sync
    pub fn record_sync_failure(&self, kind: ErrorKind, duration: Duration) {
        counter!(self.sync_runs_total, "status" => "error", "error_kind" => kind.as_str()).increment(1);
        histogram!(self.sync_duration, "status" => "error").record(duration.as_secs_f64());
    }
}
