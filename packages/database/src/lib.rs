#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `DuckDB` storage for regions, users, and reports.
//!
//! Boundaries are stored as `GeoJSON` TEXT and validated when read, so a
//! malformed boundary written by admin tooling never blocks report
//! creation. [`DuckDbStore`] plugs the tables into the report-creation
//! flow in `civic_report_assignment`.

pub mod db;
pub mod paths;
pub mod regions;
pub mod reports;
pub mod users;

use civic_report_assignment::ReportStore;
use civic_report_assignment_models::{Official, Report};
use civic_report_region_models::Region;
use duckdb::Connection;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` parsing error.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// A [`ReportStore`] backed by a single `DuckDB` connection.
pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    /// Wraps an open connection whose schema already exists (see
    /// [`db::open`]).
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ReportStore for DuckDbStore {
    type Error = DbError;

    fn regions(&self) -> Result<Vec<Region>, DbError> {
        regions::list_regions(&self.conn)
    }

    fn officers(&self) -> Result<Vec<Official>, DbError> {
        users::list_officers(&self.conn)
    }

    fn insert_report(&mut self, report: &Report) -> Result<(), DbError> {
        reports::insert_report(&self.conn, report)
    }
}
