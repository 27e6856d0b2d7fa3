//! Report storage.

use chrono::{DateTime, Utc};
use civic_report_assignment_models::{Report, ReportLocation};
use duckdb::{Connection, Row};

use crate::DbError;

const REPORT_COLUMNS: &str = "id, title, description, category_id, reporter_id, latitude, \
     longitude, address, city, region_label, region_id, assigned_to_id, created_at::TEXT";

/// A report row with its timestamp still in `DuckDB`'s text form.
struct ReportRow {
    id: String,
    title: String,
    description: Option<String>,
    category_id: Option<String>,
    reporter_id: Option<String>,
    latitude: f64,
    longitude: f64,
    address: Option<String>,
    city: Option<String>,
    region_label: Option<String>,
    region_id: Option<String>,
    assigned_to_id: Option<String>,
    created_at: String,
}

impl ReportRow {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            category_id: row.get(3)?,
            reporter_id: row.get(4)?,
            latitude: row.get(5)?,
            longitude: row.get(6)?,
            address: row.get(7)?,
            city: row.get(8)?,
            region_label: row.get(9)?,
            region_id: row.get(10)?,
            assigned_to_id: row.get(11)?,
            created_at: row.get(12)?,
        })
    }

    fn into_report(self) -> Result<Report, DbError> {
        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| DbError::Conversion {
            message: format!(
                "Report {} has unparseable created_at {:?}",
                self.id, self.created_at
            ),
        })?;

        Ok(Report {
            id: self.id,
            title: self.title,
            description: self.description,
            category_id: self.category_id,
            reporter_id: self.reporter_id,
            location: ReportLocation {
                latitude: self.latitude,
                longitude: self.longitude,
                address: self.address,
                city: self.city,
                region: self.region_label,
            },
            region_id: self.region_id,
            assigned_to_id: self.assigned_to_id,
            created_at,
        })
    }
}

/// Inserts a new report.
///
/// # Errors
///
/// Returns [`DbError`] if the write fails, including when a report with
/// the same id already exists.
pub fn insert_report(conn: &Connection, report: &Report) -> Result<(), DbError> {
    let created_at = report.created_at.format("%Y-%m-%d %H:%M:%S%.6f").to_string();
    let location = &report.location;

    conn.execute(
        "INSERT INTO reports (
            id, title, description, category_id, reporter_id, latitude, longitude,
            address, city, region_label, region_id, assigned_to_id, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        duckdb::params![
            report.id,
            report.title,
            report.description,
            report.category_id,
            report.reporter_id,
            location.latitude,
            location.longitude,
            location.address,
            location.city,
            location.region,
            report.region_id,
            report.assigned_to_id,
            created_at,
        ],
    )?;

    Ok(())
}

/// Looks up a report by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the stored row is invalid.
pub fn get_report(conn: &Connection, id: &str) -> Result<Option<Report>, DbError> {
    let mut stmt = conn.prepare(&format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?"))?;
    let row = stmt.query_map([id], ReportRow::from_row)?.next().transpose()?;

    row.map(ReportRow::into_report).transpose()
}

/// Returns all reports, oldest first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored row is invalid.
pub fn list_reports(conn: &Connection) -> Result<Vec<Report>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_at, id"
    ))?;
    let rows = stmt.query_map([], ReportRow::from_row)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?.into_report()?);
    }

    Ok(reports)
}

/// Parses a `DuckDB` timestamp text representation into a UTC `DateTime`.
///
/// `DuckDB`'s `::TEXT` cast omits the fractional part when it is zero and
/// may or may not append an offset, so each variant is tried in turn.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    use chrono::NaiveDateTime;

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    // No offset: stored values are always UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    log::warn!("Failed to parse timestamp: {s:?}");
    None
}
