//! Connection setup and schema.
//!
//! Boundaries are plain `GeoJSON` TEXT (no spatial extension). Timestamps
//! are bound as `%Y-%m-%d %H:%M:%S%.6f` text and read back through
//! `::TEXT`.

use std::path::Path;

use duckdb::Connection;

use crate::DbError;

/// Opens (or creates) the database file and ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;

    log::debug!("Opened database at {}", path.display());

    Ok(conn)
}

/// Opens the database at [`crate::paths::default_db_path`].
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_default() -> Result<Connection, DbError> {
    open(&crate::paths::default_db_path())
}

/// Opens a throwaway in-memory database with the schema applied.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS regions (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            polygon_geojson TEXT
        );

        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT,
            role TEXT NOT NULL,
            region_id TEXT
        );

        CREATE TABLE IF NOT EXISTS reports (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            category_id TEXT,
            reporter_id TEXT,
            latitude DOUBLE NOT NULL,
            longitude DOUBLE NOT NULL,
            address TEXT,
            city TEXT,
            region_label TEXT,
            region_id TEXT,
            assigned_to_id TEXT,
            created_at TIMESTAMP NOT NULL
        );",
    )?;

    Ok(())
}
