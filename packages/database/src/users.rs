//! User storage and the officer roster.

use std::str::FromStr as _;

use civic_report_assignment_models::{Official, Role, User};
use civic_report_region_models::{Region, RegionRecord};
use duckdb::Connection;

use crate::{DbError, regions::parse_boundary_text};

/// Inserts or replaces a user.
///
/// # Errors
///
/// Returns [`DbError`] if the write fails.
pub fn upsert_user(conn: &Connection, user: &User) -> Result<(), DbError> {
    conn.execute(
        "INSERT OR REPLACE INTO users (id, name, role, region_id) VALUES (?, ?, ?, ?)",
        duckdb::params![user.id, user.name, user.role.as_ref(), user.region_id],
    )?;
    Ok(())
}

/// Returns all users ordered by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored role is unknown.
pub fn list_users(conn: &Connection) -> Result<Vec<User>, DbError> {
    let mut stmt = conn.prepare("SELECT id, name, role, region_id FROM users ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut users = Vec::new();
    for row in rows {
        let (id, name, role, region_id) = row?;
        let role = parse_role(&id, &role)?;
        users.push(User {
            id,
            name,
            role,
            region_id,
        });
    }

    Ok(users)
}

/// Returns every user with role `OFFICER`, ordered by id, with their
/// region joined in.
///
/// An officer whose `region_id` names a missing region keeps the id (it
/// can still match directly) but has no joined region.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_officers(conn: &Connection) -> Result<Vec<Official>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.region_id, r.id, r.name, r.polygon_geojson
         FROM users u
         LEFT JOIN regions r ON r.id = u.region_id
         WHERE u.role = ?
         ORDER BY u.id",
    )?;
    let rows = stmt.query_map([Role::Officer.as_ref()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    })?;

    let mut officers = Vec::new();
    for row in rows {
        let (id, region_id, joined_id, joined_name, polygon_geojson) = row?;

        let region = joined_id.map(|joined_id| {
            let polygon = parse_boundary_text(&joined_id, polygon_geojson.as_deref());
            Region::from_record(RegionRecord {
                name: joined_name.unwrap_or_else(|| joined_id.clone()),
                id: joined_id,
                polygon,
            })
        });

        officers.push(Official {
            id,
            role: Role::Officer,
            region_id,
            region,
        });
    }

    log::debug!("Loaded {} officers", officers.len());

    Ok(officers)
}

fn parse_role(user_id: &str, role: &str) -> Result<Role, DbError> {
    Role::from_str(role).map_err(|e| DbError::Conversion {
        message: format!("User {user_id} has unknown role {role:?}: {e}"),
    })
}
