//! Region storage and `GeoJSON` boundary import.

use civic_report_region_models::{Polygon, Region, RegionRecord};
use duckdb::Connection;
use geojson::{Feature, GeoJson, feature::Id};

use crate::DbError;

/// Inserts or replaces a region. The boundary is stored as given, even if
/// it would fail validation; it is validated again on every read.
///
/// # Errors
///
/// Returns [`DbError`] if the boundary cannot be encoded or the write fails.
pub fn upsert_region(conn: &Connection, record: &RegionRecord) -> Result<(), DbError> {
    let polygon_geojson = record
        .polygon
        .as_ref()
        .filter(|value| !value.is_null())
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT OR REPLACE INTO regions (id, name, polygon_geojson) VALUES (?, ?, ?)",
        duckdb::params![record.id, record.name, polygon_geojson],
    )?;

    Ok(())
}

/// Returns all stored region rows ordered by id, boundaries unvalidated.
///
/// A boundary that is not valid JSON at all is logged and read as `None`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_region_records(conn: &Connection) -> Result<Vec<RegionRecord>, DbError> {
    let mut stmt = conn.prepare("SELECT id, name, polygon_geojson FROM regions ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, name, polygon_geojson) = row?;
        let polygon = parse_boundary_text(&id, polygon_geojson.as_deref());
        records.push(RegionRecord { id, name, polygon });
    }

    Ok(records)
}

/// Returns all regions ordered by id, with boundaries validated.
///
/// Containment testing is first-match-wins, so this ordering decides the
/// outcome for points inside overlapping regions.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_regions(conn: &Connection) -> Result<Vec<Region>, DbError> {
    Ok(list_region_records(conn)?
        .into_iter()
        .map(Region::from_record)
        .collect())
}

/// Parses stored boundary text, logging and dropping anything that is not
/// JSON.
pub(crate) fn parse_boundary_text(region_id: &str, text: Option<&str>) -> Option<serde_json::Value> {
    let text = text?;
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Region {region_id} has an unreadable boundary: {e}");
            None
        }
    }
}

/// Imports regions from a `GeoJSON` `FeatureCollection`.
///
/// Each feature's id comes from `properties.id`, then the feature `id`,
/// then a fresh UUID. The name comes from `properties.name`, falling back
/// to the id. Features whose geometry is not a usable `Polygon` are still
/// imported (with a warning) and are skipped during assignment.
///
/// Returns the number of regions written.
///
/// # Errors
///
/// Returns [`DbError`] if the input is not a `FeatureCollection` or a
/// write fails.
pub fn import_regions_geojson(conn: &Connection, geojson_str: &str) -> Result<usize, DbError> {
    let geojson: GeoJson = geojson_str.parse()?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(DbError::Conversion {
            message: "expected a GeoJSON FeatureCollection".to_string(),
        });
    };

    let mut imported = 0usize;
    let mut malformed = 0usize;

    for feature in &collection.features {
        let record = region_record_from_feature(feature)?;

        match record.polygon.as_ref().map(Polygon::from_geojson) {
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                log::warn!("Region {} imported with unusable boundary: {e}", record.id);
                malformed += 1;
            }
            None => {
                log::warn!("Region {} imported without a boundary", record.id);
                malformed += 1;
            }
        }

        upsert_region(conn, &record)?;
        imported += 1;
    }

    log::info!("Imported {imported} regions ({malformed} without a usable boundary)");

    Ok(imported)
}

fn region_record_from_feature(feature: &Feature) -> Result<RegionRecord, DbError> {
    let id = feature
        .property("id")
        .and_then(property_to_string)
        .or_else(|| {
            feature.id.as_ref().map(|id| match id {
                Id::String(s) => s.clone(),
                Id::Number(n) => n.to_string(),
            })
        })
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let name = feature
        .property("name")
        .and_then(property_to_string)
        .unwrap_or_else(|| id.clone());

    let polygon = feature
        .geometry
        .as_ref()
        .map(serde_json::to_value)
        .transpose()?;

    Ok(RegionRecord { id, name, polygon })
}

fn property_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn square(id: &str, name: &str) -> RegionRecord {
        RegionRecord {
            id: id.to_string(),
            name: name.to_string(),
            polygon: Some(serde_json::json!({
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]],
            })),
        }
    }

    #[test]
    fn regions_are_listed_by_id() {
        let conn = db::open_in_memory().unwrap();
        upsert_region(&conn, &square("b", "Second")).unwrap();
        upsert_region(&conn, &square("a", "First")).unwrap();

        let ids: Vec<String> = list_regions(&conn).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn upsert_replaces_existing_region() {
        let conn = db::open_in_memory().unwrap();
        upsert_region(&conn, &square("a", "Old")).unwrap();
        upsert_region(&conn, &square("a", "New")).unwrap();

        let regions = list_regions(&conn).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "New");
        assert!(regions[0].polygon.is_some());
    }

    #[test]
    fn malformed_boundaries_read_back_as_none() {
        let conn = db::open_in_memory().unwrap();
        upsert_region(
            &conn,
            &RegionRecord {
                id: "short".to_string(),
                name: "Short".to_string(),
                polygon: Some(serde_json::json!({
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 1.0]]],
                })),
            },
        )
        .unwrap();
        upsert_region(
            &conn,
            &RegionRecord {
                id: "none".to_string(),
                name: "None".to_string(),
                polygon: None,
            },
        )
        .unwrap();
        conn.execute(
            "INSERT INTO regions (id, name, polygon_geojson) VALUES ('garbage', 'Garbage', '{not json')",
            [],
        )
        .unwrap();

        let regions = list_regions(&conn).unwrap();
        assert_eq!(regions.len(), 3);
        assert!(regions.iter().all(|r| r.polygon.is_none()));

        let raw = list_region_records(&conn).unwrap();
        let short = raw.iter().find(|r| r.id == "short").unwrap();
        assert!(short.polygon.is_some());
    }

    #[test]
    fn imports_feature_collection() {
        let conn = db::open_in_memory().unwrap();
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "id": "ward-1", "name": "Ward 1" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [0.0, 5.0], [5.0, 5.0], [5.0, 0.0], [0.0, 0.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "id": 7,
                    "properties": { "name": "  Ward 7  " },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [[[[5.0, 5.0], [5.0, 6.0], [6.0, 6.0], [5.0, 5.0]]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": null
                }
            ]
        }"#;

        assert_eq!(import_regions_geojson(&conn, geojson).unwrap(), 3);

        let regions = list_regions(&conn).unwrap();
        assert_eq!(regions.len(), 3);

        let ward_1 = regions.iter().find(|r| r.id == "ward-1").unwrap();
        assert_eq!(ward_1.name, "Ward 1");
        assert_eq!(ward_1.polygon.as_ref().unwrap().vertex_count(), 5);

        let ward_7 = regions.iter().find(|r| r.id == "7").unwrap();
        assert_eq!(ward_7.name, "Ward 7");
        assert!(ward_7.polygon.is_none());

        let unnamed = regions.iter().find(|r| r.id != "ward-1" && r.id != "7").unwrap();
        assert_eq!(unnamed.name, unnamed.id);
        assert!(unnamed.polygon.is_none());
    }

    #[test]
    fn import_rejects_non_collections() {
        let conn = db::open_in_memory().unwrap();
        let geojson = r#"{ "type": "Point", "coordinates": [1.0, 2.0] }"#;
        assert!(matches!(
            import_regions_geojson(&conn, geojson),
            Err(DbError::Conversion { .. })
        ));
    }
}
