#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative region and boundary polygon types.
//!
//! Regions arrive from storage or scenario files as loosely shaped
//! `GeoJSON` blobs ([`RegionRecord`]). They are validated once, here, into
//! a typed [`Polygon`] so that downstream geometry never has to re-check
//! ring shape. A malformed boundary degrades to a region without a
//! polygon instead of an error.

use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Minimum number of ring vertices for a polygon to be tested.
pub const MIN_RING_VERTICES: usize = 3;

/// A WGS84 point given as latitude/longitude degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LatLng {
    /// Creates a new point from latitude and longitude degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the point as a planar coordinate (`x` = longitude,
    /// `y` = latitude).
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Creates a point from a planar coordinate (`x` = longitude,
    /// `y` = latitude).
    #[must_use]
    pub const fn from_coord(coord: Coord<f64>) -> Self {
        Self {
            latitude: coord.y,
            longitude: coord.x,
        }
    }
}

/// Reasons a boundary cannot be turned into a [`Polygon`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolygonError {
    /// The value is not a `GeoJSON` geometry object.
    #[error("Invalid GeoJSON geometry: {message}")]
    Geometry {
        /// Description of what went wrong.
        message: String,
    },

    /// The geometry is valid `GeoJSON` but not a `Polygon`.
    #[error("Unsupported geometry type '{kind}', expected 'Polygon'")]
    UnsupportedType {
        /// The `GeoJSON` `type` member that was found.
        kind: String,
    },

    /// The polygon has no outer ring.
    #[error("Polygon has no outer ring")]
    MissingRing,

    /// The outer ring has too few vertices to enclose an area.
    #[error("Polygon ring has {count} vertices, at least 3 required")]
    TooFewVertices {
        /// Number of vertices found.
        count: usize,
    },

    /// A ring position is missing its longitude or latitude.
    #[error("Ring position {index} has fewer than two coordinates")]
    InvalidPosition {
        /// Index of the offending position within the ring.
        index: usize,
    },
}

/// A single-ring boundary polygon of `(longitude, latitude)` vertices.
///
/// The ring is implicitly closed: the last vertex does not need to repeat
/// the first. A repeated closing vertex, when present in the source data,
/// is kept as-is. Always holds at least [`MIN_RING_VERTICES`] vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<Coord<f64>>,
}

impl Polygon {
    /// Creates a polygon from ring vertices (`x` = longitude, `y` = latitude).
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError::TooFewVertices`] if the ring has fewer than
    /// [`MIN_RING_VERTICES`] vertices.
    pub fn from_ring(ring: Vec<Coord<f64>>) -> Result<Self, PolygonError> {
        if ring.len() < MIN_RING_VERTICES {
            return Err(PolygonError::TooFewVertices { count: ring.len() });
        }
        Ok(Self { ring })
    }

    /// Creates a polygon from `[longitude, latitude]` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError::TooFewVertices`] if fewer than
    /// [`MIN_RING_VERTICES`] pairs are given.
    pub fn from_lng_lat(pairs: &[[f64; 2]]) -> Result<Self, PolygonError> {
        Self::from_ring(pairs.iter().map(|&[x, y]| Coord { x, y }).collect())
    }

    /// Parses a `GeoJSON` `Polygon` geometry object. Only the outer ring
    /// (`coordinates[0]`) is used; holes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError`] if the value is not a `Polygon` geometry
    /// or its outer ring is unusable.
    pub fn from_geojson(value: &serde_json::Value) -> Result<Self, PolygonError> {
        let geometry: geojson::Geometry =
            serde_json::from_value(value.clone()).map_err(|e| PolygonError::Geometry {
                message: e.to_string(),
            })?;

        Self::from_geometry(&geometry)
    }

    /// Converts a parsed `GeoJSON` geometry. Only the outer ring is used.
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError`] if the geometry is not a `Polygon` or its
    /// outer ring is unusable.
    pub fn from_geometry(geometry: &geojson::Geometry) -> Result<Self, PolygonError> {
        let geojson::Value::Polygon(rings) = &geometry.value else {
            return Err(PolygonError::UnsupportedType {
                kind: geometry_kind(geometry),
            });
        };

        let outer = rings.first().ok_or(PolygonError::MissingRing)?;

        let ring = outer
            .iter()
            .enumerate()
            .map(|(index, position)| match position.as_slice() {
                [x, y, ..] => Ok(Coord { x: *x, y: *y }),
                _ => Err(PolygonError::InvalidPosition { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_ring(ring)
    }

    /// Returns the ring vertices (`x` = longitude, `y` = latitude).
    #[must_use]
    pub fn ring(&self) -> &[Coord<f64>] {
        &self.ring
    }

    /// Number of vertices in the ring.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.ring.len()
    }

    /// Renders the polygon as a `GeoJSON` `Polygon` geometry object.
    #[must_use]
    pub fn to_geojson(&self) -> serde_json::Value {
        let ring: Vec<[f64; 2]> = self.ring.iter().map(|c| [c.x, c.y]).collect();
        serde_json::json!({
            "type": "Polygon",
            "coordinates": [ring],
        })
    }
}

impl Serialize for Polygon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_geojson().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Polygon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_geojson(&value).map_err(serde::de::Error::custom)
    }
}

fn geometry_kind(geometry: &geojson::Geometry) -> String {
    serde_json::to_value(geometry)
        .ok()
        .and_then(|v| v.get("type").and_then(serde_json::Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

/// A region row as stored, with its boundary still an untyped `GeoJSON`
/// blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecord {
    /// Opaque region identifier.
    pub id: String,
    /// Human-readable region name.
    pub name: String,
    /// `GeoJSON` geometry object, if any.
    #[serde(default)]
    pub polygon: Option<serde_json::Value>,
}

/// An administrative region with a validated boundary.
///
/// Deserializing goes through [`RegionRecord`], so a malformed boundary
/// yields `polygon: None` rather than a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RegionRecord")]
pub struct Region {
    /// Opaque region identifier.
    pub id: String,
    /// Human-readable region name.
    pub name: String,
    /// Boundary polygon. `None` when missing or malformed.
    pub polygon: Option<Polygon>,
}

impl Region {
    /// Creates a region from an already validated polygon.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, polygon: Option<Polygon>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            polygon,
        }
    }

    /// Validates a raw record. A boundary that fails validation is logged
    /// and dropped; the region itself is kept.
    #[must_use]
    pub fn from_record(record: RegionRecord) -> Self {
        let polygon = record
            .polygon
            .as_ref()
            .filter(|value| !value.is_null())
            .and_then(|value| match Polygon::from_geojson(value) {
                Ok(polygon) => Some(polygon),
                Err(e) => {
                    log::warn!("Skipping malformed boundary for region {}: {e}", record.id);
                    None
                }
            });

        Self {
            id: record.id,
            name: record.name,
            polygon,
        }
    }
}

impl From<RegionRecord> for Region {
    fn from(record: RegionRecord) -> Self {
        Self::from_record(record)
    }
}
