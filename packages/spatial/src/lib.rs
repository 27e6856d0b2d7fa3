#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geometry helpers for region assignment.
//!
//! Everything here is a plain function over in-memory rings: ray-casting
//! containment, a vertex-mean centroid, and haversine distance. There is
//! no spatial index; callers scan their candidate regions linearly.

use civic_report_region_models::{LatLng, MIN_RING_VERTICES, Polygon};
use geo::Coord;

/// Mean Earth radius in meters used for haversine distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Ray-casting point-in-ring test.
///
/// `x` is longitude and `y` is latitude. For each edge `(i, j)` a crossing
/// is counted when `(yi > y) != (yj > y)` and the point lies left of the
/// edge at that latitude. An odd crossing count means inside. Points
/// exactly on an edge may land on either side.
///
/// Rings with fewer than [`MIN_RING_VERTICES`] vertices contain nothing.
#[must_use]
pub fn ring_contains(ring: &[Coord<f64>], point: LatLng) -> bool {
    if ring.len() < MIN_RING_VERTICES {
        return false;
    }
    let Some(&last) = ring.last() else {
        return false;
    };

    let Coord { x, y } = point.to_coord();
    let mut inside = false;
    let mut prev = last;

    for &curr in ring {
        // The first clause guarantees `curr.y != prev.y`.
        if (curr.y > y) != (prev.y > y)
            && x < (prev.x - curr.x) * (y - curr.y) / (prev.y - curr.y) + curr.x
        {
            inside = !inside;
        }
        prev = curr;
    }

    inside
}

/// Returns whether `polygon` contains `point`.
#[must_use]
pub fn contains(polygon: &Polygon, point: LatLng) -> bool {
    ring_contains(polygon.ring(), point)
}

/// Arithmetic mean of the ring vertices, or `None` for an empty ring.
///
/// This is not the area-weighted centroid. For unevenly sampled or
/// concave rings it drifts toward densely sampled edges, and a repeated
/// closing vertex counts twice. Switching to a true centroid would change
/// which officer wins the nearest-region fallback.
#[must_use]
pub fn ring_vertex_centroid(ring: &[Coord<f64>]) -> Option<LatLng> {
    if ring.is_empty() {
        return None;
    }

    let (sum_x, sum_y) = ring
        .iter()
        .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));

    #[allow(clippy::cast_precision_loss)]
    let n = ring.len() as f64;

    Some(LatLng::from_coord(Coord {
        x: sum_x / n,
        y: sum_y / n,
    }))
}

/// Vertex-mean centroid of a polygon. See [`ring_vertex_centroid`].
#[must_use]
pub fn vertex_centroid(polygon: &Polygon) -> LatLng {
    ring_vertex_centroid(polygon.ring()).unwrap_or_else(|| {
        // Unreachable for a validated polygon, which always has vertices.
        LatLng::new(f64::NAN, f64::NAN)
    })
}

/// Great-circle distance in meters between two points (haversine formula,
/// [`EARTH_RADIUS_M`]).
#[must_use]
pub fn haversine_m(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}
