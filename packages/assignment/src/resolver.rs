//! Geo-assignment resolver.
//!
//! Resolution runs in three steps:
//!
//! 1. The first region (in input order) whose polygon contains the point.
//! 2. The first officer tied to that region.
//! 3. Otherwise, the officer whose region centroid is nearest to the point.
//!
//! Region order matters when polygons overlap: the earlier region wins.
//! Callers should pass regions in a stable, deliberate order.

use civic_report_assignment_models::{Assignment, AssignmentMethod, Official};
use civic_report_region_models::{LatLng, Region};
use civic_report_spatial::{contains, haversine_m, vertex_centroid};

/// Resolves the containing region and assigned officer for `point`.
///
/// Never fails: regions without a polygon are skipped, and a missing
/// region or officer is reported as `None`.
#[must_use]
pub fn resolve(point: LatLng, regions: &[Region], officials: &[Official]) -> Assignment {
    let region = find_region(point, regions);
    let region_id = region.map(|r| r.id.clone());

    if let Some(region) = region {
        log::debug!("Point {point:?} falls in region {} ({})", region.id, region.name);

        if let Some(officer) = find_direct_officer(&region.id, officials) {
            log::debug!("Officer {} is tied to region {}", officer.id, region.id);
            return Assignment {
                region_id,
                assigned_official_id: Some(officer.id.clone()),
                method: AssignmentMethod::DirectRegion,
            };
        }
    } else {
        log::debug!("Point {point:?} is outside every region");
    }

    match find_nearest_officer(point, officials) {
        Some((officer, distance_m)) => {
            log::debug!(
                "Falling back to nearest officer {} ({distance_m:.0} m to region centroid)",
                officer.id
            );
            Assignment {
                region_id,
                assigned_official_id: Some(officer.id.clone()),
                method: AssignmentMethod::NearestCentroid,
            }
        }
        None => {
            log::debug!("No officer with a region boundary to fall back to");
            Assignment::unassigned(region_id)
        }
    }
}

/// Returns the first region whose polygon contains `point`.
#[must_use]
pub fn find_region(point: LatLng, regions: &[Region]) -> Option<&Region> {
    regions.iter().find(|region| {
        region
            .polygon
            .as_ref()
            .is_some_and(|polygon| contains(polygon, point))
    })
}

/// Returns the first officer whose `region_id` is `region_id`.
#[must_use]
pub fn find_direct_officer<'a>(region_id: &str, officials: &'a [Official]) -> Option<&'a Official> {
    officials
        .iter()
        .find(|official| official.is_officer() && official.region_id.as_deref() == Some(region_id))
}

/// Returns the officer whose region centroid is nearest to `point`,
/// together with the distance in meters.
///
/// Only officers whose joined region has a polygon are candidates. On a
/// tie the earlier officer wins.
#[must_use]
pub fn find_nearest_officer(point: LatLng, officials: &[Official]) -> Option<(&Official, f64)> {
    let mut nearest = None;
    let mut nearest_m = f64::INFINITY;

    for official in officials.iter().filter(|o| o.is_officer()) {
        let Some(polygon) = official.region.as_ref().and_then(|r| r.polygon.as_ref()) else {
            continue;
        };

        let distance_m = haversine_m(point, vertex_centroid(polygon));
        log::trace!("Officer {} region centroid is {distance_m:.0} m away", official.id);

        if distance_m < nearest_m {
            nearest = Some(official);
            nearest_m = distance_m;
        }
    }

    nearest.map(|official| (official, nearest_m))
}
