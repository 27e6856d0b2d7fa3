#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Official, report, and assignment outcome types.
//!
//! A report is assigned exactly once, when it is created. The resolved
//! [`Assignment`] is copied onto the [`Report`] and never re-evaluated if
//! regions or the officer roster change afterwards.

use chrono::{DateTime, Utc};
use civic_report_region_models::{LatLng, Region};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Platform user role.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Files reports.
    Citizen,
    /// Handles reports. The only role eligible for assignment.
    Officer,
    /// Manages regions and users.
    Admin,
}

/// A platform user as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque user identifier.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Role.
    pub role: Role,
    /// Assigned region, if any. A user has at most one region.
    pub region_id: Option<String>,
}

/// A candidate for report assignment, with its region joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Official {
    /// Opaque user identifier.
    pub id: String,
    /// Role. Anything but [`Role::Officer`] is ignored during assignment.
    pub role: Role,
    /// Assigned region identifier, used for direct matches.
    pub region_id: Option<String>,
    /// Assigned region record, used for the nearest-centroid fallback.
    #[serde(default)]
    pub region: Option<Region>,
}

impl Official {
    /// Creates an officer tied to `region` (or to no region).
    #[must_use]
    pub fn officer(id: impl Into<String>, region: Option<Region>) -> Self {
        Self {
            id: id.into(),
            role: Role::Officer,
            region_id: region.as_ref().map(|r| r.id.clone()),
            region,
        }
    }

    /// Whether this official may be assigned reports.
    #[must_use]
    pub const fn is_officer(&self) -> bool {
        matches!(self.role, Role::Officer)
    }
}

/// Which resolution step produced an [`Assignment`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentMethod {
    /// An officer tied to the containing region.
    DirectRegion,
    /// The officer whose region centroid is nearest to the report.
    NearestCentroid,
    /// No officer could be resolved.
    Unassigned,
}

/// Result of geo-assignment for one report point.
///
/// Both `None` fields are valid outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Region whose polygon contains the point.
    pub region_id: Option<String>,
    /// Resolved officer.
    pub assigned_official_id: Option<String>,
    /// How the officer was resolved.
    pub method: AssignmentMethod,
}

impl Assignment {
    /// An assignment with no officer.
    #[must_use]
    pub const fn unassigned(region_id: Option<String>) -> Self {
        Self {
            region_id,
            assigned_official_id: None,
            method: AssignmentMethod::Unassigned,
        }
    }

    /// Whether an officer was resolved.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assigned_official_id.is_some()
    }
}

/// Where a report was filed. Immutable once the report exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Street address as entered by the reporter.
    pub address: Option<String>,
    /// City as entered by the reporter.
    pub city: Option<String>,
    /// Free-text region label as entered by the reporter. Unrelated to the
    /// resolved region.
    pub region: Option<String>,
}

impl ReportLocation {
    /// Creates a location with only coordinates.
    #[must_use]
    pub const fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
            city: None,
            region: None,
        }
    }

    /// The report point.
    #[must_use]
    pub const fn point(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// A report as submitted, before assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Issue category.
    pub category_id: Option<String>,
    /// Submitting user.
    pub reporter_id: Option<String>,
    /// Where the issue is.
    pub location: ReportLocation,
}

/// A stored report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Opaque report identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Issue category.
    pub category_id: Option<String>,
    /// Submitting user.
    pub reporter_id: Option<String>,
    /// Where the issue is.
    pub location: ReportLocation,
    /// Containing region, set once at creation.
    pub region_id: Option<String>,
    /// Assigned officer, set once at creation.
    pub assigned_to_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Builds the stored report from a submission and its assignment.
    #[must_use]
    pub fn from_new(
        new_report: NewReport,
        assignment: &Assignment,
        id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: new_report.title,
            description: new_report.description,
            category_id: new_report.category_id,
            reporter_id: new_report.reporter_id,
            location: new_report.location,
            region_id: assignment.region_id.clone(),
            assigned_to_id: assignment.assigned_official_id.clone(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn role_text_roundtrip() {
        for role in [Role::Citizen, Role::Officer, Role::Admin] {
            assert_eq!(Role::from_str(role.as_ref()).unwrap(), role);
        }
        assert_eq!(Role::Officer.to_string(), "OFFICER");
        assert!(Role::from_str("officer").is_err());
    }

    #[test]
    fn only_officers_are_eligible() {
        let mut official = Official::officer("u-1", None);
        assert!(official.is_officer());
        official.role = Role::Admin;
        assert!(!official.is_officer());
    }

    #[test]
    fn officer_constructor_sets_region_id() {
        let official = Official::officer("u-1", Some(Region::new("r-9", "Ward 9", None)));
        assert_eq!(official.region_id.as_deref(), Some("r-9"));
    }

    #[test]
    fn report_copies_assignment_fields() {
        let new_report = NewReport {
            title: "Pothole".to_string(),
            description: None,
            category_id: Some("roads".to_string()),
            reporter_id: Some("citizen-1".to_string()),
            location: ReportLocation::at(1.0, 2.0),
        };
        let assignment = Assignment {
            region_id: Some("r-1".to_string()),
            assigned_official_id: Some("o-1".to_string()),
            method: AssignmentMethod::DirectRegion,
        };
        let created_at = Utc::now();
        let report = Report::from_new(new_report, &assignment, "rep-1".to_string(), created_at);

        assert_eq!(report.region_id.as_deref(), Some("r-1"));
        assert_eq!(report.assigned_to_id.as_deref(), Some("o-1"));
        assert_eq!(report.category_id.as_deref(), Some("roads"));
        assert_eq!(report.location.point(), LatLng::new(1.0, 2.0));
        assert_eq!(report.created_at, created_at);
    }

    #[test]
    fn assignment_serializes_camel_case() {
        let value = serde_json::to_value(Assignment::unassigned(None)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "regionId": null,
                "assignedOfficialId": null,
                "method": "UNASSIGNED",
            })
        );
    }
}
