//! Offline resolution scenarios.
//!
//! A scenario is a TOML file listing regions and officials, so the
//! resolver can be exercised without a database:
//!
//! ```toml
//! [[regions]]
//! id = "ward-1"
//! name = "Ward 1"
//! polygon = { type = "Polygon", coordinates = [[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]] }
//!
//! [[officials]]
//! id = "officer-1"
//! region_id = "ward-1"
//! ```
//!
//! Officials default to role `OFFICER`. Each official's region is joined
//! from the scenario's regions by `region_id`.

use std::path::Path;

use civic_report_assignment_models::{Official, Role};
use civic_report_region_models::{Region, RegionRecord};
use serde::Deserialize;

/// Errors that can occur while loading a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid scenario.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    regions: Vec<RegionRecord>,
    #[serde(default)]
    officials: Vec<OfficialEntry>,
}

#[derive(Debug, Deserialize)]
struct OfficialEntry {
    id: String,
    #[serde(default = "default_role")]
    role: Role,
    region_id: Option<String>,
}

const fn default_role() -> Role {
    Role::Officer
}

/// Regions and officials to resolve against, in file order.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Regions, validated.
    pub regions: Vec<Region>,
    /// Officials with their regions joined in.
    pub officials: Vec<Official>,
}

impl Scenario {
    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Toml`] if the text is not a valid scenario.
    pub fn parse(contents: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = toml::from_str(contents)?;

        let regions: Vec<Region> = file.regions.into_iter().map(Region::from_record).collect();

        let officials: Vec<Official> = file
            .officials
            .into_iter()
            .map(|entry| {
                let region = entry
                    .region_id
                    .as_deref()
                    .and_then(|id| regions.iter().find(|r| r.id == id))
                    .cloned();
                Official {
                    id: entry.id,
                    role: entry.role,
                    region_id: entry.region_id,
                    region,
                }
            })
            .collect();

        log::debug!(
            "Loaded scenario with {} regions and {} officials",
            regions.len(),
            officials.len()
        );

        Ok(Self { regions, officials })
    }
}

#[cfg(test)]
mod tests {
    use civic_report_assignment::resolve;
    use civic_report_assignment_models::AssignmentMethod;
    use civic_report_region_models::LatLng;

    use super::*;

    const SCENARIO: &str = r#"
        [[regions]]
        id = "ward-1"
        name = "Ward 1"
        polygon = { type = "Polygon", coordinates = [[[0, 0], [0, 10], [10, 10], [10, 0]]] }

        [[regions]]
        id = "ward-2"
        name = "Ward 2"
        polygon = { type = "Polygon", coordinates = [[[10.0, 0.0], [10.0, 10.0], [20.0, 10.0], [20.0, 0.0]]] }

        [[regions]]
        id = "broken"
        name = "Broken"
        polygon = { type = "Polygon", coordinates = [[[0.0, 0.0], [1.0, 1.0]]] }

        [[officials]]
        id = "officer-2"
        region_id = "ward-2"

        [[officials]]
        id = "clerk"
        role = "CITIZEN"
        region_id = "ward-1"

        [[officials]]
        id = "roaming"
    "#;

    #[test]
    fn parses_regions_and_joins_officials() {
        let scenario = Scenario::parse(SCENARIO).unwrap();

        assert_eq!(scenario.regions.len(), 3);
        assert!(scenario.regions[0].polygon.is_some());
        assert!(scenario.regions[2].polygon.is_none());

        let officer = &scenario.officials[0];
        assert_eq!(officer.role, Role::Officer);
        assert_eq!(officer.region.as_ref().map(|r| r.id.as_str()), Some("ward-2"));

        assert_eq!(scenario.officials[1].role, Role::Citizen);
        assert!(scenario.officials[2].region.is_none());
    }

    #[test]
    fn resolves_against_scenario() {
        let scenario = Scenario::parse(SCENARIO).unwrap();

        let in_ward_2 = resolve(LatLng::new(5.0, 15.0), &scenario.regions, &scenario.officials);
        assert_eq!(in_ward_2.region_id.as_deref(), Some("ward-2"));
        assert_eq!(in_ward_2.assigned_official_id.as_deref(), Some("officer-2"));
        assert_eq!(in_ward_2.method, AssignmentMethod::DirectRegion);

        // Ward 1's only tie is a citizen, so the ward 2 officer takes it.
        let in_ward_1 = resolve(LatLng::new(5.0, 5.0), &scenario.regions, &scenario.officials);
        assert_eq!(in_ward_1.region_id.as_deref(), Some("ward-1"));
        assert_eq!(in_ward_1.assigned_official_id.as_deref(), Some("officer-2"));
        assert_eq!(in_ward_1.method, AssignmentMethod::NearestCentroid);
    }

    #[test]
    fn empty_scenario_is_valid() {
        let scenario = Scenario::parse("").unwrap();
        assert!(scenario.regions.is_empty());
        assert!(scenario.officials.is_empty());
    }

    #[test]
    fn rejects_unknown_role() {
        let result = Scenario::parse(
            r#"
            [[officials]]
            id = "x"
            role = "MAYOR"
            "#,
        );
        assert!(matches!(result, Err(ScenarioError::Toml(_))));
    }
}
