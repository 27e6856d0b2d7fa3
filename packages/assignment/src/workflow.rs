//! Report creation with geo-assignment.

use chrono::Utc;
use civic_report_assignment_models::{NewReport, Official, Report};
use civic_report_region_models::Region;

use crate::resolve;

/// Storage the report-creation flow reads candidates from and writes
/// reports to.
pub trait ReportStore {
    /// Storage error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// All regions, in the order containment should test them.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the regions cannot be read.
    fn regions(&self) -> Result<Vec<Region>, Self::Error>;

    /// All officers, each with its region joined in.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the officers cannot be read.
    fn officers(&self) -> Result<Vec<Official>, Self::Error>;

    /// Persists a new report.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the report cannot be written.
    fn insert_report(&mut self, report: &Report) -> Result<(), Self::Error>;
}

/// Creates a report, resolving its region and officer from the store's
/// current regions and officers.
///
/// A report that ends up without a region or officer is still created.
///
/// # Errors
///
/// Returns the store's error if reading candidates or writing the report
/// fails. Assignment itself cannot fail.
pub fn create_report<S: ReportStore>(store: &mut S, new_report: NewReport) -> Result<Report, S::Error> {
    let regions = store.regions()?;
    let officers = store.officers()?;

    let assignment = resolve(new_report.location.point(), &regions, &officers);

    let report = Report::from_new(
        new_report,
        &assignment,
        uuid::Uuid::new_v4().to_string(),
        Utc::now(),
    );

    store.insert_report(&report)?;

    match (&report.region_id, &report.assigned_to_id) {
        (region, Some(officer)) => log::info!(
            "Created report {} in region {} assigned to {officer} ({})",
            report.id,
            region.as_deref().unwrap_or("-"),
            assignment.method,
        ),
        (region, None) => log::info!(
            "Created report {} in region {} with no officer available",
            report.id,
            region.as_deref().unwrap_or("-"),
        ),
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use civic_report_assignment_models::{AssignmentMethod, ReportLocation};
    use civic_report_region_models::Polygon;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("store unavailable")]
    struct Unavailable;

    #[derive(Default)]
    struct MemoryStore {
        regions: Vec<Region>,
        officers: Vec<Official>,
        reports: Vec<Report>,
        fail_reads: bool,
    }

    impl ReportStore for MemoryStore {
        type Error = Unavailable;

        fn regions(&self) -> Result<Vec<Region>, Unavailable> {
            if self.fail_reads {
                return Err(Unavailable);
            }
            Ok(self.regions.clone())
        }

        fn officers(&self) -> Result<Vec<Official>, Unavailable> {
            Ok(self.officers.clone())
        }

        fn insert_report(&mut self, report: &Report) -> Result<(), Unavailable> {
            self.reports.push(report.clone());
            Ok(())
        }
    }

    fn ward() -> Region {
        Region::new(
            "ward-1",
            "Ward 1",
            Some(Polygon::from_lng_lat(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]).unwrap()),
        )
    }

    fn pothole(latitude: f64, longitude: f64) -> NewReport {
        NewReport {
            title: "Pothole".to_string(),
            description: Some("Deep pothole near the crossing".to_string()),
            category_id: Some("roads".to_string()),
            reporter_id: Some("citizen-1".to_string()),
            location: ReportLocation {
                address: Some("12 Main St".to_string()),
                ..ReportLocation::at(latitude, longitude)
            },
        }
    }

    #[test]
    fn persists_report_with_assignment() {
        let mut store = MemoryStore {
            regions: vec![ward()],
            officers: vec![Official::officer("officer-1", Some(ward()))],
            ..MemoryStore::default()
        };

        let report = create_report(&mut store, pothole(5.0, 5.0)).unwrap();

        assert_eq!(report.region_id.as_deref(), Some("ward-1"));
        assert_eq!(report.assigned_to_id.as_deref(), Some("officer-1"));
        assert_eq!(report.location.address.as_deref(), Some("12 Main St"));
        assert_eq!(store.reports, vec![report]);
    }

    #[test]
    fn persists_unassigned_report() {
        let mut store = MemoryStore::default();

        let report = create_report(&mut store, pothole(5.0, 5.0)).unwrap();

        assert_eq!(report.region_id, None);
        assert_eq!(report.assigned_to_id, None);
        assert_eq!(store.reports.len(), 1);
    }

    #[test]
    fn outside_every_region_falls_back_to_nearest_officer() {
        let mut store = MemoryStore {
            regions: vec![ward()],
            officers: vec![Official::officer("officer-1", Some(ward()))],
            ..MemoryStore::default()
        };

        let report = create_report(&mut store, pothole(-3.0, -3.0)).unwrap();
        let assignment = resolve(report.location.point(), &store.regions, &store.officers);

        assert_eq!(report.region_id, None);
        assert_eq!(report.assigned_to_id.as_deref(), Some("officer-1"));
        assert_eq!(assignment.method, AssignmentMethod::NearestCentroid);
    }

    #[test]
    fn store_errors_propagate() {
        let mut store = MemoryStore {
            fail_reads: true,
            ..MemoryStore::default()
        };

        assert!(create_report(&mut store, pothole(5.0, 5.0)).is_err());
        assert!(store.reports.is_empty());
    }

    #[test]
    fn report_ids_are_unique() {
        let mut store = MemoryStore::default();
        let first = create_report(&mut store, pothole(1.0, 1.0)).unwrap();
        let second = create_report(&mut store, pothole(1.0, 1.0)).unwrap();
        assert_ne!(first.id, second.id);
    }
}
