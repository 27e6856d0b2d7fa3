#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report geo-assignment.
//!
//! Given a new report's coordinates, [`resolve`] picks the containing
//! region and the officer to assign. [`create_report`] wraps it in the
//! report-creation flow: fetch candidates from a [`ReportStore`], resolve,
//! and persist the report with its assignment.
//!
//! The resolver is a pure function over caller-supplied snapshots. It
//! holds no state, performs no I/O, and can run concurrently for any
//! number of reports.

pub mod resolver;
pub mod workflow;

pub use resolver::{find_direct_officer, find_nearest_officer, find_region, resolve};
pub use workflow::{ReportStore, create_report};
