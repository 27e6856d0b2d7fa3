#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for civic report geo-assignment.
//!
//! Manages the region and officer tables, files reports through the
//! assignment workflow, and resolves ad-hoc points against offline TOML
//! scenarios.

mod scenario;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use civic_report_assignment::{create_report, resolve};
use civic_report_assignment_models::{NewReport, ReportLocation, Role, User};
use civic_report_database::{DuckDbStore, db, paths, regions, reports, users};
use civic_report_region_models::LatLng;
use serde::Serialize;

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "civic_report", about = "Civic issue report geo-assignment tool")]
struct Cli {
    /// Path to the `DuckDB` database file (defaults to `data/civic_report.duckdb`)
    #[arg(long, global = true, env = "CIVIC_REPORT_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Init,
    /// Import region boundaries from a `GeoJSON` `FeatureCollection` file
    ImportRegions {
        /// Path to the `GeoJSON` file
        path: PathBuf,
    },
    /// Add or replace a user
    AddUser {
        /// User identifier
        #[arg(long)]
        id: String,
        /// Role (`CITIZEN`, `OFFICER`, or `ADMIN`)
        #[arg(long, default_value = "OFFICER")]
        role: Role,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Region the user is assigned to
        #[arg(long)]
        region: Option<String>,
    },
    /// File a report and assign it to a region and officer
    Report {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Short title
        #[arg(long)]
        title: String,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Street address
        #[arg(long)]
        address: Option<String>,
        /// City
        #[arg(long)]
        city: Option<String>,
        /// Free-text region label given by the reporter
        #[arg(long)]
        region_label: Option<String>,
        /// Issue category
        #[arg(long)]
        category: Option<String>,
        /// Submitting user
        #[arg(long)]
        reporter: Option<String>,
    },
    /// List stored regions
    Regions,
    /// List stored users
    Users,
    /// List officers with their joined regions
    Officers,
    /// List stored reports
    Reports,
    /// Resolve a point against a TOML scenario file without touching the database
    Resolve {
        /// Path to the scenario file
        scenario: PathBuf,
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Commands::Resolve { scenario, lat, lon } = &cli.command {
        let scenario = Scenario::load(scenario)?;
        let assignment = resolve(
            LatLng::new(*lat, *lon),
            &scenario.regions,
            &scenario.officials,
        );
        print_json(&assignment)?;
        return Ok(());
    }

    let db_path = cli.db.clone().unwrap_or_else(paths::default_db_path);
    let conn = db::open(&db_path)?;

    match cli.command {
        Commands::Init => {
            log::info!("Database ready at {}", db_path.display());
        }
        Commands::ImportRegions { path } => {
            let contents = std::fs::read_to_string(&path)?;
            let count = regions::import_regions_geojson(&conn, &contents)?;
            println!("Imported {count} regions from {}", path.display());
        }
        Commands::AddUser {
            id,
            role,
            name,
            region,
        } => {
            let user = User {
                id,
                name,
                role,
                region_id: region,
            };
            users::upsert_user(&conn, &user)?;
            print_json(&user)?;
        }
        Commands::Report {
            lat,
            lon,
            title,
            description,
            address,
            city,
            region_label,
            category,
            reporter,
        } => {
            let mut store = DuckDbStore::new(conn);
            let report = create_report(
                &mut store,
                NewReport {
                    title,
                    description,
                    category_id: category,
                    reporter_id: reporter,
                    location: ReportLocation {
                        latitude: lat,
                        longitude: lon,
                        address,
                        city,
                        region: region_label,
                    },
                },
            )?;
            print_json(&report)?;
        }
        Commands::Regions => print_json(&regions::list_regions(&conn)?)?,
        Commands::Users => print_json(&users::list_users(&conn)?)?,
        Commands::Officers => print_json(&users::list_officers(&conn)?)?,
        Commands::Reports => print_json(&reports::list_reports(&conn)?)?,
        Commands::Resolve { .. } => unreachable!("handled before opening the database"),
    }

    Ok(())
}
