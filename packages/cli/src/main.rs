#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for Guardian.
//!
//! Look up reported crimes around a UK postcode or town, get route
//! advice, post a safety check-in, share a message, or file an incident
//! report. Run without a subcommand for an interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`guardian_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and spinners never fight for the terminal.

mod display;
mod host;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use guardian_cli_utils::{MultiProgress, with_spinner};
use guardian_crime_models::{Coordinate, IncidentType};
use guardian_session::report::REPORT_SUBMITTED_NOTICE;
use guardian_session::{ReportDraft, SearchOutcome, Session, SessionError};
use guardian_social::geolocation::FixedLocationProvider;
use guardian_social::share::parse_platform;
use guardian_social::{CheckInTarget, LocationProvider};

use crate::host::{PromptLocationProvider, TerminalShareSink, attach_file};

#[derive(Parser)]
#[command(name = "guardian", about = "UK crime awareness and personal safety")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List reported crimes and statistics around a postcode or town
    Search {
        /// UK postcode (e.g. "SW1A 1AA") or town name
        location: String,
    },
    /// Safe route recommendations for the area around a postcode or town
    Route {
        /// UK postcode or town name
        location: String,
    },
    /// Share a safety check-in with your location
    CheckIn {
        /// facebook, twitter (or x), or both
        #[arg(long, default_value = "both")]
        platform: String,
        /// Current latitude
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Current longitude
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Share a message on social media
    Share {
        /// facebook, twitter (or x), or tiktok
        #[arg(long)]
        platform: String,
        /// Message to share
        message: String,
    },
    /// Report a crime or suspicious activity
    Report {
        /// theft, assault, vandalism, suspicious, or other
        #[arg(long = "type")]
        incident_type: IncidentType,
        /// What happened
        #[arg(long)]
        description: String,
        /// Latitude of the incident
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the incident
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Photo or video to attach (repeatable, up to 4)
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = guardian_cli_utils::init_logger();
    let cli = Cli::parse();

    let session = Session::from_env()?;

    let Some(command) = cli.command else {
        println!("Guardian");
        return interactive::run(&session, &multi).await;
    };

    if let Err(e) = run_command(&session, &multi, command).await {
        log::debug!("{e:?}");
        eprintln!("{}", e.notice());
        std::process::exit(1);
    }

    Ok(())
}

/// Runs a search and prints it. Returns whether a snapshot was applied.
async fn search(
    session: &Session,
    multi: &MultiProgress,
    location: &str,
) -> Result<bool, SessionError> {
    let message = format!("Searching for {}...", location.trim());
    let outcome = with_spinner(multi, &message, session.search(location)).await?;
    Ok(match outcome {
        SearchOutcome::Applied(snapshot) => {
            display::print_search(&snapshot);
            true
        }
        SearchOutcome::Ignored => {
            println!("Please enter a postcode or town name.");
            false
        }
        SearchOutcome::Superseded => false,
    })
}

async fn run_command(
    session: &Session,
    multi: &MultiProgress,
    command: Commands,
) -> Result<(), SessionError> {
    match command {
        Commands::Search { location } => {
            search(session, multi, &location).await?;
        }
        Commands::Route { location } => {
            if search(session, multi, &location).await? {
                println!();
                let advisory = session.route_advisory()?;
                display::print_advisory(&advisory, session.snapshot().crimes.len());
            }
        }
        Commands::CheckIn { platform, lat, lon } => {
            let target = CheckInTarget::parse(&platform)?;
            let provider: Box<dyn LocationProvider> = match given_coordinate(lat, lon) {
                Some(at) => Box::new(FixedLocationProvider::new(at)),
                None => Box::new(PromptLocationProvider),
            };
            let position = session
                .check_in(target, provider.as_ref(), &TerminalShareSink)
                .await?;
            println!("Checked in at {}", position.coordinate);
        }
        Commands::Share { platform, message } => {
            let platform = parse_platform(&platform)?;
            session
                .share_message(platform, &message, &TerminalShareSink)
                .await?;
        }
        Commands::Report {
            incident_type,
            description,
            lat,
            lon,
            attachments,
        } => {
            let mut draft = ReportDraft::new(incident_type, description);
            if let (Some(lat), Some(lon)) = (lat, lon) {
                draft = draft.with_location(Coordinate::new(lat, lon));
            }
            for path in &attachments {
                if let Err(e) = attach_file(&mut draft, path) {
                    eprintln!("Skipping {}: {e}", path.display());
                }
            }
            let report = session.submit_report(draft)?;
            println!("{REPORT_SUBMITTED_NOTICE}");
            println!("Reference: {}", report.id);
        }
    }

    Ok(())
}

/// Coordinate from `--lat`/`--lon`, only when both are given.
const fn given_coordinate(lat: Option<f64>, lon: Option<f64>) -> Option<Coordinate> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
        _ => None,
    }
}
