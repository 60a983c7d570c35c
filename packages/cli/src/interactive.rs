//! Interactive menu over a single session.
//!
//! Provides a `dialoguer` menu for searching, route advice, check-ins,
//! sharing and reporting without memorizing subcommands. Failures are
//! shown as notices and the menu keeps running.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use guardian_cli_utils::{MultiProgress, with_spinner};
use guardian_crime_models::IncidentType;
use guardian_session::report::REPORT_SUBMITTED_NOTICE;
use guardian_session::{ReportDraft, SearchOutcome, Session, SessionError};
use guardian_social::{CheckInTarget, SharePlatform};

use crate::display;
use crate::host::{PromptLocationProvider, TerminalShareSink, attach_file};

/// Top-level actions available in the interactive menu.
enum Action {
    Search,
    RouteAdvice,
    Statistics,
    CheckIn,
    Share,
    Report,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Search,
        Self::RouteAdvice,
        Self::Statistics,
        Self::CheckIn,
        Self::Share,
        Self::Report,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search an area",
            Self::RouteAdvice => "Safe route recommendations",
            Self::Statistics => "Area statistics",
            Self::CheckIn => "Safety check-in",
            Self::Share => "Share a message",
            Self::Report => "Report a crime",
            Self::Quit => "Quit",
        }
    }
}

const SHARE_PLATFORMS: &[SharePlatform] =
    &[SharePlatform::Facebook, SharePlatform::Twitter, SharePlatform::TikTok];

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be prompted.
pub async fn run(
    session: &Session,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match Action::ALL[idx] {
            Action::Search => search(session, multi).await?,
            Action::RouteAdvice => session
                .route_advisory()
                .map(|a| display::print_advisory(&a, session.snapshot().crimes.len())),
            Action::Statistics => {
                statistics(session);
                Ok(())
            }
            Action::CheckIn => check_in(session).await?,
            Action::Share => share(session).await?,
            Action::Report => report(session)?,
            Action::Quit => return Ok(()),
        };

        if let Err(e) = result {
            log::debug!("{e:?}");
            println!("{}", e.notice());
        }
    }
}

type Step = Result<(), SessionError>;

async fn search(session: &Session, multi: &MultiProgress) -> Result<Step, dialoguer::Error> {
    let location: String = Input::new()
        .with_prompt("Postcode or town")
        .allow_empty(true)
        .interact_text()?;

    let outcome = with_spinner(multi, "Searching...", session.search(&location)).await;
    Ok(outcome.map(|outcome| match outcome {
        SearchOutcome::Applied(snapshot) => display::print_search(&snapshot),
        SearchOutcome::Ignored | SearchOutcome::Superseded => {}
    }))
}

fn statistics(session: &Session) {
    let snapshot = session.snapshot();
    match &snapshot.statistics {
        Some(stats) => display::print_statistics(stats),
        None if snapshot.query.is_some() => {
            println!("{}", guardian_session::DATA_UNAVAILABLE_NOTICE);
        }
        None => println!("{}", guardian_session::SEARCH_FIRST_NOTICE),
    }
}

async fn check_in(session: &Session) -> Result<Step, dialoguer::Error> {
    let labels: Vec<&str> = CheckInTarget::ALL.iter().map(|t| t.label()).collect();
    let idx = Select::new()
        .with_prompt("Check in on")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(session
        .check_in(CheckInTarget::ALL[idx], &PromptLocationProvider, &TerminalShareSink)
        .await
        .map(|position| println!("Checked in at {}", position.coordinate)))
}

async fn share(session: &Session) -> Result<Step, dialoguer::Error> {
    let labels: Vec<&str> = SHARE_PLATFORMS.iter().map(|p| p.label()).collect();
    let idx = Select::new()
        .with_prompt("Share on")
        .items(&labels)
        .default(0)
        .interact()?;
    let message: String = Input::new().with_prompt("Message").interact_text()?;

    Ok(session
        .share_message(SHARE_PLATFORMS[idx], &message, &TerminalShareSink)
        .await)
}

fn report(session: &Session) -> Result<Step, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = IncidentType::ALL.iter().map(|t| t.label()).collect();
    let idx = Select::new()
        .with_prompt("Type of incident")
        .items(&labels)
        .default(0)
        .interact()?;
    let description: String = Input::new()
        .with_prompt("What happened?")
        .allow_empty(true)
        .interact_text()?;

    let mut draft = ReportDraft::new(IncidentType::ALL[idx], description);

    let snapshot = session.snapshot();
    if snapshot.query.is_some()
        && Confirm::new()
            .with_prompt(format!("Use the searched location ({})?", snapshot.center))
            .default(true)
            .interact()?
    {
        draft = draft.with_location(snapshot.center);
    }

    loop {
        let path: String = Input::new()
            .with_prompt("Attach a photo or video (leave empty to finish)")
            .allow_empty(true)
            .interact_text()?;
        let path = path.trim();
        if path.is_empty() {
            break;
        }
        if let Err(e) = attach_file(&mut draft, &PathBuf::from(path)) {
            println!("{e}");
        }
    }

    Ok(session.submit_report(draft).map(|report| {
        println!("{REPORT_SUBMITTED_NOTICE}");
        println!("Reference: {}", report.id);
    }))
}
