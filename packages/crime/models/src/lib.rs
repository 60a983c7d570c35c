#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime record, statistics, advisory and report types.
//!
//! [`CrimeRecord`] mirrors the street-level crime objects returned by the
//! police.uk API. Everything else in this crate is derived from a
//! collection of those records ([`AreaStatistics`], [`RouteAdvisory`]) or
//! describes user input ([`IncidentReport`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Map center used before the first search completes (central London).
pub const DEFAULT_MAP_CENTER: Coordinate = Coordinate {
    latitude: 51.505,
    longitude: -0.09,
};

/// Placeholder street name police.uk uses when no street is known.
pub const PLACEHOLDER_STREET_NAME: &str = "On or near ";

/// Outcome label shown for incidents without a reported outcome.
pub const UNRESOLVED_OUTCOME_LABEL: &str = "Under Investigation";

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from a latitude/longitude pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Street attached to a crime location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
    /// Street name, often prefixed with `"On or near "`.
    #[serde(default)]
    pub name: String,
}

/// Anonymised location of a reported crime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeLocation {
    /// Latitude. police.uk sends this as a string.
    #[serde(deserialize_with = "de_degrees")]
    pub latitude: f64,
    /// Longitude. police.uk sends this as a string.
    #[serde(deserialize_with = "de_degrees")]
    pub longitude: f64,
    /// Nearest street.
    pub street: Street,
}

/// Latest case-resolution status of a crime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeStatus {
    /// Outcome description (e.g. "Investigation complete; no suspect identified").
    pub category: String,
}

/// A single street-level crime as reported by police.uk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeRecord {
    /// Open-ended category tag (e.g. `"burglary"`, `"vehicle-crime"`).
    pub category: String,
    /// Where the crime was reported.
    pub location: CrimeLocation,
    /// Reporting month as `YYYY-MM`.
    pub month: String,
    /// Outcome, if one has been recorded.
    #[serde(default)]
    pub outcome_status: Option<OutcomeStatus>,
}

impl CrimeRecord {
    /// Street name of the incident location.
    #[must_use]
    pub fn street_name(&self) -> &str {
        &self.location.street.name
    }

    /// Coordinate of the incident location.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.location.latitude, self.location.longitude)
    }

    /// Outcome category, if any.
    #[must_use]
    pub fn outcome(&self) -> Option<&str> {
        self.outcome_status.as_ref().map(|o| o.category.as_str())
    }

    /// Outcome category, or [`UNRESOLVED_OUTCOME_LABEL`] when none is
    /// recorded.
    #[must_use]
    pub fn outcome_label(&self) -> &str {
        self.outcome().unwrap_or(UNRESOLVED_OUTCOME_LABEL)
    }
}

/// Formats a category tag for display: `"vehicle-crime"` → `"VEHICLE CRIME"`.
#[must_use]
pub fn category_label(category: &str) -> String {
    category.replace('-', " ").to_uppercase()
}

fn de_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Number of incidents in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category tag.
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// Number of incidents sharing an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeCount {
    /// Outcome category.
    pub outcome: String,
    /// Number of incidents.
    pub count: u64,
}

/// Number of incidents reported in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCount {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Number of incidents.
    pub count: u64,
}

/// Aggregate statistics over the crimes around one coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaStatistics {
    /// Total number of incidents.
    pub total_crimes: u64,
    /// Counts per category, most frequent first.
    pub categories: Vec<CategoryCount>,
    /// Counts per outcome, most frequent first.
    pub outcomes: Vec<OutcomeCount>,
    /// Counts per month, most recent first.
    pub monthly_trends: Vec<MonthCount>,
}

impl AreaStatistics {
    /// The `n` most frequent categories.
    #[must_use]
    pub fn top_categories(&self, n: usize) -> &[CategoryCount] {
        &self.categories[..n.min(self.categories.len())]
    }

    /// The `n` most frequent outcomes.
    #[must_use]
    pub fn top_outcomes(&self, n: usize) -> &[OutcomeCount] {
        &self.outcomes[..n.min(self.outcomes.len())]
    }

    /// The `n` most recent months.
    #[must_use]
    pub fn recent_months(&self, n: usize) -> &[MonthCount] {
        &self.monthly_trends[..n.min(self.monthly_trends.len())]
    }
}

/// Heuristic travel advice derived from a crime collection.
///
/// This is advisory text only; no path is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAdvisory {
    /// Streets with many incidents in high-frequency categories.
    pub avoid_areas: Vec<String>,
    /// Suggested travel windows.
    pub safe_times: Vec<String>,
    /// Safety tips, general ones first.
    pub recommendations: Vec<String>,
}

/// Relative frequency band of an incident's category within an area.
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
pub enum RiskLevel {
    /// Category makes up at most 10% of incidents.
    Safe,
    /// Category makes up more than 10% of incidents.
    Caution,
    /// Category makes up more than 20% of incidents.
    Danger,
}

/// Kind of incident a user can report.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentType {
    /// Theft of property.
    Theft,
    /// Physical assault.
    Assault,
    /// Damage to property.
    Vandalism,
    /// Behaviour that looks like it may precede a crime.
    #[serde(rename = "suspicious")]
    #[strum(serialize = "suspicious")]
    SuspiciousActivity,
    /// Anything else.
    Other,
}

impl IncidentType {
    /// Every reportable incident type, in menu order.
    pub const ALL: &[Self] = &[
        Self::Theft,
        Self::Assault,
        Self::Vandalism,
        Self::SuspiciousActivity,
        Self::Other,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Theft => "Theft",
            Self::Assault => "Assault",
            Self::Vandalism => "Vandalism",
            Self::SuspiciousActivity => "Suspicious Activity",
            Self::Other => "Other",
        }
    }
}

/// Broad media class of a report attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttachmentKind {
    /// `image/*`
    Image,
    /// `video/*`
    Video,
}

impl AttachmentKind {
    /// Classifies a MIME type. Returns `None` for anything that is not an
    /// image or video.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let (top, sub) = content_type.split_once('/')?;
        if sub.is_empty() {
            return None;
        }
        match top.to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// A photo or video attached to an incident report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Original file name.
    pub file_name: String,
    /// Media class derived from the MIME type.
    pub kind: AttachmentKind,
    /// MIME type as supplied.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// A user-submitted incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    /// Locally generated report identifier.
    pub id: Uuid,
    /// What happened.
    pub incident_type: IncidentType,
    /// Free-text description.
    pub description: String,
    /// Where it happened, when known.
    pub location: Option<Coordinate>,
    /// When the report was created.
    pub submitted_at: DateTime<Utc>,
    /// Photos and videos.
    pub attachments: Vec<Attachment>,
}
