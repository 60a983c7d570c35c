//! Compile-time registry of the external services Guardian talks to.
//!
//! Each service is defined in a TOML file under `services/`. The registry
//! embeds these at compile time; [`Endpoints::from_env`] applies the
//! per-service environment override (e.g. `GUARDIAN_POLICE_URL`) on top.

use serde::Deserialize;

use crate::FetchError;

/// A service definition loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceDefinition {
    /// Unique identifier (`"postcodes"`, `"nominatim"`, `"police"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Base URL that request paths are appended to.
    pub base_url: String,
    /// Environment variable that replaces `base_url` when set.
    #[serde(default)]
    pub env_override: Option<String>,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// postcodes.io structured postcode lookup.
    Postcodes,
    /// Nominatim free-text search.
    Nominatim {
        /// Comma-separated ISO country codes to restrict results to.
        country_codes: String,
        /// Maximum number of results requested.
        limit: u32,
    },
    /// data.police.uk street-level crime API.
    PoliceUk,
}

impl ServiceDefinition {
    /// Returns a copy with `base_url` replaced by the override variable's
    /// value, when that variable is set and non-blank.
    #[must_use]
    pub fn with_env_override(&self) -> Self {
        let mut service = self.clone();
        if let Some(url) = self
            .env_override
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            log::debug!("Using {} override for {}: {url}", service.id, service.name);
            service.base_url = url;
        }
        service
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("postcodes", include_str!("../services/postcodes.toml")),
    ("nominatim", include_str!("../services/nominatim.toml")),
    ("police", include_str!("../services/police.toml")),
];

/// Returns every embedded service definition.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so
/// this is caught by the tests below).
#[must_use]
pub fn all_services() -> Vec<ServiceDefinition> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse service '{name}': {e}"))
        })
        .collect()
}

/// Looks up a service by id.
#[must_use]
pub fn service(id: &str) -> Option<ServiceDefinition> {
    all_services().into_iter().find(|s| s.id == id)
}

/// The three services a search needs, with overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Postcode lookup.
    pub postcodes: ServiceDefinition,
    /// Place-name fallback.
    pub nominatim: ServiceDefinition,
    /// Crime listing.
    pub police: ServiceDefinition,
}

impl Endpoints {
    /// Loads the embedded definitions and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Config`] if a required service is missing.
    pub fn from_env() -> Result<Self, FetchError> {
        let lookup = |id: &str| {
            service(id)
                .map(|s| s.with_env_override())
                .ok_or_else(|| FetchError::Config {
                    message: format!("No service definition for '{id}'"),
                })
        };
        Ok(Self {
            postcodes: lookup("postcodes")?,
            nominatim: lookup("nominatim")?,
            police: lookup("police")?,
        })
    }

    /// Endpoints pointing every service at `base_url`, for tests and
    /// local mocks. Paths are kept distinct so requests can be told apart.
    #[must_use]
    pub fn local(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            postcodes: ServiceDefinition {
                id: "postcodes".to_string(),
                name: "postcodes (local)".to_string(),
                base_url: format!("{base}/pc"),
                env_override: None,
                provider: ProviderConfig::Postcodes,
            },
            nominatim: ServiceDefinition {
                id: "nominatim".to_string(),
                name: "nominatim (local)".to_string(),
                base_url: format!("{base}/search"),
                env_override: None,
                provider: ProviderConfig::Nominatim {
                    country_codes: "gb".to_string(),
                    limit: 1,
                },
            },
            police: ServiceDefinition {
                id: "police".to_string(),
                name: "police (local)".to_string(),
                base_url: format!("{base}/police"),
                env_override: None,
                provider: ProviderConfig::PoliceUk,
            },
        }
    }
}
