use std::{env, time::Duration};

use crate::error::AppError;

const DEFAULT_SEARCH_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_TIMEZONE_ENDPOINT: &str = "https://secure.geonames.org/timezoneJSON";
const DEFAULT_DEBOUNCE_MS: u64 = 400;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Tuning of the place autocomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Quiet period that must pass after the last edit before a search is sent
    pub debounce: Duration,
    /// Place text shorter than this (in characters) never triggers a search
    pub min_query_chars: usize,
    /// Maximum number of candidates requested from the geocoder
    pub limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_chars: 3,
            limit: 5,
        }
    }
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub search_endpoint: String,
    pub timezone_endpoint: String,
    pub geonames_username: String,
    pub http_timeout: Duration,
    pub search: SearchSettings,
}

impl Config {
    /// Builds the configuration from environment variables.
    ///
    /// `GEONAMES_USERNAME` is required. Endpoints, the debounce period and the
    /// HTTP timeout fall back to defaults when unset.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let geonames_username = lookup("GEONAMES_USERNAME")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::EnvVarNotSet("GEONAMES_USERNAME".to_string()))?;

        let debounce_ms = parse_u64(&lookup, "PLACE_SEARCH_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        let timeout_secs = parse_u64(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        Ok(Self {
            search_endpoint: lookup("NOMINATIM_SEARCH_URL")
                .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
            timezone_endpoint: lookup("GEONAMES_TIMEZONE_URL")
                .unwrap_or_else(|| DEFAULT_TIMEZONE_ENDPOINT.to_string()),
            geonames_username,
            http_timeout: Duration::from_secs(timeout_secs),
            search: SearchSettings {
                debounce: Duration::from_millis(debounce_ms),
                ..SearchSettings::default()
            },
        })
    }
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<u64, AppError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| AppError::InvalidConfig {
            name: name.to_string(),
            reason: format!("expected a non-negative integer, got {:?}", raw),
        }),
    }
}
