use crate::models::LocationId;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const POLL_INTERVAL_VAR: &str = "LIVE_TALLY_POLL_INTERVAL_SECS";
pub const LOCATIONS_VAR: &str = "LIVE_TALLY_LOCATIONS";
pub const URL_TEMPLATE_VAR: &str = "LIVE_TALLY_URL_TEMPLATE";
pub const REQUEST_TIMEOUT_VAR: &str = "LIVE_TALLY_REQUEST_TIMEOUT_SECS";

/// Placeholder in the URL template replaced by the location identifier.
pub const LOCATION_PLACEHOLDER: &str = "{location}";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
const DEFAULT_LOCATIONS: &str = "statewiseS071";
const DEFAULT_URL_TEMPLATE: &str = "https://results.eci.gov.in/PcResultGenJune2024/{location}.htm";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive whole number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },

    #[error("{0} does not name any location")]
    NoLocations(&'static str),

    #[error("{var} must contain the {placeholder} placeholder, got {value:?}")]
    MissingPlaceholder {
        var: &'static str,
        placeholder: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub poll_interval: Duration,
    pub locations: Vec<LocationId>,
    pub url_template: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads settings from the process environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_interval = seconds(&lookup, POLL_INTERVAL_VAR, DEFAULT_POLL_INTERVAL_SECS)?;
        let request_timeout = seconds(&lookup, REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let raw_locations = lookup(LOCATIONS_VAR).unwrap_or_else(|| DEFAULT_LOCATIONS.to_string());
        let mut locations: Vec<LocationId> = Vec::new();
        for part in raw_locations.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = LocationId::new(part);
            if !locations.contains(&id) {
                locations.push(id);
            }
        }
        if locations.is_empty() {
            return Err(ConfigError::NoLocations(LOCATIONS_VAR));
        }

        let url_template = lookup(URL_TEMPLATE_VAR)
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string());
        if !url_template.contains(LOCATION_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                var: URL_TEMPLATE_VAR,
                placeholder: LOCATION_PLACEHOLDER,
                value: url_template,
            });
        }

        Ok(Self {
            poll_interval,
            locations,
            url_template,
            request_timeout,
        })
    }

    /// The page address for one location.
    pub fn url_for(&self, location: &LocationId) -> String {
        self.url_template.replace(LOCATION_PLACEHOLDER, location.as_str())
    }
}

fn seconds<F>(lookup: &F, var: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(Duration::from_secs(default)),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidSeconds { var, value }),
        },
    }
}
