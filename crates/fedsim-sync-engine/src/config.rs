//! Engine configuration
//!
//! The backend base URL and the start-command secret are deployment concerns,
//! never literals in the engine. Everything can be overridden through
//! environment variables.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default backend base URL (local development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default cadence for the status + ledger feeds.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_millis(1000);

/// Default cadence for the roster feeds (clients, model, datasets).
pub const DEFAULT_ROSTER_INTERVAL: Duration = Duration::from_millis(5000);

/// Configuration for the synchronization engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the simulation backend, without a trailing path.
    pub base_url: String,

    /// Shared secret forwarded verbatim in the start command body.
    /// Validating it is strictly a backend concern.
    pub db_password: String,

    /// Cadence of the status + ledger polls.
    pub status_interval: Duration,

    /// Cadence of the roster polls.
    pub roster_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            db_password: String::new(),
            status_interval: DEFAULT_STATUS_INTERVAL,
            roster_interval: DEFAULT_ROSTER_INTERVAL,
        }
    }
}

impl EngineConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables:
    /// - `FEDSIM_API_URL`: backend base URL
    /// - `FEDSIM_DB_PASSWORD`: start-command secret
    /// - `FEDSIM_STATUS_INTERVAL_MS`: status/ledger cadence in milliseconds
    /// - `FEDSIM_ROSTER_INTERVAL_MS`: roster cadence in milliseconds
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("FEDSIM_API_URL").unwrap_or(defaults.base_url),
            db_password: env::var("FEDSIM_DB_PASSWORD").unwrap_or(defaults.db_password),
            status_interval: interval_from_env(
                "FEDSIM_STATUS_INTERVAL_MS",
                defaults.status_interval,
            ),
            roster_interval: interval_from_env(
                "FEDSIM_ROSTER_INTERVAL_MS",
                defaults.roster_interval,
            ),
        }
    }
}

fn interval_from_env(var: &str, default: Duration) -> Duration {
    match env::var(var) {
        Ok(raw) => parse_interval(var, &raw, default),
        Err(_) => default,
    }
}

fn parse_interval(var: &str, raw: &str, default: Duration) -> Duration {
    match raw.parse::<u64>() {
        // A zero interval would spin the poller.
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => {
            tracing::warn!(var, value = %raw, "ignoring unparseable poll interval");
            default
        }
    }
}
