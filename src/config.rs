//! Server configuration from environment variables.
//!
//! `HOST` (default 0.0.0.0), `PORT` (8080), `DEFAULT_NUM_COURTS` (4),
//! `DEFAULT_MATCH_DURATION` (30 minutes), `MATCH_CODE_TTL_HOURS` (24).

use crate::logic::DEFAULT_CODE_TTL_HOURS;
use crate::models::{DEFAULT_MATCH_DURATION_MINUTES, DEFAULT_NUM_COURTS};
use chrono::Duration;
use std::str::FromStr;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Courts used when a scheduling request leaves `num_courts` out.
    pub default_num_courts: u32,
    pub default_match_duration_minutes: i64,
    pub match_code_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_num_courts: DEFAULT_NUM_COURTS,
            default_match_duration_minutes: DEFAULT_MATCH_DURATION_MINUTES,
            match_code_ttl_hours: DEFAULT_CODE_TTL_HOURS,
        }
    }
}

/// Parse `key` from `lookup`, falling back to `default` when unset or malformed.
fn parsed<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring malformed {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test map).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(d.host),
            port: parsed(&lookup, "PORT", d.port),
            default_num_courts: parsed(&lookup, "DEFAULT_NUM_COURTS", d.default_num_courts),
            default_match_duration_minutes: parsed(
                &lookup,
                "DEFAULT_MATCH_DURATION",
                d.default_match_duration_minutes,
            ),
            match_code_ttl_hours: parsed(&lookup, "MATCH_CODE_TTL_HOURS", d.match_code_ttl_hours),
        }
    }

    /// Code lifetime, clamped to between one hour and one year.
    pub fn match_code_ttl(&self) -> Duration {
        Duration::hours(self.match_code_ttl_hours.clamp(1, 24 * 365))
    }
}
