//! Server settings read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use harvest_core::HarvesterConfig;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid { key: &'static str, value: String, reason: String },
}

/// Runtime settings for `harvest-server`.
///
/// | variable                  | default        |
/// |---------------------------|----------------|
/// | `HARVEST_ADDR`            | `0.0.0.0:8000` |
/// | `HARVEST_TIMEOUT`         | `30` (seconds, page fetch) |
/// | `HARVEST_USER_AGENT`      | core default   |
/// | `HARVEST_REQUEST_TIMEOUT` | `60` (seconds, whole request; must exceed `HARVEST_TIMEOUT`) |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub harvester: HarvesterConfig,
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_value = lookup("HARVEST_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_value.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            key: "HARVEST_ADDR",
            value: addr_value.clone(),
            reason: e.to_string(),
        })?;

        let mut harvester = HarvesterConfig::default();
        if let Some(timeout) = parse_secs(&lookup, "HARVEST_TIMEOUT")? {
            harvester.timeout = timeout;
        }
        if let Some(user_agent) = lookup("HARVEST_USER_AGENT") {
            harvester.user_agent = user_agent;
        }

        let request_timeout = parse_secs(&lookup, "HARVEST_REQUEST_TIMEOUT")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout <= harvester.timeout {
            return Err(ConfigError::Invalid {
                key: "HARVEST_REQUEST_TIMEOUT",
                value: request_timeout.to_string(),
                reason: format!("must be greater than the fetch timeout ({}s)", harvester.timeout),
            });
        }

        Ok(Self { addr, harvester, request_timeout: Duration::from_secs(request_timeout) })
    }
}

fn parse_secs<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid { key, value, reason: "must be greater than zero".to_string() }),
        Ok(secs) => Ok(Some(secs)),
        Err(e) => Err(ConfigError::Invalid { key, value, reason: e.to_string() }),
    }
}
