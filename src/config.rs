use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const CLOUD_SERVER_ENV: &str = "CLOUD_SERVER";
pub const MATTERMOST_WEBHOOK_ENV: &str = "MATTERMOST_WEBHOOK";

pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Validated settings for one process. Built once at startup and shared
/// read-only by every invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub cloud_server_url: Url,
    pub webhook_url: Url,
}

impl Config {
    pub fn new(cloud_server: &str, webhook: &str) -> Result<Self, ConfigError> {
        Ok(Config {
            cloud_server_url: parse_url(CLOUD_SERVER_ENV, cloud_server)?,
            webhook_url: parse_url(MATTERMOST_WEBHOOK_ENV, webhook)?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cloud_server = required(&lookup, CLOUD_SERVER_ENV)?;
        let webhook = required(&lookup, MATTERMOST_WEBHOOK_ENV)?;
        Self::new(&cloud_server, &webhook)
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Missing(var));
    }
    let url = Url::parse(value).map_err(|error| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
        reason: error.to_string(),
    })?;
    // mailto:, data: and friends parse fine but cannot carry a path to join onto
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            var,
            value: value.to_string(),
            reason: "not an absolute hierarchical URL".to_string(),
        });
    }
    Ok(url)
}
