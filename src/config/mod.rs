use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::Result;
use crate::error::Error as RelayError;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use serde::HumantimeDuration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/zabbix/zabbix-pachca.toml";

/// Everything a relay invocation needs beyond the alert itself.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub zabbix_url: Url,
    pub cache_path: PathBuf,
    pub http_request_timeout: Duration,
    pub http_connect_timeout: Duration,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be parsed, when
    /// environment overrides are invalid, or when the resulting values fail
    /// validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(RelayError::from)?;
        raw.apply_env_overrides().map_err(RelayError::from)?;
        raw.validate_and_build()
    }
}
