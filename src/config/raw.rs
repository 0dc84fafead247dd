use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;
use url::Url;

use crate::Result;
use crate::error::ConfigError;

use super::defaults::{
    default_api_url, default_cache_path, default_connect_timeout, default_request_timeout,
};
use super::env::{env_duration, env_string};
use super::{Config, HumantimeDuration};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(
        ::config::File::from(path)
            .format(::config::FileFormat::Toml)
            .required(false),
    );
    builder = builder.add_source(
        ::config::Environment::with_prefix("RELAY")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) pachca: RawPachca,
    #[serde(default)]
    pub(super) zabbix: RawZabbix,
    #[serde(default)]
    pub(super) cache: RawCache,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawPachca {
    #[serde(default = "default_api_url")]
    pub(super) api_url: String,
    #[serde(default = "default_request_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) timeout: Duration,
    #[serde(default = "default_connect_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) connect_timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawZabbix {
    pub(super) url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawCache {
    #[serde(default = "default_cache_path")]
    pub(super) path: PathBuf,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(url) = env_string("PACHCA_API_URL")? {
            self.pachca.api_url = url;
        }
        if let Some(timeout) = env_duration("PACHCA_HTTP_TIMEOUT")? {
            self.pachca.timeout = timeout;
        }
        if let Some(timeout) = env_duration("PACHCA_CONNECT_TIMEOUT")? {
            self.pachca.connect_timeout = timeout;
        }
        if let Some(path) = env_string("PACHCA_CACHE_FILE")? {
            self.cache.path = PathBuf::from(path);
        }
        if let Some(url) = env_string("ZABBIX_URL")? {
            self.zabbix.url = Some(url);
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let api_url = Url::parse(self.pachca.api_url.trim()).map_err(|err| {
            ConfigError::InvalidField {
                field: "pachca.api_url",
                message: err.to_string(),
            }
        })?;
        if api_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidField {
                field: "pachca.api_url",
                message: "URL cannot carry a message id path segment".to_string(),
            }
            .into());
        }

        let zabbix_src = self.zabbix.url.ok_or(ConfigError::MissingField {
            field: "zabbix.url",
        })?;
        let zabbix_url =
            Url::parse(zabbix_src.trim()).map_err(|err| ConfigError::InvalidField {
                field: "zabbix.url",
                message: err.to_string(),
            })?;
        if !matches!(zabbix_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidField {
                field: "zabbix.url",
                message: format!("expected an http(s) URL, got {}", zabbix_url.scheme()),
            }
            .into());
        }

        if self.pachca.timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "pachca.timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if self.pachca.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "pachca.connect_timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if self.cache.path.file_name().is_none() {
            return Err(ConfigError::InvalidField {
                field: "cache.path",
                message: format!("{} does not name a file", self.cache.path.display()),
            }
            .into());
        }

        Ok(Config {
            api_url,
            zabbix_url,
            cache_path: self.cache.path,
            http_request_timeout: self.pachca.timeout,
            http_connect_timeout: self.pachca.connect_timeout,
        })
    }
}

impl Default for RawPachca {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for RawCache {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}
