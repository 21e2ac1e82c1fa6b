// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML settings for services embedding locks and pools

use crate::lock::LockConfig;
use crate::pool::PoolConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
}

/// Connection settings for the Redis coordination store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    /// Server address, `host:port`
    pub addr: String,
    /// AUTH password; `None` when the server has no auth
    pub password: Option<String>,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            password: None,
            connect_timeout: Duration::from_secs(3),
        }
    }
}

impl RedisSettings {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Connection URL understood by the redis client.
    ///
    /// The password is percent-encoded into the userinfo, so reserved
    /// characters survive the round trip.
    pub fn url(&self) -> Result<String, ConfigError> {
        let invalid = || ConfigError::Invalid(format!("invalid redis address {:?}", self.addr));
        let mut url = Url::parse(&format!("redis://{}", self.addr)).map_err(|_| invalid())?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid());
        }
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password)).map_err(|()| invalid())?;
        }
        Ok(url.into())
    }
}

/// Top-level settings, each section optional
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lock: LockConfig,
    pub pool: PoolConfig,
    pub redis: RedisSettings,
}

impl Settings {
    /// Parse and validate settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pool.validate()?;
        if self.lock.lease < Duration::from_secs(1) {
            return Err(ConfigError::Invalid(format!(
                "lock lease must be at least one second, got {:?}",
                self.lock.lease
            )));
        }
        if self.redis.addr.is_empty() {
            return Err(ConfigError::Invalid("redis addr must be set".to_string()));
        }
        self.redis.url()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
