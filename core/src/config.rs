//! Client configuration: credentials, endpoint, timeout and logging toggle.
//!
//! # Design
//! `Config` is a plain value handed to `Client::new`, which keeps its own
//! copy. For applications that prefer a single process-wide setup there is
//! `configure` / `current`: configure once at startup, then build clients
//! with `Client::from_current`. The global sits behind an `RwLock`, but
//! reconfiguring while requests are in flight is still not meaningful: each
//! client keeps the snapshot it was built with.

use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://api.beta.shipwire.com/api/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub const ENV_USERNAME: &str = "SHIPWIRE_USERNAME";
pub const ENV_PASSWORD: &str = "SHIPWIRE_PASSWORD";
pub const ENV_ENDPOINT: &str = "SHIPWIRE_ENDPOINT";
pub const ENV_TIMEOUT: &str = "SHIPWIRE_TIMEOUT";
pub const ENV_LOGGING: &str = "SHIPWIRE_LOGGING";

/// Settings read on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub username: String,
    pub password: String,
    /// Base URL that relative resource paths are appended to.
    pub endpoint: String,
    pub timeout: Duration,
    /// Emit one `tracing` event per request.
    pub logging_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            logging_enabled: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("logging_enabled", &self.logging_enabled)
            .finish()
    }
}

impl Config {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Defaults overlaid with the `SHIPWIRE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply(&ConfigUpdate::from_env()?);
        Ok(config)
    }

    /// Merge every field the update sets. Applying the same update again is a no-op.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(username) = &update.username {
            self.username.clone_from(username);
        }
        if let Some(password) = &update.password {
            self.password.clone_from(password);
        }
        if let Some(endpoint) = &update.endpoint {
            self.endpoint.clone_from(endpoint);
        }
        if let Some(timeout) = update.timeout {
            self.timeout = timeout;
        }
        if let Some(enabled) = update.logging_enabled {
            self.logging_enabled = enabled;
        }
    }

    /// Check that everything a request needs is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::Missing("username"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::Missing("password"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Missing("endpoint"));
        }
        Ok(())
    }
}

/// A partial update; unset fields leave the current value alone.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
    pub logging_enabled: Option<bool>,
}

impl fmt::Debug for ConfigUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigUpdate")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("logging_enabled", &self.logging_enabled)
            .finish()
    }
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = Some(enabled);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build an update from any key lookup; unset or empty variables are skipped.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout = match get(ENV_TIMEOUT) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };
        let logging_enabled = match get(ENV_LOGGING) {
            Some(raw) => Some(parse_flag(&raw)?),
            None => None,
        };

        Ok(Self {
            username: get(ENV_USERNAME),
            password: get(ENV_PASSWORD),
            endpoint: get(ENV_ENDPOINT),
            timeout,
            logging_enabled,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| ConfigError::InvalidValue {
            key: ENV_TIMEOUT,
            value: raw.to_string(),
        })
}

fn parse_flag(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: ENV_LOGGING,
            value: raw.to_string(),
        }),
    }
}

fn global() -> &'static RwLock<Config> {
    static GLOBAL: OnceLock<RwLock<Config>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(Config::default()))
}

/// Merge `update` into the process-wide configuration and return the result.
///
/// Meant to be called once at startup, before any `Client::from_current`.
pub fn configure(update: ConfigUpdate) -> Config {
    let mut config = global().write().unwrap_or_else(PoisonError::into_inner);
    config.apply(&update);
    config.clone()
}

/// Snapshot of the process-wide configuration.
pub fn current() -> Config {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Restore the process-wide configuration to its defaults.
pub fn reset() {
    *global().write().unwrap_or_else(PoisonError::into_inner) = Config::default();
}
