//! Centralized configuration (environment variables + defaults).

use crate::storage::DEFAULT_SESSION_KEY;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_SESSION_DIR: &str = "~/.sweet-shop";
pub const DEFAULT_NOTIFICATION_SECS: u64 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Settings for the shop client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root of the inventory service.
    pub api_base: String,
    /// Directory holding the persisted session.
    pub session_dir: PathBuf,
    /// Key the session is stored under.
    pub session_key: String,
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
    /// Sign out when the service rejects the token on a routine call.
    pub logout_on_unauthorized: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            session_dir: expand_path(DEFAULT_SESSION_DIR),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            notification_ttl: Duration::from_secs(DEFAULT_NOTIFICATION_SECS),
            logout_on_unauthorized: false,
        }
    }
}

impl ClientConfig {
    /// Reads `.env` (if present) and the `SWEET_SHOP_*` variables; anything
    /// unset keeps its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = non_empty(lookup("SWEET_SHOP_API_BASE")) {
            config.api_base = v;
        }
        if let Some(v) = non_empty(lookup("SWEET_SHOP_SESSION_DIR")) {
            config.session_dir = expand_path(&v);
        }
        if let Some(v) = non_empty(lookup("SWEET_SHOP_SESSION_KEY")) {
            config.session_key = v;
        }
        if let Some(v) = non_empty(lookup("SWEET_SHOP_NOTIFICATION_SECS")) {
            let secs = v.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                ConfigError::Invalid {
                    var: "SWEET_SHOP_NOTIFICATION_SECS",
                    expected: "a positive number of seconds",
                    value: v.clone(),
                }
            })?;
            config.notification_ttl = Duration::from_secs(secs);
        }
        if let Some(v) = non_empty(lookup("SWEET_SHOP_LOGOUT_ON_UNAUTHORIZED")) {
            config.logout_on_unauthorized = parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                var: "SWEET_SHOP_LOGOUT_ON_UNAUTHORIZED",
                expected: "true or false",
                value: v.clone(),
            })?;
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
