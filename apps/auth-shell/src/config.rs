//! Shell configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use auth::{DEFAULT_LOGOUT_DELAY_MS, DEFAULT_REQUEST_DELAY_MS, ServiceConfig};

/// Default location of the local storage file.
pub const DEFAULT_STORAGE_PATH: &str = ".auth-shell/storage.json";

/// Shell configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Local storage file.
    pub storage_path: PathBuf,
    /// Simulated login latency.
    pub login_delay: Duration,
    /// Simulated registration latency.
    pub register_delay: Duration,
    /// Simulated logout latency.
    pub logout_delay: Duration,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let millis = |key: &str, default: u64| -> anyhow::Result<Duration> {
            match lookup(key) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map(Duration::from_millis)
                    .map_err(|_| anyhow::anyhow!("{key} must be a number of milliseconds")),
                None => Ok(Duration::from_millis(default)),
            }
        };

        Ok(Self {
            storage_path: lookup("AUTH_SHELL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
            login_delay: millis("AUTH_SHELL_LOGIN_DELAY_MS", DEFAULT_REQUEST_DELAY_MS)?,
            register_delay: millis("AUTH_SHELL_REGISTER_DELAY_MS", DEFAULT_REQUEST_DELAY_MS)?,
            logout_delay: millis("AUTH_SHELL_LOGOUT_DELAY_MS", DEFAULT_LOGOUT_DELAY_MS)?,
            log_level: lookup("AUTH_SHELL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Returns the latency settings for the mock backend.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::default()
            .with_login_delay(self.login_delay)
            .with_register_delay(self.register_delay)
            .with_logout_delay(self.logout_delay)
    }
}
