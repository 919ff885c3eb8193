//! Settings file management

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::errors::NavError;
use crate::logs::LogLevel;

/// Navigation menu settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON formatted logs
    #[serde(default)]
    pub json_logs: bool,

    /// Directory for rolling log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Admin API configuration
    #[serde(default)]
    pub admin: AdminSettings,

    /// Deploy poller configuration
    #[serde(default)]
    pub deploy: DeploySettings,

    /// Navigation config flags
    #[serde(default)]
    pub nav: NavSettings,
}

impl Settings {
    /// Load settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, NavError> {
        debug!("Loading settings from {}", path.display());
        let contents = tokio::fs::read_to_string(path).await?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }
}

/// Admin API settings
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSettings {
    /// Base URL the deploy-changes endpoints hang off
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Admin session cookie sent with every request
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub session_cookie: Option<SecretString>,
}

fn default_base_url() -> String {
    "http://localhost:2368/blog/ghost".to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(SecretString::from))
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
        }
    }
}

/// Deploy poller settings
#[derive(Debug, Clone, Deserialize)]
pub struct DeploySettings {
    /// Delay between status polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Consecutive failed status polls tolerated before giving up
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_consecutive_failures() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_consecutive_failures: default_max_consecutive_failures(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Config flags the navigation reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavSettings {
    /// `clientExtensions.menu` is configured
    #[serde(default)]
    pub client_extensions_menu: bool,

    /// `hostSettings.billing.enabled`
    #[serde(default)]
    pub billing_enabled: bool,
}
