//! Application configuration options

use std::time::Duration;

use crate::deploy::poller;
use crate::http::client::ClientOptions;
use crate::logs::LogOptions;
use crate::nav::flags::NavConfig;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Admin HTTP client configuration
    pub client: ClientOptions,

    /// Deploy poller options
    pub poller: poller::Options,

    /// Navigation config flags
    pub nav: NavConfig,

    /// Logging configuration
    pub log: LogOptions,
}

impl AppOptions {
    /// Build options from a settings file
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            client: ClientOptions {
                base_url: settings.admin.base_url.clone(),
                session_cookie: settings.admin.session_cookie.clone(),
                timeout: Duration::from_secs(settings.deploy.request_timeout_secs),
            },
            poller: poller::Options {
                poll_interval: Duration::from_millis(settings.deploy.poll_interval_ms),
                max_consecutive_failures: settings.deploy.max_consecutive_failures,
                ..Default::default()
            },
            nav: NavConfig {
                client_extensions_menu: settings.nav.client_extensions_menu,
                billing_enabled: settings.nav.billing_enabled,
            },
            log: LogOptions {
                log_level: settings.log_level.clone(),
                json_format: settings.json_logs,
                log_dir: settings.log_dir.clone(),
                ..Default::default()
            },
        }
    }
}
