use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portal: PortalConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    pub base_url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_login_endpoint")]
    pub login_endpoint: String,
    #[serde(default = "default_logout_endpoint")]
    pub logout_endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_current_user_element")]
    pub current_user_element: String,
    #[serde(default = "default_logout_trigger_element")]
    pub logout_trigger_element: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_alert_container")]
    pub container_id: String,
    #[serde(default = "default_alert_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_alert_fade_ms")]
    pub fade_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            current_user_element: default_current_user_element(),
            logout_trigger_element: default_logout_trigger_element(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            container_id: default_alert_container(),
            duration_ms: default_alert_duration_ms(),
            fade_ms: default_alert_fade_ms(),
        }
    }
}

// Default value functions
fn default_login_path() -> String {
    "/login".to_string()
}

fn default_login_endpoint() -> String {
    "/api/v1/auth/login".to_string()
}

fn default_logout_endpoint() -> String {
    "/api/v1/auth/logout".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("session.json")
}

fn default_current_user_element() -> String {
    "current-user-name".to_string()
}

fn default_logout_trigger_element() -> String {
    "logout-btn".to_string()
}

fn default_alert_container() -> String {
    "alert-container".to_string()
}

fn default_alert_duration_ms() -> u64 {
    5000
}

fn default_alert_fade_ms() -> u64 {
    150 // matches the banner fade transition
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate portal config
        if self.portal.base_url.is_empty() {
            bail!("base_url must not be empty");
        }

        if !self.portal.base_url.starts_with("http://") && !self.portal.base_url.starts_with("https://") {
            bail!(
                "Invalid base_url '{}'. Must start with http:// or https://",
                self.portal.base_url
            );
        }

        for (name, path) in [
            ("login_path", &self.portal.login_path),
            ("login_endpoint", &self.portal.login_endpoint),
            ("logout_endpoint", &self.portal.logout_endpoint),
        ] {
            if !path.starts_with('/') {
                bail!("{} must start with '/', got '{}'", name, path);
            }
        }

        if self.portal.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        // Validate storage config
        if self.storage.path.as_os_str().is_empty() {
            bail!("storage path must not be empty");
        }

        // Validate alert config
        if self.alerts.container_id.is_empty() {
            bail!("alert container_id must not be empty");
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
