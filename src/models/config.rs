//! Application configuration structures.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Device;

/// Environment variable that overrides `snmp.community`.
pub const COMMUNITY_ENV: &str = "PRINTWATCH_COMMUNITY";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// External SNMP client settings
    #[serde(default)]
    pub snmp: SnmpConfig,

    /// Polling and classification settings
    #[serde(default)]
    pub poll: PollConfig,

    /// Printer inventory, polled in this order
    #[serde(default)]
    pub devices: Vec<Device>,

    /// Email delivery
    #[serde(default)]
    pub email: EmailConfig,

    /// JSON document delivery
    #[serde(default)]
    pub json: JsonConfig,

    /// Database delivery
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(community) = env::var(COMMUNITY_ENV) {
            if !community.trim().is_empty() {
                self.snmp.community = community;
            }
        }
    }

    /// Look up a device by name.
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.snmp.command.trim().is_empty() {
            return Err(AppError::validation("snmp.command is empty"));
        }
        if self.snmp.community.trim().is_empty() {
            return Err(AppError::validation("snmp.community is empty"));
        }
        if self.snmp.timeout_secs == 0 {
            return Err(AppError::validation("snmp.timeout_secs must be > 0"));
        }
        for (field, oid) in [
            ("snmp.toner_oid", &self.snmp.toner_oid),
            ("snmp.coded_tray_oid", &self.snmp.coded_tray_oid),
            ("snmp.text_tray_oid", &self.snmp.text_tray_oid),
        ] {
            if oid.trim().is_empty() {
                return Err(AppError::validation(format!("{field} is empty")));
            }
        }
        if self.poll.max_concurrent == 0 {
            return Err(AppError::validation("poll.max_concurrent must be > 0"));
        }
        if !(0..=100).contains(&self.poll.toner_low_percent) {
            return Err(AppError::validation(
                "poll.toner_low_percent must be between 0 and 100",
            ));
        }

        if self.devices.is_empty() {
            return Err(AppError::validation("No devices defined"));
        }
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.name.trim().is_empty() {
                return Err(AppError::validation("Device with empty name"));
            }
            if device.address.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Device {} has an empty address",
                    device.name
                )));
            }
            if !seen.insert(device.name.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate device name: {}",
                    device.name
                )));
            }
        }

        if self.email.enabled {
            if self.email.smtp_server.trim().is_empty() {
                return Err(AppError::validation("email.smtp_server is empty"));
            }
            if self.email.from.trim().is_empty() {
                return Err(AppError::validation("email.from is empty"));
            }
            if self.email.to.is_empty() {
                return Err(AppError::validation("email.to has no recipients"));
            }
        }
        if self.json.enabled && self.json.path.trim().is_empty() {
            return Err(AppError::validation("json.path is empty"));
        }
        if self.database.enabled {
            if self.database.url.is_none() && self.database.url_env.is_none() {
                return Err(AppError::validation(
                    "database.url or database.url_env must be set",
                ));
            }
            if !is_identifier(&self.database.table) {
                return Err(AppError::validation(format!(
                    "database.table is not a valid identifier: {:?}",
                    self.database.table
                )));
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

/// Prefer the named environment variable, then the inline value.
fn resolve_secret(inline: &Option<String>, env_name: &Option<String>) -> Option<String> {
    env_name
        .as_deref()
        .and_then(|name| env::var(name).ok())
        .filter(|v| !v.is_empty())
        .or_else(|| inline.clone())
}

/// External SNMP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnmpConfig {
    /// Walk command to invoke
    #[serde(default = "defaults::command")]
    pub command: String,

    /// SNMPv2c community string
    #[serde(default = "defaults::community")]
    pub community: String,

    /// Per-query timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Marker supply level table (prtMarkerSuppliesLevel)
    #[serde(default = "defaults::toner_oid")]
    pub toner_oid: String,

    /// Vendor tray status table for coded devices
    #[serde(default = "defaults::coded_tray_oid")]
    pub coded_tray_oid: String,

    /// Alert description table for text devices (prtAlertDescription)
    #[serde(default = "defaults::text_tray_oid")]
    pub text_tray_oid: String,
}

impl SnmpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SnmpConfig {
    fn default() -> Self {
        Self {
            command: defaults::command(),
            community: defaults::community(),
            timeout_secs: defaults::timeout(),
            toner_oid: defaults::toner_oid(),
            coded_tray_oid: defaults::coded_tray_oid(),
            text_tray_oid: defaults::text_tray_oid(),
        }
    }
}

/// Polling and classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Toner below this percentage marks a device Low
    #[serde(default = "defaults::toner_low_percent")]
    pub toner_low_percent: i64,

    /// Maximum devices polled at once; 1 polls strictly in sequence
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            toner_low_percent: defaults::toner_low_percent(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// SMTP delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub smtp_server: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Sender address
    #[serde(default)]
    pub from: String,

    /// Recipient addresses
    #[serde(default)]
    pub to: Vec<String>,

    /// SMTP login; defaults to `from`
    #[serde(default)]
    pub username: Option<String>,

    /// Inline password, discouraged; prefer `password_env`
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Environment variable holding the SMTP password
    #[serde(default = "defaults::password_env")]
    pub password_env: Option<String>,

    #[serde(default = "defaults::subject")]
    pub subject: String,
}

impl EmailConfig {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.from)
    }

    pub fn resolve_password(&self) -> Option<String> {
        resolve_secret(&self.password, &self.password_env)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: String::new(),
            smtp_port: defaults::smtp_port(),
            from: String::new(),
            to: Vec::new(),
            username: None,
            password: None,
            password_env: defaults::password_env(),
            subject: defaults::subject(),
        }
    }
}

/// JSON document delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonConfig {
    #[serde(default = "defaults::json_enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::json_path")]
    pub path: String,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::json_enabled(),
            path: defaults::json_path(),
        }
    }
}

/// Database delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Inline connection URL, discouraged when it embeds a password
    #[serde(default, skip_serializing)]
    pub url: Option<String>,

    /// Environment variable holding the connection URL
    #[serde(default = "defaults::url_env")]
    pub url_env: Option<String>,

    #[serde(default = "defaults::table")]
    pub table: String,
}

impl DatabaseConfig {
    pub fn resolve_url(&self) -> Option<String> {
        resolve_secret(&self.url, &self.url_env)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            url_env: defaults::url_env(),
            table: defaults::table(),
        }
    }
}

mod defaults {
    // SNMP defaults
    pub fn command() -> String {
        "snmpwalk".into()
    }
    pub fn community() -> String {
        "public".into()
    }
    pub fn timeout() -> u64 {
        5
    }
    pub fn toner_oid() -> String {
        ".1.3.6.1.2.1.43.11.1.1.9".into()
    }
    pub fn coded_tray_oid() -> String {
        ".1.3.6.1.4.1.11.2.3.9.1.1.2.8".into()
    }
    pub fn text_tray_oid() -> String {
        ".1.3.6.1.2.1.43.18.1.1.8".into()
    }

    // Poll defaults
    pub fn toner_low_percent() -> i64 {
        10
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Delivery defaults
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn password_env() -> Option<String> {
        Some("PRINTWATCH_SMTP_PASSWORD".into())
    }
    pub fn subject() -> String {
        "🖨️ Printer Status Report".into()
    }
    pub fn json_enabled() -> bool {
        true
    }
    pub fn json_path() -> String {
        "printer_status.json".into()
    }
    pub fn url_env() -> Option<String> {
        Some("PRINTWATCH_DATABASE_URL".into())
    }
    pub fn table() -> String {
        "printer_status".into()
    }
}
