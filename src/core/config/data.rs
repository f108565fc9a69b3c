use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_PROVIDER_REFRESH, DEFAULT_USER_ID};
use crate::utils::url::normalize_base_url;

/// Contents of `config.toml`. Every key is optional; unset keys fall back
/// to built-in defaults when [`Config::resolve`] is called.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Backend address, e.g. `http://localhost:8000`
    pub base_url: Option<String>,
    /// Identifier sent as `user_id` with every chat message
    pub user_id: Option<String>,
    /// Seconds between provider status refreshes in chat
    pub provider_refresh_secs: Option<u64>,
    /// Render bold and bullet markup in replies
    pub markup: Option<bool>,
}

/// Keys accepted by `wayfarer set` / `wayfarer unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    UserId,
    ProviderRefreshSecs,
    Markup,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::BaseUrl,
        ConfigKey::UserId,
        ConfigKey::ProviderRefreshSecs,
        ConfigKey::Markup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::UserId => "user-id",
            ConfigKey::ProviderRefreshSecs => "provider-refresh-secs",
            ConfigKey::Markup => "markup",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
    }
}

/// Effective settings after applying CLI flags, environment and file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub user_id: String,
    pub provider_refresh: Duration,
    pub markup: bool,
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub env_base_url: Option<String>,
    pub user_id: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl Config {
    /// Resolve effective settings: CLI flag, then environment, then file,
    /// then default.
    pub fn resolve(&self, overrides: &Overrides) -> Settings {
        let base_url = non_blank(overrides.base_url.as_deref())
            .or_else(|| non_blank(overrides.env_base_url.as_deref()))
            .or_else(|| non_blank(self.base_url.as_deref()))
            .unwrap_or(DEFAULT_BASE_URL);

        let user_id = non_blank(overrides.user_id.as_deref())
            .or_else(|| non_blank(self.user_id.as_deref()))
            .unwrap_or(DEFAULT_USER_ID);

        let provider_refresh = self
            .provider_refresh_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PROVIDER_REFRESH);

        Settings {
            base_url: normalize_base_url(base_url),
            user_id: user_id.to_string(),
            provider_refresh,
            markup: self.markup.unwrap_or(true),
        }
    }

    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {}", key.as_str()));
        }
        match key {
            ConfigKey::BaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!(
                        "base-url must start with http:// or https://, got '{value}'"
                    ));
                }
                self.base_url = Some(normalize_base_url(value));
            }
            ConfigKey::UserId => self.user_id = Some(value.to_string()),
            ConfigKey::ProviderRefreshSecs => {
                let secs: u64 = value.parse().map_err(|_| {
                    format!("provider-refresh-secs must be a whole number, got '{value}'")
                })?;
                if secs == 0 {
                    return Err("provider-refresh-secs must be greater than zero".to_string());
                }
                self.provider_refresh_secs = Some(secs);
            }
            ConfigKey::Markup => {
                self.markup = Some(match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" | "1" => true,
                    "off" | "false" | "no" | "0" => false,
                    _ => return Err(format!("markup must be on or off, got '{value}'")),
                });
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::UserId => self.user_id = None,
            ConfigKey::ProviderRefreshSecs => self.provider_refresh_secs = None,
            ConfigKey::Markup => self.markup = None,
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
