//! Configuration schema for toolbelt.toml.

use crate::error::BuildError;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the weather provider key.
pub const WEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Environment variable overriding the news provider key.
pub const NEWS_KEY_ENV: &str = "NEWS_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbeltConfig {
    /// Log level (debug, info, warn, error).
    pub log_level: String,

    /// Reject invocation arguments that no parameter declares.
    pub strict_arguments: bool,

    pub http: HttpSettings,
    pub weather: WeatherSettings,
    pub news: NewsSettings,
    pub cache: CacheSettings,
}

impl Default for ToolbeltConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            strict_arguments: false,
            http: HttpSettings::default(),
            weather: WeatherSettings::default(),
            news: NewsSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

/// Outbound HTTP behaviour shared by every network-backed tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Whole-request timeout.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout.
    pub connect_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("toolbelt/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub api_key: String,
    pub base_url: String,

    /// Unit system passed to the provider (metric, imperial, standard).
    pub units: String,

    /// Language of condition descriptions.
    pub lang: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openweathermap.org/data/2.5".into(),
            units: "metric".into(),
            lang: "en".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    pub api_key: String,
    pub base_url: String,

    /// Article language for keyword search.
    pub language: String,

    /// Country used for headlines when the caller gives none.
    pub default_country: String,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://newsapi.org/v2".into(),
            language: "en".into(),
            default_country: "jp".into(),
        }
    }
}

/// Page-fetch cache used by URL analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub max_entries: usize,

    /// Entries older than this with no recorded access are swept.
    pub max_age_secs: u64,

    pub sweep_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_entries: 256,
            max_age_secs: 7200,
            sweep_interval_secs: 30,
        }
    }
}

impl ToolbeltConfig {
    /// Apply credential overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply credential overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(WEATHER_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = key;
        }
        if let Some(key) = lookup(NEWS_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.news.api_key = key;
        }
    }

    /// Both provider credentials must be present before any provider tool
    /// can be registered.
    pub fn validate_api_keys(&self) -> Result<(), BuildError> {
        if self.weather.api_key.trim().is_empty() {
            return Err(BuildError::MissingCredential {
                provider: "OpenWeather",
                env_var: WEATHER_KEY_ENV,
            });
        }
        if self.news.api_key.trim().is_empty() {
            return Err(BuildError::MissingCredential {
                provider: "News",
                env_var: NEWS_KEY_ENV,
            });
        }
        Ok(())
    }
}
