pub mod schema;

pub use schema::{
    CacheSettings, HttpSettings, NewsSettings, ToolbeltConfig, WeatherSettings, NEWS_KEY_ENV,
    WEATHER_KEY_ENV,
};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default toolbelt home directory (~/.toolbelt).
pub fn default_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".toolbelt"))
        .unwrap_or_else(|| PathBuf::from(".toolbelt"))
}

/// Default config file location inside the home directory.
pub fn default_config_path() -> PathBuf {
    default_home_dir().join("toolbelt.toml")
}

/// Resolve a path that may start with `~`.
pub fn resolve_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<ToolbeltConfig> {
    if path.exists() {
        let contents =
            std::fs::read_to_string(path).context("Failed to read toolbelt config file")?;
        let config: ToolbeltConfig =
            toml::from_str(&contents).context("Failed to parse toolbelt config (TOML)")?;
        Ok(config)
    } else {
        Ok(ToolbeltConfig::default())
    }
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &ToolbeltConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}
