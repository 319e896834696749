//! Current-weather provider client (OpenWeather-compatible API).

use super::{fetch_json, Fetch};
use crate::config::WeatherSettings;
use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

// -- Response types ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(rename = "name")]
    pub city_name: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Option<Wind>,
    #[serde(default)]
    pub clouds: Option<Clouds>,
    pub sys: Sys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i64,
    pub humidity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    pub country: String,
}

// -- Client -----------------------------------------------------------------

/// Weather provider client.
#[derive(Clone)]
pub struct WeatherClient {
    base_url: String,
    api_key: String,
    units: String,
    lang: String,
    fetch: Arc<dyn Fetch>,
}

impl WeatherClient {
    pub fn new(settings: &WeatherSettings, fetch: Arc<dyn Fetch>) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            units: settings.units.clone(),
            lang: settings.lang.clone(),
            fetch,
        }
    }

    /// Fetch current conditions for `city` on behalf of `tool`.
    pub async fn current(&self, tool: &str, city: &str) -> Result<WeatherResponse, ToolError> {
        let mut url = Url::parse(&format!("{}/weather", self.base_url))
            .map_err(|e| ToolError::execution(tool, format!("invalid weather base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("appid", &self.api_key)
            .append_pair("units", &self.units)
            .append_pair("lang", &self.lang);

        fetch_json(self.fetch.as_ref(), tool, &url).await
    }
}
