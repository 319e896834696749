//! Current-weather tools backed by [`WeatherClient`].

use super::format::round_half_up;
use super::Tool;
use crate::error::ToolError;
use crate::types::{Arguments, ParameterDescriptor, ToolDescriptor, ToolOutput};
use crate::upstream::{WeatherClient, WeatherResponse};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    /// Condition group, e.g. `Rain`; empty when the provider sent none.
    pub condition: String,
    pub description: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: i64,
    pub wind_speed: f64,
    pub cloudiness: Option<i64>,
    /// Empty unless advice was requested.
    pub advice: Vec<String>,
}

impl WeatherReport {
    pub fn from_response(resp: &WeatherResponse) -> Self {
        let first = resp.weather.first();
        Self {
            city: resp.city_name.clone(),
            country: resp.sys.country.clone(),
            condition: first.map(|c| c.main.clone()).unwrap_or_default(),
            description: first
                .map(|c| c.description.clone())
                .unwrap_or_else(|| "unknown".into()),
            temperature: round_half_up(resp.main.temp),
            feels_like: round_half_up(resp.main.feels_like),
            humidity: resp.main.humidity,
            wind_speed: resp.wind.as_ref().map_or(0.0, |w| w.speed),
            cloudiness: resp.clouds.as_ref().map(|c| c.all),
            advice: Vec::new(),
        }
    }

    pub fn with_advice(mut self) -> Self {
        self.advice = advise(self.temperature, &self.condition, self.humidity);
        self
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "Current weather in {} ({})\n\
             Conditions: {}\n\
             Temperature: {}°C (feels like {}°C)\n\
             Humidity: {}%\n\
             Wind: {} m/s",
            self.city,
            self.country,
            self.description,
            self.temperature,
            self.feels_like,
            self.humidity,
            self.wind_speed,
        );
        if let Some(clouds) = self.cloudiness {
            let _ = write!(out, "\nCloud cover: {clouds}%");
        }
        if !self.advice.is_empty() {
            out.push_str("\n\nAdvice:");
            for line in &self.advice {
                let _ = write!(out, "\n- {line}");
            }
        }
        out
    }
}

impl From<WeatherReport> for ToolOutput {
    fn from(output: WeatherReport) -> Self {
        ToolOutput::Weather(output)
    }
}

/// Advice lines for a rounded temperature, condition group and humidity.
pub fn advise(temperature: i64, condition: &str, humidity: i64) -> Vec<String> {
    let mut advice = Vec::new();

    advice.push(
        match temperature {
            t if t > 30 => "Very hot. Watch for heatstroke and drink water often.",
            t if t > 25 => "A warm day. It should be pleasant outside.",
            t if t > 15 => "A comfortable temperature.",
            t if t > 5 => "A little chilly. Bring a jacket.",
            _ => "Cold. Dress warmly before heading out.",
        }
        .to_string(),
    );

    match condition {
        "Rain" | "Drizzle" | "Thunderstorm" => advice.push("Don't forget an umbrella.".into()),
        "Snow" => advice.push("Watch your footing and avoid slippery spots.".into()),
        "Clear" if temperature > 25 => {
            advice.push("Strong sunshine expected. Sun protection is recommended.".into())
        }
        _ => {}
    }

    if humidity > 80 {
        advice.push("Humidity is high and it may feel muggy.".into());
    } else if humidity < 40 {
        advice.push("The air is dry. Stay hydrated.".into());
    }

    advice
}

fn city_descriptor(name: &str, description: &str) -> ToolDescriptor {
    ToolDescriptor::new(name, description)
        .required(ParameterDescriptor::string("city", "City name, e.g. Tokyo"))
}

/// Current weather for a city.
pub struct GetWeatherTool {
    client: Arc<WeatherClient>,
}

impl GetWeatherTool {
    pub fn new(client: Arc<WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetWeatherTool {
    type Args = String;
    type Output = WeatherReport;

    fn descriptor(&self) -> ToolDescriptor {
        city_descriptor("get_weather", "Get the current weather for a city.")
    }

    fn decode(&self, args: &Arguments) -> Result<String, ToolError> {
        Ok(args.require_string("city")?.to_string())
    }

    async fn execute(&self, city: String) -> Result<WeatherReport, ToolError> {
        info!("Fetching weather for {}", city);
        let resp = self.client.current("get_weather", &city).await?;
        Ok(WeatherReport::from_response(&resp))
    }

    fn format(&self, output: &WeatherReport) -> String {
        output.render()
    }
}

/// Current weather plus clothing and comfort advice.
pub struct WeatherAdviceTool {
    client: Arc<WeatherClient>,
}

impl WeatherAdviceTool {
    pub fn new(client: Arc<WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherAdviceTool {
    type Args = String;
    type Output = WeatherReport;

    fn descriptor(&self) -> ToolDescriptor {
        city_descriptor(
            "get_weather_with_advice",
            "Get the current weather for a city along with practical advice.",
        )
    }

    fn decode(&self, args: &Arguments) -> Result<String, ToolError> {
        Ok(args.require_string("city")?.to_string())
    }

    async fn execute(&self, city: String) -> Result<WeatherReport, ToolError> {
        info!("Fetching weather with advice for {}", city);
        let resp = self.client.current("get_weather_with_advice", &city).await?;
        Ok(WeatherReport::from_response(&resp).with_advice())
    }

    fn format(&self, output: &WeatherReport) -> String {
        output.render()
    }
}
