#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use toolbelt::config::ToolbeltConfig;
use toolbelt::upstream::{Fetch, FetchError, HttpResponse};
use toolbelt::{RegistryBuilder, ToolRegistry};
use url::Url;

pub const WEATHER_JSON: &str = r#"{
    "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
    "main": {"temp": 27.5, "feels_like": 29.0, "temp_min": 25.0, "temp_max": 29.0,
             "pressure": 1010, "humidity": 35},
    "wind": {"speed": 2.1},
    "sys": {"country": "JP"},
    "name": "Osaka"
}"#;

pub const NEWS_JSON: &str = r#"{
    "status": "ok",
    "totalResults": 1,
    "articles": [{
        "source": {"id": null, "name": "Wire"},
        "title": "Headline",
        "description": "Body.",
        "url": "https://news.test/1",
        "publishedAt": "2024-06-01T12:00:00Z"
    }]
}"#;

pub const PAGE_HTML: &str = "<html><body><h1>Hello</h1><p>Write to team@example.com #update</p></body></html>";

/// How [`FakeFetch`] answers every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Serve canned bodies by endpoint.
    Serve,
    /// Fail every request with a timeout.
    Timeout,
    /// Answer every request with the given status.
    Status(u16),
}

/// In-process HTTP stand-in routing by URL path.
pub struct FakeFetch {
    mode: Mode,
    requests: AtomicUsize,
}

impl FakeFetch {
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            requests: AtomicUsize::new(0),
        })
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for FakeFetch {
    async fn get(&self, url: &Url, _headers: &[(String, String)]) -> Result<HttpResponse, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let body = match self.mode {
            Mode::Timeout => return Err(FetchError::Timeout),
            Mode::Status(status) => {
                return Ok(HttpResponse {
                    status,
                    body: r#"{"message": "rejected"}"#.into(),
                })
            }
            Mode::Serve if url.path().ends_with("/weather") => WEATHER_JSON,
            Mode::Serve if url.path().ends_with("/everything") || url.path().ends_with("/top-headlines") => NEWS_JSON,
            Mode::Serve => PAGE_HTML,
        };
        Ok(HttpResponse {
            status: 200,
            body: body.into(),
        })
    }
}

pub fn config_with_keys() -> ToolbeltConfig {
    let mut config = ToolbeltConfig::default();
    config.weather.api_key = "weather-test-key".into();
    config.news.api_key = "news-test-key".into();
    config
}

/// Every tool, backed by `fetch`.
pub fn full_registry(fetch: Arc<FakeFetch>, strict: bool) -> ToolRegistry {
    RegistryBuilder::new()
        .strict(strict)
        .with_local_tools()
        .unwrap()
        .with_web_tools(fetch.clone())
        .unwrap()
        .with_provider_tools(&config_with_keys(), fetch)
        .unwrap()
        .build()
}

pub fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
