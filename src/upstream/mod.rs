//! Outbound HTTP collaborators used by the network-backed tools.

pub mod news;
pub mod weather;

pub use news::{NewsClient, NewsResponse};
pub use weather::{WeatherClient, WeatherResponse};

use crate::config::HttpSettings;
use crate::error::ToolError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Longest slice of an upstream error body carried into an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A GET request that never produced a response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Minimal HTTP GET capability.
///
/// Non-2xx statuses are returned as ordinary responses; only failures to get
/// any response at all are errors.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<HttpResponse, FetchError>;
}

/// reqwest-backed [`Fetch`] with bounded connect and request timeouts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<HttpResponse, FetchError> {
        // Query strings carry API keys; only the host and path are logged.
        debug!("GET {}{}", url.host_str().unwrap_or_default(), url.path());

        let mut request = self.http.get(url.clone());
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let resp = request.send().await.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(map_reqwest_error)?;

        debug!("Received response: {}", status);
        Ok(HttpResponse { status, body })
    }
}

// reqwest renders the full URL, query string and API key included.
fn map_reqwest_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(e.without_url().to_string())
    }
}

/// GET `url` and return the body of a 2xx response, mapping every failure to
/// the invoking tool's error.
pub async fn fetch_text(
    fetch: &dyn Fetch,
    tool: &str,
    url: &Url,
    headers: &[(String, String)],
) -> Result<String, ToolError> {
    let resp = fetch.get(url, headers).await.map_err(|e| match e {
        FetchError::Timeout => ToolError::Timeout { tool: tool.into() },
        FetchError::Transport(message) => ToolError::UpstreamFailure {
            tool: tool.into(),
            status_code: None,
            message,
        },
    })?;

    if !resp.is_success() {
        return Err(ToolError::UpstreamFailure {
            tool: tool.into(),
            status_code: Some(resp.status),
            message: clip(&resp.body, ERROR_BODY_LIMIT),
        });
    }

    Ok(resp.body)
}

/// GET `url` and decode a 2xx JSON body into `T`.
pub async fn fetch_json<T: DeserializeOwned>(
    fetch: &dyn Fetch,
    tool: &str,
    url: &Url,
) -> Result<T, ToolError> {
    let body = fetch_text(fetch, tool, url, &[]).await?;
    serde_json::from_str(&body).map_err(|e| ToolError::UpstreamFailure {
        tool: tool.into(),
        status_code: None,
        message: format!("malformed response body: {e}"),
    })
}

fn clip(body: &str, limit: usize) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub(crate) const WEATHER_TOKYO: &str = r#"{
        "coord": {"lon": 139.69, "lat": 35.69},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 18.4, "feels_like": 18.1, "temp_min": 17.0, "temp_max": 19.2,
                 "pressure": 1012, "humidity": 82},
        "wind": {"speed": 3.6, "deg": 200},
        "clouds": {"all": 75},
        "sys": {"country": "JP"},
        "name": "Tokyo"
    }"#;

    pub(crate) const NEWS_TWO_ARTICLES: &str = r#"{
        "status": "ok",
        "totalResults": 12,
        "articles": [
            {
                "source": {"id": null, "name": "Example Wire"},
                "author": "A. Writer",
                "title": "Rust 2.0 announced",
                "description": "A long description that keeps going well past the one hundred character limit used when rendering article summaries.",
                "url": "https://news.test/rust",
                "urlToImage": null,
                "publishedAt": "2024-05-01T09:30:00Z",
                "content": null
            },
            {
                "source": null,
                "title": "Short item",
                "description": "Brief.",
                "url": "https://news.test/short",
                "publishedAt": "not-a-date"
            }
        ]
    }"#;

    /// Scripted [`Fetch`] that replays queued outcomes and records each URL.
    #[derive(Default)]
    pub(crate) struct ScriptedFetch {
        outcomes: Mutex<VecDeque<Result<HttpResponse, FetchError>>>,
        pub(crate) requests: Mutex<Vec<Url>>,
    }

    impl ScriptedFetch {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(self, status: u16, body: &str) -> Self {
            self.push(Ok(HttpResponse {
                status,
                body: body.into(),
            }))
        }

        pub(crate) fn fail(self, error: FetchError) -> Self {
            self.push(Err(error))
        }

        fn push(self, outcome: Result<HttpResponse, FetchError>) -> Self {
            self.outcomes.lock().unwrap().push_back(outcome);
            self
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub(crate) fn last_url(&self) -> Url {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Fetch for ScriptedFetch {
        async fn get(&self, url: &Url, _headers: &[(String, String)]) -> Result<HttpResponse, FetchError> {
            self.requests.lock().unwrap().push(url.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(FetchError::Transport("no scripted response".into())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedFetch;
    use super::*;
    use assert_matches::assert_matches;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Ack {
        ok: bool,
    }

    fn url() -> Url {
        Url::parse("https://example.test/ack").unwrap()
    }

    #[tokio::test]
    async fn decodes_successful_json() {
        let fetch = ScriptedFetch::new().respond(200, r#"{"ok": true}"#);
        let ack: Ack = fetch_json(&fetch, "ack", &url()).await.unwrap();
        assert!(ack.ok);
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_failure() {
        let fetch = ScriptedFetch::new().respond(503, "  service unavailable\n");
        let err = fetch_json::<Ack>(&fetch, "ack", &url()).await.unwrap_err();
        assert_eq!(
            err,
            ToolError::UpstreamFailure {
                tool: "ack".into(),
                status_code: Some(503),
                message: "service unavailable".into(),
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_upstream_failure_without_status() {
        let fetch = ScriptedFetch::new().respond(200, "<html>");
        let err = fetch_json::<Ack>(&fetch, "ack", &url()).await.unwrap_err();
        assert_matches!(
            err,
            ToolError::UpstreamFailure { status_code: None, ref message, .. }
                if message.starts_with("malformed response body")
        );
    }

    #[tokio::test]
    async fn timeout_is_distinct_from_upstream_failure() {
        let fetch = ScriptedFetch::new().fail(FetchError::Timeout);
        let err = fetch_text(&fetch, "ack", &url(), &[]).await.unwrap_err();
        assert_eq!(err, ToolError::Timeout { tool: "ack".into() });
        assert!(err.is_upstream());
    }

    #[test]
    fn clip_limits_long_bodies_on_char_boundaries() {
        let body = "é".repeat(300);
        let clipped = clip(&body, ERROR_BODY_LIMIT);
        assert_eq!(clipped.chars().count(), ERROR_BODY_LIMIT + 3);
        assert!(clipped.ends_with("..."));
        assert_eq!(clip("short", ERROR_BODY_LIMIT), "short");
    }

    mod real_client {
        use super::*;
        use std::time::Duration;
        use tokio::net::TcpListener;

        const SECRET: &str = "SUPERSECRETKEY";

        fn weather_url(addr: std::net::SocketAddr) -> Url {
            Url::parse(&format!("http://{addr}/data/2.5/weather?q=Tokyo&appid={SECRET}")).unwrap()
        }

        fn fetcher(request_timeout_secs: u64) -> HttpFetcher {
            HttpFetcher::new(&HttpSettings {
                request_timeout_secs,
                ..HttpSettings::default()
            })
            .unwrap()
        }

        #[tokio::test]
        async fn silent_server_times_out() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                // Accept and hold the connection without ever answering.
                let (_socket, _) = listener.accept().await.unwrap();
                tokio::time::sleep(Duration::from_secs(30)).await;
            });

            let err = fetch_text(&fetcher(1), "get_weather", &weather_url(addr), &[])
                .await
                .unwrap_err();
            assert_eq!(err, ToolError::Timeout { tool: "get_weather".into() });
        }

        #[tokio::test]
        async fn refused_connection_is_upstream_failure_without_the_key() {
            let addr = {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                listener.local_addr().unwrap()
            };

            let err = fetch_text(&fetcher(5), "get_weather", &weather_url(addr), &[])
                .await
                .unwrap_err();
            assert_matches!(
                err,
                ToolError::UpstreamFailure { ref tool, status_code: None, .. } if tool == "get_weather"
            );
            let rendered = err.to_string();
            assert!(!rendered.contains(SECRET), "key leaked: {rendered}");
            assert!(!rendered.contains("appid"), "query leaked: {rendered}");
        }
    }
}
