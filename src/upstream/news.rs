//! News provider client (NewsAPI-compatible API).

use super::{fetch_json, Fetch};
use crate::config::NewsSettings;
use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

// -- Response types ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u32>,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    pub published_at: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

// -- Client -----------------------------------------------------------------

/// News provider client.
#[derive(Clone)]
pub struct NewsClient {
    base_url: String,
    api_key: String,
    language: String,
    fetch: Arc<dyn Fetch>,
}

impl NewsClient {
    pub fn new(settings: &NewsSettings, fetch: Arc<dyn Fetch>) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            fetch,
        }
    }

    fn endpoint(&self, tool: &str, path: &str) -> Result<Url, ToolError> {
        Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| ToolError::execution(tool, format!("invalid news base URL: {e}")))
    }

    /// Search all articles matching `query`, newest first.
    pub async fn search(&self, tool: &str, query: &str, page_size: u32) -> Result<NewsResponse, ToolError> {
        let mut url = self.endpoint(tool, "everything")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("language", &self.language)
            .append_pair("sortBy", "publishedAt")
            .append_pair("pageSize", &page_size.to_string())
            .append_pair("apiKey", &self.api_key);

        fetch_json(self.fetch.as_ref(), tool, &url).await
    }

    /// Top headlines for a country, optionally narrowed to a category.
    pub async fn top_headlines(
        &self,
        tool: &str,
        country: &str,
        category: Option<&str>,
        page_size: u32,
    ) -> Result<NewsResponse, ToolError> {
        let mut url = self.endpoint(tool, "top-headlines")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("country", country);
            if let Some(category) = category {
                pairs.append_pair("category", category);
            }
            pairs
                .append_pair("pageSize", &page_size.to_string())
                .append_pair("apiKey", &self.api_key);
        }

        fetch_json(self.fetch.as_ref(), tool, &url).await
    }
}
