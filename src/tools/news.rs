//! News search and headline tools backed by [`NewsClient`].

use super::format::truncate;
use super::{clamp_count, parse_choice, Tool};
use crate::error::ToolError;
use crate::types::{Arguments, ParameterDescriptor, ToolDescriptor, ToolOutput};
use crate::upstream::news::Article;
use crate::upstream::{NewsClient, NewsResponse};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_LIMIT: u32 = 5;
pub const MAX_LIMIT: u32 = 20;

/// Article descriptions longer than this are truncated.
pub const DESCRIPTION_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

const CATEGORIES: &[(&str, Category)] = &[
    ("business", Category::Business),
    ("entertainment", Category::Entertainment),
    ("general", Category::General),
    ("health", Category::Health),
    ("science", Category::Science),
    ("sports", Category::Sports),
    ("technology", Category::Technology),
];

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::General => "general",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    pub title: String,
    pub source: Option<String>,
    /// `YYYY-MM-DD HH:MM`, or the provider's raw value when unparseable.
    pub published: String,
    pub description: Option<String>,
    pub url: String,
}

impl ArticleSummary {
    fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            source: article.source.as_ref().map(|s| s.name.clone()),
            published: format_published(&article.published_at),
            description: article
                .description
                .as_deref()
                .map(|d| truncate(d, DESCRIPTION_LIMIT)),
            url: article.url.clone(),
        }
    }
}

fn format_published(raw: &str) -> String {
    const SHOWN: &str = "%Y-%m-%d %H:%M";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(SHOWN).to_string();
    }
    // Some sources omit the offset.
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.format(SHOWN).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsDigest {
    pub limit: u32,
    pub total_results: Option<u32>,
    pub articles: Vec<ArticleSummary>,
}

impl NewsDigest {
    pub fn from_response(resp: &NewsResponse, limit: u32) -> Self {
        Self {
            limit,
            total_results: resp.total_results,
            articles: resp
                .articles
                .iter()
                .take(limit as usize)
                .map(ArticleSummary::from_article)
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        if self.articles.is_empty() {
            return "No matching news articles were found.".into();
        }

        let mut out = format!("Latest news\nArticles: {}", self.articles.len());
        for (i, article) in self.articles.iter().enumerate() {
            let _ = write!(out, "\n\n{}. {}", i + 1, article.title);
            if let Some(source) = &article.source {
                let _ = write!(out, "\n   Source: {source}");
            }
            let _ = write!(out, "\n   Published: {}", article.published);
            if let Some(description) = &article.description {
                let _ = write!(out, "\n   Summary: {description}");
            }
            let _ = write!(out, "\n   URL: {}", article.url);
        }
        if let Some(total) = self.total_results.filter(|&t| t > self.limit) {
            let _ = write!(out, "\n\n{} more articles available.", total - self.limit);
        }
        out
    }
}

impl From<NewsDigest> for ToolOutput {
    fn from(output: NewsDigest) -> Self {
        ToolOutput::News(output)
    }
}

fn limit_arg(args: &Arguments) -> u32 {
    clamp_count(args.integer("limit").unwrap_or(i64::from(DEFAULT_LIMIT)), 1, MAX_LIMIT)
}

fn limit_param() -> ParameterDescriptor {
    ParameterDescriptor::integer("limit", "Number of articles, 1 to 20 (default 5)")
}

// ---------------------------------------------------------------------------
// search_news
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SearchArgs {
    pub query: String,
    pub limit: u32,
}

/// Keyword search over recent articles, newest first.
pub struct SearchNewsTool {
    client: Arc<NewsClient>,
}

impl SearchNewsTool {
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchNewsTool {
    type Args = SearchArgs;
    type Output = NewsDigest;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("search_news", "Search news articles by keyword.")
            .required(ParameterDescriptor::string("query", "Search keywords"))
            .optional(limit_param())
    }

    fn decode(&self, args: &Arguments) -> Result<SearchArgs, ToolError> {
        Ok(SearchArgs {
            query: args.require_string("query")?.to_string(),
            limit: limit_arg(args),
        })
    }

    async fn execute(&self, args: SearchArgs) -> Result<NewsDigest, ToolError> {
        info!("Searching news for '{}' (limit {})", args.query, args.limit);
        let resp = self.client.search("search_news", &args.query, args.limit).await?;
        Ok(NewsDigest::from_response(&resp, args.limit))
    }

    fn format(&self, output: &NewsDigest) -> String {
        output.render()
    }
}

// ---------------------------------------------------------------------------
// get_top_headlines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineArgs {
    pub country: String,
    pub category: Option<Category>,
    pub limit: u32,
}

/// Top headlines for a country, optionally narrowed to a category.
pub struct TopHeadlinesTool {
    client: Arc<NewsClient>,
    default_country: String,
}

impl TopHeadlinesTool {
    pub fn new(client: Arc<NewsClient>, default_country: &str) -> Self {
        Self {
            client,
            default_country: default_country.to_string(),
        }
    }
}

#[async_trait]
impl Tool for TopHeadlinesTool {
    type Args = HeadlineArgs;
    type Output = NewsDigest;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("get_top_headlines", "Get the latest top headlines.")
            .optional(ParameterDescriptor::string(
                "country",
                "Two-letter country code, e.g. jp or us",
            ))
            .optional(ParameterDescriptor::string(
                "category",
                "business, entertainment, general, health, science, sports or technology",
            ))
            .optional(limit_param())
    }

    fn decode(&self, args: &Arguments) -> Result<HeadlineArgs, ToolError> {
        let category = args
            .string("category")
            .map(|c| parse_choice(args.tool(), "category", c, CATEGORIES))
            .transpose()?;
        let country = args
            .string("country")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_country.as_str())
            .to_ascii_lowercase();

        Ok(HeadlineArgs {
            country,
            category,
            limit: limit_arg(args),
        })
    }

    async fn execute(&self, args: HeadlineArgs) -> Result<NewsDigest, ToolError> {
        info!(
            "Fetching top headlines: country={}, category={:?}, limit={}",
            args.country, args.category, args.limit
        );
        let resp = self
            .client
            .top_headlines(
                "get_top_headlines",
                &args.country,
                args.category.map(Category::as_str),
                args.limit,
            )
            .await?;
        Ok(NewsDigest::from_response(&resp, args.limit))
    }

    fn format(&self, output: &NewsDigest) -> String {
        output.render()
    }
}
