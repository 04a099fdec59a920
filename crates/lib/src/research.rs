//! # Research Fetching
//!
//! Thin, typed collaborators that fan research-question keywords out to
//! external search platforms and normalize the results into
//! [`FetchedItem`] records for downstream indexing.

use crate::generation::types::ResearchQuestion;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Custom error types for research fetching.
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Search API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Search response is missing expected field `{0}`")]
    MissingField(&'static str),
}

/// A normalized record fetched from an external research platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub raw_content: String,
    pub url: String,
    pub source: String,
    pub date_fetched: String,
}

/// Derives a stable item id from the source and url, so re-ingesting the
/// same external content upserts instead of duplicating.
pub fn stable_item_id(source: &str, url: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("{source}:{url}").as_bytes()).to_string()
}

/// A research platform the pipeline can fetch from.
#[async_trait]
pub trait ResearchSource: Send + Sync {
    /// The platform name research questions address this source by.
    fn platform(&self) -> &str;

    /// Fetches up to `limit` items for one keyword query.
    async fn fetch(&self, keywords: &str, limit: u32) -> Result<Vec<FetchedItem>, ResearchError>;
}

/// Runs every research question against the matching platform and groups
/// the fetched items by platform name. Questions addressing an unknown
/// platform are skipped with a warning.
pub async fn do_research(
    sources: &[Box<dyn ResearchSource>],
    questions: &[ResearchQuestion],
    limit: u32,
) -> Result<BTreeMap<String, Vec<FetchedItem>>, ResearchError> {
    let mut fetched: BTreeMap<String, Vec<FetchedItem>> = BTreeMap::new();

    for question in questions {
        let Some(source) = sources
            .iter()
            .find(|source| source.platform() == question.platform)
        else {
            warn!(platform = %question.platform, "No research source for platform, skipping");
            continue;
        };

        for keywords in &question.keywords {
            let items = source.fetch(keywords, limit).await?;
            info!(
                platform = %question.platform,
                keywords = %keywords,
                count = items.len(),
                "Fetched research items"
            );
            fetched
                .entry(question.platform.clone())
                .or_default()
                .extend(items);
        }
    }

    Ok(fetched)
}

// --- Snippet/news search API ---

/// Which envelope the snippet search API returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// `{"hits": [..]}` with a `snippets` array per hit.
    Snippets,
    /// `{"news": {"results": [..]}}` with a `description` per result.
    News,
}

/// Client for a keyed snippet/news search API.
#[derive(Clone, Debug)]
pub struct SearchClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    platform: String,
    mode: SearchMode,
    country: String,
}

impl SearchClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        platform: impl Into<String>,
        mode: SearchMode,
    ) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ResearchError::ClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            platform: platform.into(),
            mode,
            country: "us".to_string(),
        })
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    fn normalize(&self, result: &Value) -> FetchedItem {
        let raw_content = match self.mode {
            SearchMode::Snippets => result
                .get("snippets")
                .and_then(Value::as_array)
                .map(|snippets| {
                    snippets
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default(),
            SearchMode::News => result
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        };
        let url = result
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        FetchedItem {
            id: stable_item_id(&self.platform, &url),
            title: result
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            author: result
                .get("author")
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string(),
            raw_content,
            url,
            source: self.platform.clone(),
            date_fetched: Utc::now().to_rfc3339(),
        }
    }
}

#[async_trait]
impl ResearchSource for SearchClient {
    fn platform(&self) -> &str {
        &self.platform
    }

    async fn fetch(&self, keywords: &str, limit: u32) -> Result<Vec<FetchedItem>, ResearchError> {
        let query_key = match self.mode {
            SearchMode::Snippets => "query",
            SearchMode::News => "q",
        };
        let response = self
            .client
            .get(&self.api_url)
            .header("X-API-Key", &self.api_key)
            .query(&[
                (query_key, keywords),
                ("count", &limit.to_string()),
                ("country", &self.country),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let results = match self.mode {
            SearchMode::Snippets => body
                .get("hits")
                .and_then(Value::as_array)
                .ok_or(ResearchError::MissingField("hits"))?,
            SearchMode::News => body
                .get("news")
                .and_then(|news| news.get("results"))
                .and_then(Value::as_array)
                .ok_or(ResearchError::MissingField("news.results"))?,
        };

        Ok(results.iter().map(|result| self.normalize(result)).collect())
    }
}

// --- Wikipedia ---

/// Client for the MediaWiki search + parse API pair.
#[derive(Clone, Debug)]
pub struct WikipediaClient {
    client: reqwest::Client,
    api_url: String,
}

impl WikipediaClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ResearchError::ClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    async fn page_content(&self, title: &str) -> Result<String, ResearchError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "parse"),
                ("page", title),
                ("format", "json"),
                ("prop", "text"),
            ])
            .send()
            .await?;
        let body: Value = response.json().await?;
        let content = body
            .get("parse")
            .and_then(|parse| parse.get("text"))
            .and_then(|text| text.get("*"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        // Everything before this marker is chrome, not article text.
        let content = content
            .split_once("From Wikipedia, the free encyclopedia")
            .map_or(content, |(_, rest)| rest.trim());
        Ok(content.to_string())
    }
}

#[async_trait]
impl ResearchSource for WikipediaClient {
    fn platform(&self) -> &str {
        "wikipedia"
    }

    async fn fetch(&self, keywords: &str, limit: u32) -> Result<Vec<FetchedItem>, ResearchError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", keywords),
                ("format", "json"),
                ("srlimit", &limit.to_string()),
            ])
            .send()
            .await?;
        let body: Value = response.json().await?;
        let search_results = body
            .get("query")
            .and_then(|query| query.get("search"))
            .and_then(Value::as_array)
            .ok_or(ResearchError::MissingField("query.search"))?
            .clone();

        let mut items = Vec::new();
        for result in &search_results {
            let Some(title) = result.get("title").and_then(Value::as_str) else {
                continue;
            };
            let url = format!(
                "https://en.wikipedia.org/wiki/{}",
                title.replace(' ', "_")
            );
            let raw_content = self.page_content(title).await?;

            items.push(FetchedItem {
                id: stable_item_id("wikipedia", &url),
                title: title.to_string(),
                author: "Wikipedia".to_string(),
                raw_content,
                url,
                source: "wikipedia".to_string(),
                date_fetched: Utc::now().to_rfc3339(),
            });
        }
        Ok(items)
    }
}
