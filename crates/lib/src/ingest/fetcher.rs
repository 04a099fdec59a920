//! # Page Fetching
//!
//! Retrieves one page of raw source data over HTTP with browser-mimicking
//! headers, a rotating session cookie, and exponential backoff on
//! rate-limiting or transient failures.

use crate::constants::{BACKOFF_BASE_SECS, MAX_FETCH_RETRIES};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Custom error types for page fetching.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Request to source failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Source returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Source response is missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("Failed to access the session cookie file: {0}")]
    Cookie(#[from] std::io::Error),
}

impl FetchError {
    /// Transient failures are worth another attempt; shape errors and
    /// credential-file errors are not.
    fn is_transient(&self) -> bool {
        matches!(self, FetchError::Request(_) | FetchError::Status { .. })
    }
}

/// A single-writer accessor for the session cookie file.
///
/// Concurrent page fetches race to refresh the session cookie. Every read
/// and every read-modify-write goes through one mutex so a stale cookie
/// never clobbers a newer one.
#[derive(Clone, Debug)]
pub struct CookieFile {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Reads the current cookie, trimmed of surrounding whitespace.
    pub async fn load(&self) -> Result<String, std::io::Error> {
        let _guard = self.lock.lock().await;
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(text.trim().to_string())
    }

    /// Replaces the stored cookie with a rotated one.
    pub async fn store(&self, cookie: &str) -> Result<(), std::io::Error> {
        let _guard = self.lock.lock().await;
        tokio::fs::write(&self.path, cookie).await
    }
}

/// One page of raw source data: shape-checked pagination metadata plus the
/// untyped items, which the extraction step normalizes.
#[derive(Debug, Clone)]
pub struct PagePayload {
    pub total_pages: u32,
    pub per_page: Option<u32>,
    pub current_page: u32,
    pub posts: Vec<Value>,
}

/// Checks the top-level response shape. A missing field here is a fatal
/// parse error, never retried.
fn validate_payload(value: Value) -> Result<PagePayload, FetchError> {
    let total_pages = value
        .get("total_pages")
        .and_then(Value::as_u64)
        .ok_or(FetchError::MissingField("total_pages"))? as u32;
    let current_page = value
        .get("current_page")
        .and_then(Value::as_u64)
        .ok_or(FetchError::MissingField("current_page"))? as u32;
    let per_page = value
        .get("per_page")
        .and_then(Value::as_u64)
        .map(|n| n as u32);
    let posts = match value.get("posts") {
        Some(Value::Array(posts)) => posts.clone(),
        _ => return Err(FetchError::MissingField("posts")),
    };

    Ok(PagePayload {
        total_pages,
        per_page,
        current_page,
        posts,
    })
}

/// Fetches one page of source data per call.
///
/// Cloning shares the underlying HTTP client and cookie accessor, so a
/// deployment may fan pages out across tasks while the cookie refresh stays
/// serialized.
#[derive(Clone, Debug)]
pub struct PageFetcher {
    client: reqwest::Client,
    api_url: String,
    cookie_file: CookieFile,
    max_retries: u32,
    backoff_base: Duration,
}

impl PageFetcher {
    /// Creates a new `PageFetcher` against the given posts endpoint.
    pub fn new(api_url: impl Into<String>, cookie_file: CookieFile) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            cookie_file,
            max_retries: MAX_FETCH_RETRIES,
            backoff_base: Duration::from_secs(BACKOFF_BASE_SECS),
        })
    }

    /// Overrides the retry ceiling and backoff base, mainly so tests can
    /// run with millisecond delays.
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base: Duration) -> Self {
        self.max_retries = max_retries;
        self.backoff_base = backoff_base;
        self
    }

    fn browser_headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            "Accept-Language",
            HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8"),
        );
        headers.insert("Cache-Control", HeaderValue::from_static("max-age=0"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        headers.insert(
            "Upgrade-Insecure-Requests",
            HeaderValue::from_static("1"),
        );
        headers.insert(
            "User-Agent",
            HeaderValue::from_static(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
            ),
        );
        if let Ok(value) = HeaderValue::from_str(cookie) {
            headers.insert(COOKIE, value);
        }
        headers
    }

    /// Fetches one page, retrying transient failures with exponential
    /// backoff (`backoff_base * 2^attempt`) up to the configured ceiling.
    ///
    /// A rotated session cookie returned by the source is persisted back to
    /// the credential file before the payload is returned.
    pub async fn fetch_page(&self, page: u32) -> Result<PagePayload, FetchError> {
        let cookie = self.cookie_file.load().await?;

        let mut attempt = 0u32;
        loop {
            match self.try_fetch(page, &cookie).await {
                Ok((payload, rotated_cookie)) => {
                    info!(
                        page = payload.current_page,
                        posts = payload.posts.len(),
                        "Fetched source page"
                    );
                    if let Some(new_cookie) = rotated_cookie {
                        debug!(page, "Source rotated the session cookie, persisting it");
                        self.cookie_file.store(&new_cookie).await?;
                    }
                    return Ok(payload);
                }
                Err(err) if err.is_transient() && attempt + 1 < self.max_retries => {
                    let delay = self.backoff_base * 2u32.pow(attempt);
                    warn!(page, attempt, "Fetch failed ({err}), retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_fetch(
        &self,
        page: u32,
        cookie: &str,
    ) -> Result<(PagePayload, Option<String>), FetchError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("page", page)])
            .headers(Self::browser_headers(cookie))
            .send()
            .await?;

        let rotated_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        let payload = validate_payload(value)?;
        Ok((payload, rotated_cookie))
    }
}
