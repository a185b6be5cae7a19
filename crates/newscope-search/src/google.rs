//! Client for the Google Custom Search JSON API.
//!
//! Credentials (`key` + custom search engine `cx`) ride in the query string.
//! One page returns at most 10 items; the client pages via the `start`
//! offset until `max_results` is reached or the engine stops returning
//! items. Recency bounds map onto the API's `dateRestrict` parameter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use newscope_core::{Article, ArticleBody, RecencyWindow, SourceAdapter, SourceError};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/";
/// The API returns at most this many items per page.
const PAGE_SIZE_CAP: usize = 10;
/// Custom Search serves no results past the first hundred.
const MAX_START: usize = 91;

/// Adapter for the Google Custom Search JSON API (`customsearch/v1`).
pub struct GoogleCseClient {
    client: Client,
    api_key: String,
    cx: String,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    pagemap: Option<PageMap>,
}

#[derive(Debug, Deserialize, Default)]
struct PageMap {
    #[serde(default)]
    metatags: Vec<HashMap<String, String>>,
}

impl GoogleCseClient {
    /// Creates a client pointed at the production Google APIs endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        cx: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Self::with_base_url(api_key, cx, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Transport`] if the HTTP client cannot be built
    /// or `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        cx: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SourceError::Transport(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            cx: cx.to_owned(),
            base_url,
        })
    }

    async fn fetch_page(
        &self,
        keyword: &str,
        num: usize,
        start: usize,
        recency: Option<RecencyWindow>,
    ) -> Result<CseResponse, SourceError> {
        let mut url = self
            .base_url
            .join("customsearch/v1")
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("key", &self.api_key)
                .append_pair("cx", &self.cx)
                .append_pair("q", keyword)
                .append_pair("num", &num.to_string())
                .append_pair("start", &start.to_string());
            if let Some(window) = recency {
                pairs.append_pair("dateRestrict", window.google_date_restrict());
            }
        }

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                SourceError::Unreachable(e.to_string())
            } else {
                SourceError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::Auth(format!("google returned {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!("google returned {status}: {body}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Publication time recovered from the page's `article:published_time`
/// metatag, when the indexed page exposed one.
fn published_time(item: &CseItem) -> Option<DateTime<Utc>> {
    let raw = item
        .pagemap
        .as_ref()?
        .metatags
        .first()?
        .get("article:published_time")?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl SourceAdapter for GoogleCseClient {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
        recency: Option<RecencyWindow>,
    ) -> Result<Vec<Article>, SourceError> {
        let mut articles: Vec<Article> = Vec::new();
        let mut start = 1usize;

        'pages: while articles.len() < max_results && start <= MAX_START {
            let num = (max_results - articles.len()).min(PAGE_SIZE_CAP);
            let page = match self.fetch_page(keyword, num, start, recency).await {
                Ok(page) => page,
                Err(e) if start == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        source = "google",
                        start,
                        error = %e,
                        "page fetch failed, returning partial result"
                    );
                    break;
                }
            };

            let fetched = page.items.len();
            if fetched == 0 {
                break;
            }

            for item in page.items {
                if articles.len() >= max_results {
                    break 'pages;
                }
                if item.link.is_empty() {
                    tracing::warn!(source = "google", "search item without a link, skipping");
                    continue;
                }
                let published_at = published_time(&item);
                let mut article = Article::new(
                    self.name(),
                    item.title.clone(),
                    item.link.clone(),
                    ArticleBody::Extracted(item.snippet.clone()),
                );
                article.published_at = published_at;
                article.metadata = serde_json::json!({ "snippet": item.snippet });
                articles.push(article);
            }

            if fetched < num {
                break;
            }
            start += fetched;
        }

        tracing::info!(
            source = "google",
            keyword,
            count = articles.len(),
            "search complete"
        );
        Ok(articles)
    }
}
