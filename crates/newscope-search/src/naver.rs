//! Client for the Naver News Open API.
//!
//! Wraps `reqwest` with credential-header management, `start`-offset
//! pagination, and typed response deserialization. The API caps one page at
//! 100 items and the `start` offset at 1000; the client pages until the
//! caller's `max_results` is reached or the source is exhausted.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use newscope_core::{Article, ArticleBody, RecencyWindow, SourceAdapter, SourceError};

const DEFAULT_BASE_URL: &str = "https://openapi.naver.com/";
/// Naver returns at most this many items per page.
const PAGE_SIZE_CAP: usize = 100;
/// The API rejects `start` offsets beyond this.
const MAX_START: usize = 1000;

/// Adapter for the Naver News search endpoint (`/v1/search/news.json`).
///
/// Credentials are resolved once at construction and sent as the
/// `X-Naver-Client-Id` / `X-Naver-Client-Secret` header pair.
pub struct NaverNewsClient {
    client: Client,
    client_id: String,
    client_secret: String,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct NaverSearchResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
struct NaverItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "originallink", default)]
    original_link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
}

impl NaverNewsClient {
    /// Creates a client pointed at the production Naver Open API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        client_id: &str,
        client_secret: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Self::with_base_url(client_id, client_secret, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Transport`] if the HTTP client cannot be built
    /// or `base_url` is not a valid URL.
    pub fn with_base_url(
        client_id: &str,
        client_secret: &str,
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
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            base_url,
        })
    }

    async fn fetch_page(
        &self,
        keyword: &str,
        display: usize,
        start: usize,
    ) -> Result<NaverSearchResponse, SourceError> {
        let mut url = self
            .base_url
            .join("v1/search/news.json")
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("query", keyword)
            .append_pair("display", &display.to_string())
            .append_pair("start", &start.to_string())
            .append_pair("sort", "date");

        let response = self
            .client
            .get(url.clone())
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    SourceError::Unreachable(e.to_string())
                } else {
                    SourceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::Auth(format!("naver returned {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!("naver returned {status}: {body}")));
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

/// Strips the provider's `<b>…</b>` highlight markup and the HTML entities
/// it leaves behind in titles and snippets.
fn strip_highlight(text: &str) -> String {
    text.replace("<b>", "")
        .replace("</b>", "")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl SourceAdapter for NaverNewsClient {
    fn name(&self) -> &str {
        "naver"
    }

    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
        recency: Option<RecencyWindow>,
    ) -> Result<Vec<Article>, SourceError> {
        let now = Utc::now();
        let mut articles: Vec<Article> = Vec::new();
        let mut start = 1usize;

        'pages: while articles.len() < max_results && start <= MAX_START {
            let display = (max_results - articles.len()).min(PAGE_SIZE_CAP);
            let page = match self.fetch_page(keyword, display, start).await {
                Ok(page) => page,
                // The first page failing means the source is down or the
                // credentials are bad; later pages yield a partial result.
                Err(e) if start == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        source = "naver",
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
                    // Item-level fault: skip and continue.
                    tracing::warn!(source = "naver", "search item without a link, skipping");
                    continue;
                }
                let published_at = parse_pub_date(&item.pub_date);
                if let (Some(window), Some(published)) = (recency, published_at) {
                    if !window.contains(now, published) {
                        // Results are date-sorted; everything after this is older.
                        break 'pages;
                    }
                }

                let snippet = strip_highlight(&item.description);
                let mut article = Article::new(
                    self.name(),
                    strip_highlight(&item.title),
                    item.link.clone(),
                    ArticleBody::Extracted(snippet.clone()),
                );
                article.published_at = published_at;
                article.metadata = serde_json::json!({
                    "snippet": snippet,
                    "original_link": item.original_link,
                    "pub_date_raw": item.pub_date,
                });
                articles.push(article);
            }

            if fetched < display {
                break;
            }
            start += fetched;
        }

        tracing::info!(
            source = "naver",
            keyword,
            count = articles.len(),
            "search complete"
        );
        Ok(articles)
    }
}
