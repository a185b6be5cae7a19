//! The per-item listing walk, separated from the browser so the
//! skip/sentinel behavior is testable without one.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use newscope_core::{Article, ArticleBody, RecencyWindow};

/// Fetches one article's body text. Implemented by the live browser session
/// and by scripted fakes in tests.
#[async_trait]
pub trait ArticleExtractor: Send {
    /// Never fails: extraction problems come back as
    /// [`ArticleBody::ExtractionFailed`].
    async fn extract(&mut self, url: &str) -> ArticleBody;
}

/// One entry scraped off a listing page, scheduled for extraction.
#[derive(Debug, Clone)]
pub struct ListingItem {
    pub title: String,
    pub url: String,
    /// Raw listing date string, kept verbatim in metadata.
    pub date_raw: Option<String>,
    /// Site-specific extras (category, description).
    pub extra: serde_json::Value,
}

impl ListingItem {
    #[must_use]
    pub fn new(title: String, url: String, date_raw: Option<String>) -> Self {
        Self {
            title,
            url,
            date_raw,
            extra: serde_json::Value::Null,
        }
    }
}

/// Walks one listing page's items: filters by keyword and recency, extracts
/// each kept item's body, and appends the articles.
///
/// Extraction failures are recorded as the sentinel body on an otherwise
/// complete article — an item is never dropped for failing to extract, and
/// one failure never aborts the walk. Stops early once `max_results` is
/// reached.
#[allow(clippy::too_many_arguments)]
pub async fn extend_from_listing<E: ArticleExtractor>(
    articles: &mut Vec<Article>,
    source: &str,
    items: Vec<ListingItem>,
    keyword_filter: Option<&str>,
    recency: Option<RecencyWindow>,
    now: DateTime<Utc>,
    max_results: usize,
    extractor: &mut E,
) {
    for item in items {
        if articles.len() >= max_results {
            break;
        }

        if let Some(keyword) = keyword_filter {
            if !item.title.to_lowercase().contains(&keyword.to_lowercase()) {
                continue;
            }
        }

        let published_at = item.date_raw.as_deref().and_then(parse_listing_date);
        if let (Some(window), Some(published)) = (recency, published_at) {
            if !window.contains(now, published) {
                tracing::debug!(url = %item.url, "listing item outside recency window");
                continue;
            }
        }

        let body = extractor.extract(&item.url).await;
        if body.is_failed() {
            tracing::warn!(source, url = %item.url, "recorded extraction-failed sentinel");
        }

        let mut article = Article::new(source, item.title, item.url, body);
        article.published_at = published_at;
        article.metadata = match item.extra {
            serde_json::Value::Null => serde_json::json!({ "date_raw": item.date_raw }),
            mut extra => {
                if let Some(map) = extra.as_object_mut() {
                    map.insert("date_raw".to_string(), serde_json::json!(item.date_raw));
                }
                extra
            }
        };
        articles.push(article);
    }
}

/// Parses the date formats the newsrooms print on listing pages.
/// Unparsable strings yield `None`; the raw string stays in metadata.
#[must_use]
pub fn parse_listing_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    for format in ["%Y.%m.%d", "%Y-%m-%d", "%Y년 %m월 %d일"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(DateTime::from_naive_utc_and_offset(
                date.and_hms_opt(0, 0, 0)?,
                Utc,
            ));
        }
    }
    None
}
