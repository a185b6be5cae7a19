//! Samsung Semiconductor newsroom adapter.
//!
//! Articles live under fixed category listings (press center, culture,
//! ESG). Listing titles are filterable, so the keyword filter runs
//! client-side on the title before any extraction cost is paid. Categories
//! are walked in order until `max_results` is reached.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use fantoccini::Locator;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use newscope_core::{Article, RecencyWindow, SourceAdapter, SourceError};

use crate::error::ScrapeError;
use crate::listing::{extend_from_listing, ListingItem};
use crate::session::{ScrapeSession, SessionExtractor};

const DEFAULT_BASE_URL: &str = "https://news.samsungsemiconductor.com";

const LISTING_ITEM: &str = "ul.article_list > li.article_item";
const TITLE: &str = "p.title";
const DATE: &str = "span.date";
const CATEGORY: &str = "span.category";
const DESCRIPTION: &str = "p.desc";
const CONTENT_CONTAINER: &str = "div.content_view > div.content_desc";

/// Category listings walked in order.
const CATEGORIES: &[(&str, &str)] = &[
    ("press", "뉴스"),
    ("culture", "문화"),
    ("esg", "esg"),
];

/// Newsroom adapter for `news.samsungsemiconductor.com`.
pub struct SamsungSemiconNewsroom {
    base_url: String,
    webdriver_url: String,
    wait_timeout: Duration,
}

impl SamsungSemiconNewsroom {
    #[must_use]
    pub fn new(webdriver_url: &str, element_wait_secs: u64) -> Self {
        Self::with_base_url(webdriver_url, element_wait_secs, DEFAULT_BASE_URL)
    }

    /// Points the adapter at a different listing host (local fixtures).
    #[must_use]
    pub fn with_base_url(webdriver_url: &str, element_wait_secs: u64, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            webdriver_url: webdriver_url.to_string(),
            wait_timeout: Duration::from_secs(element_wait_secs),
        }
    }

    fn category_url(&self, slug: &str) -> String {
        format!(
            "{}/kr/category/{}/",
            self.base_url,
            utf8_percent_encode(slug, NON_ALPHANUMERIC)
        )
    }

    fn category_page_url(category_url: &str, page: usize) -> String {
        if page == 1 {
            category_url.to_string()
        } else {
            format!("{category_url}page/{page}/")
        }
    }

    /// Reads the current category listing page. A fault on one element
    /// skips that element only.
    async fn listing_items(session: &mut ScrapeSession) -> Result<Vec<ListingItem>, ScrapeError> {
        let elements = session.find_all(LISTING_ITEM).await?;
        let mut items = Vec::new();
        for mut element in elements {
            let Ok(mut title_el) = element.find(Locator::Css(TITLE)).await else {
                tracing::warn!(
                    source = "samsung_semiconductor",
                    "listing entry without a title, skipping"
                );
                continue;
            };
            let Ok(title) = title_el.text().await else {
                continue;
            };

            let Ok(mut link) = element.find(Locator::Css("a")).await else {
                tracing::warn!(
                    source = "samsung_semiconductor",
                    "listing entry without a link, skipping"
                );
                continue;
            };
            let Ok(Some(url)) = link.attr("href").await else {
                continue;
            };

            let date_raw = match element.find(Locator::Css(DATE)).await {
                Ok(mut date) => date.text().await.ok().map(|s| s.trim().to_string()),
                Err(_) => None,
            };
            let category = match element.find(Locator::Css(CATEGORY)).await {
                Ok(mut el) => el.text().await.ok().map(|s| s.trim().to_string()),
                Err(_) => None,
            };
            let description = match element.find(Locator::Css(DESCRIPTION)).await {
                Ok(mut el) => el.text().await.ok().map(|s| s.trim().to_string()),
                Err(_) => None,
            };

            let mut item = ListingItem::new(title.trim().to_string(), url, date_raw);
            item.extra = serde_json::json!({
                "category": category,
                "description": description,
            });
            items.push(item);
        }
        Ok(items)
    }

    /// Walks one category's pages until the target count is reached or the
    /// category runs out of listings.
    async fn collect_category(
        &self,
        session: &mut ScrapeSession,
        category_url: &str,
        keyword: &str,
        max_results: usize,
        recency: Option<RecencyWindow>,
        articles: &mut Vec<Article>,
    ) {
        let now = Utc::now();
        let mut page = 1usize;

        while articles.len() < max_results {
            let url = Self::category_page_url(category_url, page);
            if let Err(e) = session.goto(&url).await {
                tracing::warn!(
                    source = "samsung_semiconductor",
                    url,
                    error = %e,
                    "listing navigation failed"
                );
                break;
            }

            let items = match Self::listing_items(session).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(
                        source = "samsung_semiconductor",
                        url,
                        error = %e,
                        "listing read failed"
                    );
                    break;
                }
            };
            if items.is_empty() {
                break;
            }

            let mut extractor = SessionExtractor::new(session, CONTENT_CONTAINER);
            extend_from_listing(
                articles,
                "samsung_semiconductor",
                items,
                Some(keyword),
                recency,
                now,
                max_results,
                &mut extractor,
            )
            .await;

            page += 1;
        }
    }
}

#[async_trait]
impl SourceAdapter for SamsungSemiconNewsroom {
    fn name(&self) -> &str {
        "samsung_semiconductor"
    }

    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
        recency: Option<RecencyWindow>,
    ) -> Result<Vec<Article>, SourceError> {
        let mut session = ScrapeSession::open(&self.webdriver_url, self.wait_timeout)
            .await
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;

        let mut articles: Vec<Article> = Vec::new();
        for (name, slug) in CATEGORIES {
            if articles.len() >= max_results {
                break;
            }
            tracing::debug!(
                source = "samsung_semiconductor",
                category = name,
                "walking category listing"
            );
            let category_url = self.category_url(slug);
            self.collect_category(
                &mut session,
                &category_url,
                keyword,
                max_results,
                recency,
                &mut articles,
            )
            .await;
        }

        if let Err(e) = session.close().await {
            tracing::warn!(
                source = "samsung_semiconductor",
                error = %e,
                "browser session close failed"
            );
        }

        tracing::info!(
            source = "samsung_semiconductor",
            keyword,
            count = articles.len(),
            "newsroom collection complete"
        );
        Ok(articles)
    }
}
