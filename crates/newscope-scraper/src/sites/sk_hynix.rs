//! SK hynix newsroom adapter.
//!
//! The newsroom is a reverse-chronological firehose with no site search:
//! the listing at `/all/` pages through every published article. The
//! adapter collects the latest articles up to `max_results`; the keyword is
//! not filterable against this site.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use fantoccini::Locator;

use newscope_core::{Article, RecencyWindow, SourceAdapter, SourceError};

use crate::error::ScrapeError;
use crate::listing::{extend_from_listing, ListingItem};
use crate::session::{ScrapeSession, SessionExtractor};

const DEFAULT_BASE_URL: &str = "https://news.skhynix.co.kr";

const LISTING_ITEM: &str = "article";
const TITLE_LINK: &str = "h2.tit a";
const DATE: &str = "span.date";
const CONTENT_CONTAINER: &str = "div.post-contents";

/// Newsroom adapter for `news.skhynix.co.kr`.
pub struct SkHynixNewsroom {
    base_url: String,
    webdriver_url: String,
    wait_timeout: Duration,
}

impl SkHynixNewsroom {
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

    fn listing_page_url(&self, page: usize) -> String {
        if page == 1 {
            format!("{}/all/", self.base_url)
        } else {
            format!("{}/all/page/{page}/", self.base_url)
        }
    }

    /// Reads the current listing page into plain items. A fault on one
    /// element skips that element only.
    async fn listing_items(session: &mut ScrapeSession) -> Result<Vec<ListingItem>, ScrapeError> {
        let elements = session.find_all(LISTING_ITEM).await?;
        let mut items = Vec::new();
        for mut element in elements {
            let Ok(mut link) = element.find(Locator::Css(TITLE_LINK)).await else {
                tracing::warn!(source = "sk_hynix", "listing entry without a title link, skipping");
                continue;
            };
            let Ok(title) = link.text().await else {
                continue;
            };
            let Ok(Some(url)) = link.attr("href").await else {
                tracing::warn!(source = "sk_hynix", "listing entry without an href, skipping");
                continue;
            };

            let date_raw = match element.find(Locator::Css(DATE)).await {
                Ok(mut date) => date.text().await.ok().map(|s| s.trim().to_string()),
                Err(_) => None,
            };

            items.push(ListingItem::new(title.trim().to_string(), url, date_raw));
        }
        Ok(items)
    }

    /// Paginates the listing until the target count is reached or the
    /// listing runs out. Listing-page faults end pagination with the
    /// articles accumulated so far.
    async fn collect(
        &self,
        session: &mut ScrapeSession,
        max_results: usize,
        recency: Option<RecencyWindow>,
    ) -> Vec<Article> {
        let now = Utc::now();
        let mut articles: Vec<Article> = Vec::new();
        let mut page = 1usize;

        while articles.len() < max_results {
            let url = self.listing_page_url(page);
            if let Err(e) = session.goto(&url).await {
                tracing::warn!(source = "sk_hynix", url, error = %e, "listing navigation failed");
                break;
            }

            let items = match Self::listing_items(session).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(source = "sk_hynix", url, error = %e, "listing read failed");
                    break;
                }
            };
            if items.is_empty() {
                break;
            }

            let mut extractor = SessionExtractor::new(session, CONTENT_CONTAINER);
            extend_from_listing(
                &mut articles,
                "sk_hynix",
                items,
                None,
                recency,
                now,
                max_results,
                &mut extractor,
            )
            .await;

            page += 1;
        }

        articles
    }
}

#[async_trait]
impl SourceAdapter for SkHynixNewsroom {
    fn name(&self) -> &str {
        "sk_hynix"
    }

    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
        recency: Option<RecencyWindow>,
    ) -> Result<Vec<Article>, SourceError> {
        tracing::debug!(
            source = "sk_hynix",
            keyword,
            "newsroom listing has no search; collecting latest articles"
        );

        let mut session = ScrapeSession::open(&self.webdriver_url, self.wait_timeout)
            .await
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;

        let articles = self.collect(&mut session, max_results, recency).await;

        // Teardown happens on this path and on the Unreachable path above —
        // every exit releases the browser.
        if let Err(e) = session.close().await {
            tracing::warn!(source = "sk_hynix", error = %e, "browser session close failed");
        }

        tracing::info!(
            source = "sk_hynix",
            count = articles.len(),
            "newsroom collection complete"
        );
        Ok(articles)
    }
}
