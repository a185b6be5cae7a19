//! One headless browser, scoped to one search call.

use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};

use newscope_core::ArticleBody;

use crate::error::ScrapeError;
use crate::listing::ArticleExtractor;

/// Footnote lines start with this marker and are excluded from bodies.
const FOOTNOTE_MARKER: &str = "* ";

/// Stateful wrapper around one WebDriver-controlled browser.
///
/// Owns exactly one browser instance; it is never shared across concurrent
/// adapter invocations. Callers must invoke [`ScrapeSession::close`] on
/// every exit path — the adapters do this after the listing walk finishes,
/// whether it succeeded or broke off early.
pub struct ScrapeSession {
    client: Client,
    wait_timeout: Duration,
}

impl ScrapeSession {
    /// Connects to the WebDriver endpoint and starts a headless browser.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Session`] when the session cannot be
    /// established — the source-level failure for newsroom adapters.
    pub async fn open(webdriver_url: &str, wait_timeout: Duration) -> Result<Self, ScrapeError> {
        let mut caps = serde_json::map::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            serde_json::json!({
                "args": [
                    "--headless=new",
                    "--no-sandbox",
                    "--disable-dev-shm-usage",
                    "--window-size=1920,1080",
                ]
            }),
        );

        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(webdriver_url)
            .await
            .map_err(|e| ScrapeError::Session(e.to_string()))?;

        Ok(Self {
            client,
            wait_timeout,
        })
    }

    /// Navigates the listing window.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Browser`] when navigation fails.
    pub async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.client.goto(url).await?;
        Ok(())
    }

    /// All elements matching a CSS selector in the current window.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Browser`] when the lookup fails.
    pub async fn find_all(&mut self, css: &str) -> Result<Vec<Element>, ScrapeError> {
        Ok(self.client.find_all(Locator::Css(css)).await?)
    }

    /// Extracts an article body in an isolated window, recovering to the
    /// listing window afterwards.
    ///
    /// Opens `url` in a new window, waits (bounded) for `container_css` to
    /// appear, collects paragraph text minus footnote lines, closes the
    /// window, and switches back. A timeout, missing container, or empty
    /// body yields [`ArticleBody::ExtractionFailed`] — never an error, so
    /// one bad article cannot abort the session.
    pub async fn extract_article_body(&mut self, url: &str, container_css: &str) -> ArticleBody {
        let listing_window = match self.client.window().await {
            Ok(window) => window,
            Err(e) => {
                tracing::warn!(url, error = %e, "could not identify listing window");
                return ArticleBody::ExtractionFailed;
            }
        };

        let extracted = self.extract_in_new_window(url, container_css).await;

        // Recover to the listing window regardless of what happened above.
        if let Err(e) = self.client.switch_to_window(listing_window).await {
            tracing::warn!(url, error = %e, "failed to switch back to listing window");
        }

        match extracted {
            Ok(text) if !text.is_empty() => ArticleBody::Extracted(text),
            Ok(_) => {
                tracing::warn!(url, "content container had no paragraph text");
                ArticleBody::ExtractionFailed
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "article extraction failed");
                ArticleBody::ExtractionFailed
            }
        }
    }

    async fn extract_in_new_window(
        &mut self,
        url: &str,
        container_css: &str,
    ) -> Result<String, ScrapeError> {
        let new_window = self.client.new_window(true).await?;
        self.client.switch_to_window(new_window.handle).await?;

        let extracted = self.extract_in_current_window(url, container_css).await;

        // Close the article window whether extraction worked or not; the
        // caller switches back to the listing window.
        if let Err(e) = self.client.close_window().await {
            tracing::debug!(url, error = %e, "failed to close article window");
        }

        extracted
    }

    async fn extract_in_current_window(
        &mut self,
        url: &str,
        container_css: &str,
    ) -> Result<String, ScrapeError> {
        self.client.goto(url).await?;

        let mut container = self
            .client
            .wait()
            .at_most(self.wait_timeout)
            .for_element(Locator::Css(container_css))
            .await?;

        let paragraphs = container.find_all(Locator::Css("p")).await?;
        let mut parts: Vec<String> = Vec::new();
        for mut paragraph in paragraphs {
            let Ok(text) = paragraph.text().await else {
                // A stale paragraph is a per-item fault; keep the rest.
                continue;
            };
            let text = text.trim();
            if !text.is_empty() && !text.starts_with(FOOTNOTE_MARKER) {
                parts.push(text.to_string());
            }
        }
        Ok(parts.join("\n"))
    }

    /// Ends the session and releases the browser.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Browser`] when the WebDriver refuses the
    /// shutdown; the session is consumed either way.
    pub async fn close(self) -> Result<(), ScrapeError> {
        let mut client = self.client;
        client.close().await?;
        Ok(())
    }
}

/// [`ArticleExtractor`] backed by a live [`ScrapeSession`], bound to one
/// site's content container selector.
pub struct SessionExtractor<'a> {
    session: &'a mut ScrapeSession,
    container_css: &'a str,
}

impl<'a> SessionExtractor<'a> {
    pub fn new(session: &'a mut ScrapeSession, container_css: &'a str) -> Self {
        Self {
            session,
            container_css,
        }
    }
}

#[async_trait::async_trait]
impl ArticleExtractor for SessionExtractor<'_> {
    async fn extract(&mut self, url: &str) -> ArticleBody {
        self.session
            .extract_article_body(url, self.container_css)
            .await
    }
}
