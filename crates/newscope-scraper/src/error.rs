//! Scraper error types.

use thiserror::Error;

/// Errors raised by the browser session.
///
/// Per-article failures never surface as `Err` from an adapter; they are
/// recorded as [`newscope_core::ArticleBody::ExtractionFailed`] and the walk
/// continues.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The WebDriver session could not be established. This is the
    /// source-level "unreachable at session start" failure.
    #[error("failed to start browser session: {0}")]
    Session(String),

    /// A browser command failed (navigation, element lookup, wait timeout).
    #[error("browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),
}
