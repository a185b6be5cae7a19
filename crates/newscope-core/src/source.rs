//! The polymorphic source contract shared by every article provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Article, RecencyWindow};

/// Errors surfaced by a source adapter.
///
/// These are *source-level* failures: the whole source was unusable for the
/// call. Per-item faults (one article failing to parse or extract) are never
/// surfaced here — adapters skip the item, log, and continue.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be reached at session start.
    #[error("source unreachable at session start: {0}")]
    Unreachable(String),

    /// The provider rejected the configured credentials.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The provider returned an error envelope.
    #[error("provider API error: {0}")]
    Api(String),

    /// Transport failure after the session was established.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One external provider of article data.
///
/// Implemented by the keyword-search API clients and the newsroom scrapers.
/// Both families honor the same contract, so the aggregator can iterate a
/// homogeneous `Vec<Box<dyn SourceAdapter>>` instead of branching on the
/// source name.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Registered name of this source (e.g. `"naver"`, `"sk_hynix"`).
    fn name(&self) -> &str;

    /// Searches the source for `keyword`, returning at most `max_results`
    /// articles, newest first where the provider supports ordering.
    ///
    /// Returns fewer than `max_results` when the source is exhausted rather
    /// than failing. `recency` bounds how old results may be; `None` means
    /// unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] only when the entire source is unusable
    /// (unreachable at session start, credentials rejected, error envelope).
    /// Single-item faults are skipped and logged, never raised.
    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
        recency: Option<RecencyWindow>,
    ) -> Result<Vec<Article>, SourceError>;
}
