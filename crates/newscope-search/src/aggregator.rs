//! Cross-source fan-out, failure isolation, and date-ordered merging.

use futures::future::join_all;

use newscope_core::{Article, SearchQuery, SourceAdapter};

use crate::error::SearchError;

/// Fans a [`SearchQuery`] out to every adapter it names and merges the
/// results.
///
/// Adapters are registered once; each owns its own connection or browser
/// session, so the fan-out runs them concurrently with no shared state.
#[derive(Default)]
pub struct SearchAggregator {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl SearchAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source adapter. Later registrations with the same name
    /// are reachable but shadowed for lookup; callers are expected to keep
    /// names unique.
    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        self.adapters.push(adapter);
    }

    /// Names of every registered adapter, in registration order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Runs the query against every source it names.
    ///
    /// Each per-source failure is isolated: a source that errors contributes
    /// zero items, is logged at `warn`, and does not abort the others. The
    /// merged list is sorted by descending publication date; articles
    /// without a date sort after dated ones, and the sort is stable so equal
    /// keys keep source-then-arrival order.
    ///
    /// Cross-source duplicates are not collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] only for invalid queries (empty or unknown
    /// source set, zero `max_results`), rejected before any source is
    /// contacted.
    pub async fn search_all(&self, query: &SearchQuery) -> Result<Vec<Article>, SearchError> {
        let selected = self.validate(query)?;

        let searches = selected.iter().map(|adapter| {
            adapter.search(&query.keyword, query.max_results, query.recency)
        });
        let outcomes = join_all(searches).await;

        let mut articles: Vec<Article> = Vec::new();
        for (adapter, outcome) in selected.iter().zip(outcomes) {
            match outcome {
                Ok(items) => {
                    tracing::info!(
                        source = adapter.name(),
                        count = items.len(),
                        "source returned results"
                    );
                    articles.extend(items);
                }
                Err(e) => {
                    tracing::warn!(
                        source = adapter.name(),
                        error = %e,
                        "source failed, continuing with the others"
                    );
                }
            }
        }

        // Stable sort: newest first, dateless last, ties keep
        // source-then-arrival order from the concatenation above.
        articles.sort_by(|a, b| match (a.published_at, b.published_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(articles)
    }

    /// Checks query invariants and resolves the named adapters.
    fn validate(&self, query: &SearchQuery) -> Result<Vec<&dyn SourceAdapter>, SearchError> {
        if query.sources.is_empty() {
            return Err(SearchError::EmptySources);
        }
        if query.max_results == 0 {
            return Err(SearchError::ZeroMaxResults);
        }
        query
            .sources
            .iter()
            .map(|name| {
                self.adapters
                    .iter()
                    .map(AsRef::as_ref)
                    .find(|adapter| adapter.name() == name.as_str())
                    .ok_or_else(|| SearchError::UnknownSource(name.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use newscope_core::{ArticleBody, RecencyWindow, SourceError};

    use super::*;

    /// Canned adapter: returns fixed articles or a fixed failure.
    struct StubAdapter {
        name: &'static str,
        articles: Vec<Article>,
        fail: bool,
    }

    impl StubAdapter {
        fn ok(name: &'static str, articles: Vec<Article>) -> Box<Self> {
            Box::new(Self {
                name,
                articles,
                fail: false,
            })
        }

        fn failing(name: &'static str) -> Box<Self> {
            Box::new(Self {
                name,
                articles: Vec::new(),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl SourceAdapter for StubAdapter {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(
            &self,
            _keyword: &str,
            max_results: usize,
            _recency: Option<RecencyWindow>,
        ) -> Result<Vec<Article>, SourceError> {
            if self.fail {
                return Err(SourceError::Unreachable("stub down".into()));
            }
            Ok(self.articles.iter().take(max_results).cloned().collect())
        }
    }

    fn article(source: &str, url: &str, day: Option<u32>) -> Article {
        let mut article = Article::new(
            source,
            format!("article {url}"),
            format!("https://{source}.example.com/{url}"),
            ArticleBody::Extracted("body".into()),
        );
        article.published_at =
            day.map(|d| Utc.with_ymd_and_hms(2025, 5, d, 12, 0, 0).unwrap());
        article
    }

    fn query(sources: &[&str], max_results: usize) -> SearchQuery {
        SearchQuery {
            keyword: "HBM".into(),
            max_results,
            recency: None,
            sources: sources.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn results_are_sorted_newest_first_with_dateless_last() {
        let mut aggregator = SearchAggregator::new();
        aggregator.register(StubAdapter::ok(
            "alpha",
            vec![article("alpha", "old", Some(1)), article("alpha", "none", None)],
        ));
        aggregator.register(StubAdapter::ok(
            "beta",
            vec![article("beta", "new", Some(20)), article("beta", "mid", Some(10))],
        ));

        let merged = aggregator
            .search_all(&query(&["alpha", "beta"], 10))
            .await
            .unwrap();

        let urls: Vec<&str> = merged.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://beta.example.com/new",
                "https://beta.example.com/mid",
                "https://alpha.example.com/old",
                "https://alpha.example.com/none",
            ]
        );
    }

    #[tokio::test]
    async fn dateless_ties_keep_source_then_arrival_order() {
        let mut aggregator = SearchAggregator::new();
        aggregator.register(StubAdapter::ok(
            "alpha",
            vec![article("alpha", "a1", None), article("alpha", "a2", None)],
        ));
        aggregator.register(StubAdapter::ok("beta", vec![article("beta", "b1", None)]));

        let merged = aggregator
            .search_all(&query(&["alpha", "beta"], 10))
            .await
            .unwrap();
        let urls: Vec<&str> = merged.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://alpha.example.com/a1",
                "https://alpha.example.com/a2",
                "https://beta.example.com/b1",
            ]
        );
    }

    #[tokio::test]
    async fn one_failing_source_does_not_abort_the_others() {
        let mut aggregator = SearchAggregator::new();
        aggregator.register(StubAdapter::failing("alpha"));
        aggregator.register(StubAdapter::ok("beta", vec![article("beta", "b1", Some(2))]));

        let merged = aggregator
            .search_all(&query(&["alpha", "beta"], 10))
            .await
            .unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "beta");
    }

    #[tokio::test]
    async fn empty_source_set_is_rejected_before_any_work() {
        let aggregator = SearchAggregator::new();
        assert_eq!(
            aggregator.search_all(&query(&[], 10)).await,
            Err(SearchError::EmptySources)
        );
    }

    #[tokio::test]
    async fn unknown_source_is_rejected() {
        let mut aggregator = SearchAggregator::new();
        aggregator.register(StubAdapter::ok("alpha", vec![]));
        assert_eq!(
            aggregator.search_all(&query(&["alpha", "gamma"], 10)).await,
            Err(SearchError::UnknownSource("gamma".into()))
        );
    }

    #[tokio::test]
    async fn zero_max_results_is_rejected() {
        let mut aggregator = SearchAggregator::new();
        aggregator.register(StubAdapter::ok("alpha", vec![]));
        assert_eq!(
            aggregator.search_all(&query(&["alpha"], 0)).await,
            Err(SearchError::ZeroMaxResults)
        );
    }

    #[tokio::test]
    async fn only_named_sources_are_queried() {
        let mut aggregator = SearchAggregator::new();
        aggregator.register(StubAdapter::ok("alpha", vec![article("alpha", "a", Some(3))]));
        aggregator.register(StubAdapter::ok("beta", vec![article("beta", "b", Some(4))]));

        let merged = aggregator.search_all(&query(&["beta"], 10)).await.unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "beta");
    }
}
