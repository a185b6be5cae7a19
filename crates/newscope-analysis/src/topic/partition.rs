//! Per-partition topic models.
//!
//! One independent [`TopicModel`] per calendar year, each owning its own
//! dictionary and corpus encoding. Nothing is shared across partitions, so
//! no cross-partition state can leak; analyzing a combined span means
//! preparing a joint corpus on a fresh model instead.

use std::collections::BTreeMap;

use chrono::Datelike;

use newscope_core::{Article, NormalizedDocument, Topic};

use crate::normalize::TextNormalizer;

use super::{TopicModel, TopicModelConfig};

/// Keyed collection of independently trained per-year models.
#[derive(Debug, Default)]
pub struct PartitionedTopicModels {
    models: BTreeMap<i32, TopicModel>,
}

impl PartitionedTopicModels {
    /// Normalizes the articles, partitions them by publication year, and
    /// trains one model per partition.
    ///
    /// Articles without a publication date cannot be partitioned and are
    /// skipped. A partition whose corpus prepares empty (or fails to train)
    /// is skipped with a warning; the other partitions are unaffected.
    #[must_use]
    pub fn train_per_year(
        articles: &[Article],
        normalizer: &TextNormalizer,
        num_topics: usize,
        passes: usize,
        config: TopicModelConfig,
    ) -> Self {
        let mut groups: BTreeMap<i32, Vec<NormalizedDocument>> = BTreeMap::new();
        for article in articles {
            let Some(published) = article.published_at else {
                tracing::debug!(article = %article.id, "article has no date, skipping partitioning");
                continue;
            };
            groups
                .entry(published.year())
                .or_default()
                .push(normalizer.normalize_article(article));
        }

        let mut models = BTreeMap::new();
        for (year, docs) in groups {
            let mut model = TopicModel::new(config);
            match model
                .prepare(&docs)
                .and_then(|()| model.train(num_topics, passes))
            {
                Ok(()) => {
                    models.insert(year, model);
                }
                Err(e) => {
                    tracing::warn!(year, error = %e, "skipping year partition");
                }
            }
        }

        Self { models }
    }

    /// Years with a successfully trained model, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.models.keys().copied().collect()
    }

    #[must_use]
    pub fn get(&self, year: i32) -> Option<&TopicModel> {
        self.models.get(&year)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Topic lists per year, each with up to `num_words` terms per topic.
    #[must_use]
    pub fn topics_by_year(&self, num_words: usize) -> BTreeMap<i32, Vec<Topic>> {
        self.models
            .iter()
            .filter_map(|(year, model)| Some((*year, model.topics(num_words).ok()?)))
            .collect()
    }
}
