//! Sequenced analysis pipeline: normalize → keywords → sentiment → topics.

use newscope_core::{AnalysisResult, Article};

use crate::error::{AnalysisError, Stage};
use crate::keywords::{self, DEFAULT_KEYWORD_COUNT};
use crate::normalize::TextNormalizer;
use crate::sentiment::SentimentScorer;
use crate::topic::{TopicModel, TopicModelConfig};

/// Topics extracted by the one-shot pipeline.
const DEFAULT_TOPIC_COUNT: usize = 3;
/// Training passes for the one-shot topic stage.
const DEFAULT_TOPIC_PASSES: usize = 10;
/// Terms reported per topic.
const TOPIC_TERM_COUNT: usize = 10;

/// Runs the full analysis pipeline over a collected article set and
/// assembles one immutable [`AnalysisResult`].
///
/// The orchestrator owns its normalizer, scorer, and topic configuration;
/// instances are scoped to one caller and must not be shared across
/// concurrent analysis runs.
pub struct AnalysisOrchestrator {
    normalizer: TextNormalizer,
    scorer: SentimentScorer,
    topic_config: TopicModelConfig,
    num_topics: usize,
    topic_passes: usize,
    keyword_count: usize,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new(TextNormalizer::default(), SentimentScorer::default())
    }
}

impl AnalysisOrchestrator {
    #[must_use]
    pub fn new(normalizer: TextNormalizer, scorer: SentimentScorer) -> Self {
        Self {
            normalizer,
            scorer,
            topic_config: TopicModelConfig::default(),
            num_topics: DEFAULT_TOPIC_COUNT,
            topic_passes: DEFAULT_TOPIC_PASSES,
            keyword_count: DEFAULT_KEYWORD_COUNT,
        }
    }

    #[must_use]
    pub fn with_topic_count(mut self, num_topics: usize) -> Self {
        self.num_topics = num_topics;
        self
    }

    #[must_use]
    pub fn with_keyword_count(mut self, keyword_count: usize) -> Self {
        self.keyword_count = keyword_count;
        self
    }

    /// The owned normalizer, for stop-word/lexicon configuration.
    pub fn normalizer_mut(&mut self) -> &mut TextNormalizer {
        &mut self.normalizer
    }

    /// The owned sentiment scorer, for polarity-lexicon configuration.
    pub fn scorer_mut(&mut self) -> &mut SentimentScorer {
        &mut self.scorer
    }

    /// Analyzes a collected article set.
    ///
    /// Stages run in order: normalize every article body, extract weighted
    /// keywords, score sentiment, then prepare/train/extract topics in one
    /// shot. The result references the input article ids and is assembled
    /// only after every stage succeeded.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::EmptyInput`] for an empty article slice, rejected
    ///   before any stage runs.
    /// - [`AnalysisError::Stage`] naming the failed stage otherwise; no
    ///   partial result is committed.
    pub fn analyze(&self, articles: &[Article]) -> Result<AnalysisResult, AnalysisError> {
        if articles.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let documents: Vec<_> = articles
            .iter()
            .map(|article| self.normalizer.normalize_article(article))
            .collect();
        tracing::debug!(documents = documents.len(), "normalized article bodies");

        let keywords = keywords::top_by_tfidf(&documents, self.keyword_count);

        let sentiment = self
            .scorer
            .score(&documents)
            .map_err(|e| e.in_stage(Stage::Sentiment))?;

        let mut topic_model = TopicModel::new(self.topic_config);
        let topics = topic_model
            .prepare(&documents)
            .and_then(|()| topic_model.train(self.num_topics, self.topic_passes))
            .and_then(|()| topic_model.topics(TOPIC_TERM_COUNT))
            .map_err(|e| e.in_stage(Stage::Topics))?;

        let article_ids = articles.iter().map(|a| a.id.clone()).collect();
        Ok(AnalysisResult::new(article_ids, keywords, sentiment, topics))
    }
}
