//! Unsupervised topic inference with per-partition model instances.
//!
//! A [`TopicModel`] walks the state machine *untrained → corpus-prepared →
//! trained*; calling an operation out of order is a typed invalid-state
//! error, not a panic. Training is seeded, so a fixed corpus and seed
//! reproduce identical topics.

#![allow(clippy::cast_precision_loss)]

mod dictionary;
mod lda;
pub mod partition;

pub use dictionary::Dictionary;
pub use lda::LdaModel;
pub use partition::PartitionedTopicModels;

use newscope_core::{NormalizedDocument, Topic};

use crate::error::AnalysisError;

/// Number of top terms per topic used for coherence scoring.
const COHERENCE_TOP_TERMS: usize = 10;

/// Tunables for corpus preparation and training.
#[derive(Debug, Clone, Copy)]
pub struct TopicModelConfig {
    /// Seed for the Gibbs sampler; fixed by default for reproducibility.
    pub seed: u64,
    /// Drop terms appearing in fewer than this many documents.
    pub min_doc_count: usize,
    /// Drop terms appearing in more than this fraction of documents.
    pub max_doc_ratio: f64,
}

impl Default for TopicModelConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            min_doc_count: 1,
            max_doc_ratio: 1.0,
        }
    }
}

/// Goodness-of-fit measures over the training corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelFit {
    /// Per-word log₂ likelihood bound (log scale, usually negative).
    pub log_perplexity: f64,
    /// UMass coherence averaged over topics (unbounded, higher is better).
    pub coherence: f64,
}

/// Trainable topic model scoped to one corpus partition.
///
/// The dictionary and corpus encoding belong to this instance alone;
/// combining partitions requires preparing a joint corpus on a fresh model.
#[derive(Debug, Clone, Default)]
pub struct TopicModel {
    config: TopicModelConfig,
    dictionary: Option<Dictionary>,
    corpus: Option<Vec<Vec<(usize, usize)>>>,
    model: Option<LdaModel>,
}

impl TopicModel {
    #[must_use]
    pub fn new(config: TopicModelConfig) -> Self {
        Self {
            config,
            dictionary: None,
            corpus: None,
            model: None,
        }
    }

    /// Builds the term dictionary and bag-of-words encoding from normalized
    /// documents, entering the corpus-prepared state. Any previously trained
    /// model is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyCorpus`] when every document normalized
    /// to nothing, or pruning left no usable term.
    pub fn prepare(&mut self, docs: &[NormalizedDocument]) -> Result<(), AnalysisError> {
        let owned: Vec<NormalizedDocument> =
            docs.iter().filter(|d| !d.is_empty()).cloned().collect();

        let dictionary =
            Dictionary::build(&owned, self.config.min_doc_count, self.config.max_doc_ratio);
        if dictionary.is_empty() {
            return Err(AnalysisError::EmptyCorpus);
        }

        let corpus: Vec<Vec<(usize, usize)>> = owned
            .iter()
            .map(|doc| dictionary.doc_to_bow(&doc.tokens))
            .filter(|bow| !bow.is_empty())
            .collect();
        if corpus.is_empty() {
            return Err(AnalysisError::EmptyCorpus);
        }

        self.dictionary = Some(dictionary);
        self.corpus = Some(corpus);
        self.model = None;
        Ok(())
    }

    /// Fits the LDA model on the prepared corpus, entering the trained state.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidState`] when called before [`Self::prepare`].
    /// - [`AnalysisError::InvalidParameters`] for zero topics or passes.
    pub fn train(&mut self, num_topics: usize, passes: usize) -> Result<(), AnalysisError> {
        let (Some(dictionary), Some(corpus)) = (&self.dictionary, &self.corpus) else {
            return Err(AnalysisError::InvalidState {
                operation: "train",
                required: "corpus-prepared",
            });
        };
        if num_topics == 0 {
            return Err(AnalysisError::InvalidParameters(
                "num_topics must be at least 1".to_string(),
            ));
        }
        if passes == 0 {
            return Err(AnalysisError::InvalidParameters(
                "passes must be at least 1".to_string(),
            ));
        }

        let model = LdaModel::train(
            corpus,
            dictionary.len(),
            num_topics,
            passes,
            self.config.seed,
        );
        tracing::debug!(
            num_topics,
            passes,
            vocab = dictionary.len(),
            documents = corpus.len(),
            "trained topic model"
        );
        self.model = Some(model);
        Ok(())
    }

    /// Returns every trained topic with its top `num_words` terms sorted by
    /// descending weight.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidState`] before training.
    pub fn topics(&self, num_words: usize) -> Result<Vec<Topic>, AnalysisError> {
        let (model, dictionary) = self.trained("topics")?;

        let topics = (0..model.num_topics())
            .map(|k| Topic {
                id: k,
                terms: self
                    .ranked_terms(model, dictionary, k)
                    .into_iter()
                    .take(num_words)
                    .collect(),
            })
            .collect();
        Ok(topics)
    }

    /// Topic-membership distribution (topic id → probability) for a new
    /// document, encoded against this model's dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidState`] before training.
    pub fn document_topics(&self, tokens: &[String]) -> Result<Vec<(usize, f64)>, AnalysisError> {
        let (model, dictionary) = self.trained("document_topics")?;
        let bow = dictionary.doc_to_bow(tokens);
        Ok(model.infer(&bow).into_iter().enumerate().collect())
    }

    /// Perplexity and coherence over the training corpus.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidState`] before training.
    pub fn evaluate(&self) -> Result<ModelFit, AnalysisError> {
        let (model, dictionary) = self.trained("evaluate")?;
        let corpus = self.corpus.as_ref().ok_or(AnalysisError::InvalidState {
            operation: "evaluate",
            required: "corpus-prepared",
        })?;

        let log_perplexity = model.log_perplexity(corpus);
        let coherence = self.umass_coherence(model, dictionary, corpus);
        Ok(ModelFit {
            log_perplexity,
            coherence,
        })
    }

    /// Number of topics in the trained model, if trained.
    #[must_use]
    pub fn num_topics(&self) -> Option<usize> {
        self.model.as_ref().map(LdaModel::num_topics)
    }

    /// Dictionary size once the corpus is prepared.
    #[must_use]
    pub fn vocabulary_size(&self) -> Option<usize> {
        self.dictionary.as_ref().map(Dictionary::len)
    }

    fn trained(
        &self,
        operation: &'static str,
    ) -> Result<(&LdaModel, &Dictionary), AnalysisError> {
        match (&self.model, &self.dictionary) {
            (Some(model), Some(dictionary)) => Ok((model, dictionary)),
            _ => Err(AnalysisError::InvalidState {
                operation,
                required: "trained",
            }),
        }
    }

    /// All terms of one topic sorted by descending weight, ties by term id.
    fn ranked_terms(
        &self,
        model: &LdaModel,
        dictionary: &Dictionary,
        topic: usize,
    ) -> Vec<(String, f64)> {
        let weights = model.term_weights(topic);
        let mut ranked: Vec<(usize, f64)> = weights.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
            .into_iter()
            .map(|(id, weight)| (dictionary.term(id).to_string(), weight))
            .collect()
    }

    fn umass_coherence(
        &self,
        model: &LdaModel,
        dictionary: &Dictionary,
        corpus: &[Vec<(usize, usize)>],
    ) -> f64 {
        let doc_terms: Vec<std::collections::HashSet<usize>> = corpus
            .iter()
            .map(|bow| bow.iter().map(|&(id, _)| id).collect())
            .collect();
        let doc_freq = |id: usize| doc_terms.iter().filter(|s| s.contains(&id)).count();
        let joint_freq = |a: usize, b: usize| {
            doc_terms
                .iter()
                .filter(|s| s.contains(&a) && s.contains(&b))
                .count()
        };

        let mut total = 0.0_f64;
        for k in 0..model.num_topics() {
            let top: Vec<usize> = {
                let weights = model.term_weights(k);
                let mut ranked: Vec<(usize, f64)> =
                    weights.iter().copied().enumerate().collect();
                ranked.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.0.cmp(&b.0))
                });
                ranked
                    .into_iter()
                    .take(COHERENCE_TOP_TERMS.min(dictionary.len()))
                    .map(|(id, _)| id)
                    .collect()
            };

            let mut topic_score = 0.0_f64;
            for m in 1..top.len() {
                for l in 0..m {
                    let score = ((joint_freq(top[m], top[l]) as f64 + 1.0)
                        / doc_freq(top[l]) as f64)
                        .ln();
                    topic_score += score;
                }
            }
            total += topic_score;
        }

        total / model.num_topics() as f64
    }
}
