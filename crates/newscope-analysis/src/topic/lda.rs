//! Latent Dirichlet allocation via collapsed Gibbs sampling.
//!
//! The sampler is seeded (`StdRng::seed_from_u64`), so a fixed corpus,
//! topic count, pass count, and seed reproduce bit-identical models.

#![allow(clippy::cast_precision_loss)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smoothing hyperparameters. `ALPHA_TOTAL / num_topics` follows the common
/// 50/K heuristic for document-topic smoothing.
const ALPHA_TOTAL: f64 = 50.0;
const BETA: f64 = 0.01;

/// Iterations used for deterministic fold-in inference of unseen documents.
const INFERENCE_ITERATIONS: usize = 50;

/// A fitted LDA model: topic-term distribution `phi` and per-training-document
/// topic distribution `theta`.
#[derive(Debug, Clone)]
pub struct LdaModel {
    num_topics: usize,
    alpha: f64,
    /// `phi[k][w]`: probability of term `w` under topic `k`.
    topic_term: Vec<Vec<f64>>,
    /// `theta[d][k]`: probability of topic `k` in training document `d`.
    doc_topic: Vec<Vec<f64>>,
}

impl LdaModel {
    /// Fits an LDA model on a bag-of-words corpus.
    ///
    /// `corpus[d]` holds `(term_id, count)` pairs with ids below
    /// `vocab_size`. Empty documents contribute nothing to the counts but
    /// keep their row in `theta` (smoothed to uniform).
    #[must_use]
    pub fn train(
        corpus: &[Vec<(usize, usize)>],
        vocab_size: usize,
        num_topics: usize,
        passes: usize,
        seed: u64,
    ) -> Self {
        let alpha = ALPHA_TOTAL / num_topics as f64;
        let mut rng = StdRng::seed_from_u64(seed);

        // Expand bags into token instances once; Gibbs resamples in place.
        let doc_tokens: Vec<Vec<usize>> = corpus
            .iter()
            .map(|bow| {
                bow.iter()
                    .flat_map(|&(term, count)| std::iter::repeat_n(term, count))
                    .collect()
            })
            .collect();

        let mut assignments: Vec<Vec<usize>> = doc_tokens
            .iter()
            .map(|tokens| {
                tokens
                    .iter()
                    .map(|_| rng.random_range(0..num_topics))
                    .collect()
            })
            .collect();

        let mut doc_topic_counts = vec![vec![0usize; num_topics]; corpus.len()];
        let mut topic_term_counts = vec![vec![0usize; vocab_size]; num_topics];
        let mut topic_totals = vec![0usize; num_topics];
        for (d, tokens) in doc_tokens.iter().enumerate() {
            for (i, &term) in tokens.iter().enumerate() {
                let k = assignments[d][i];
                doc_topic_counts[d][k] += 1;
                topic_term_counts[k][term] += 1;
                topic_totals[k] += 1;
            }
        }

        let vocab_smoothing = BETA * vocab_size as f64;
        let mut weights = vec![0.0_f64; num_topics];

        for _ in 0..passes {
            for (d, tokens) in doc_tokens.iter().enumerate() {
                for (i, &term) in tokens.iter().enumerate() {
                    let old = assignments[d][i];
                    doc_topic_counts[d][old] -= 1;
                    topic_term_counts[old][term] -= 1;
                    topic_totals[old] -= 1;

                    let mut total = 0.0;
                    for k in 0..num_topics {
                        let w = (doc_topic_counts[d][k] as f64 + alpha)
                            * (topic_term_counts[k][term] as f64 + BETA)
                            / (topic_totals[k] as f64 + vocab_smoothing);
                        weights[k] = w;
                        total += w;
                    }

                    let mut target = rng.random::<f64>() * total;
                    let mut new = num_topics - 1;
                    for (k, &w) in weights.iter().enumerate() {
                        if target < w {
                            new = k;
                            break;
                        }
                        target -= w;
                    }

                    assignments[d][i] = new;
                    doc_topic_counts[d][new] += 1;
                    topic_term_counts[new][term] += 1;
                    topic_totals[new] += 1;
                }
            }
        }

        let topic_term = topic_term_counts
            .iter()
            .zip(&topic_totals)
            .map(|(counts, &total)| {
                counts
                    .iter()
                    .map(|&c| (c as f64 + BETA) / (total as f64 + vocab_smoothing))
                    .collect()
            })
            .collect();

        let topic_smoothing = alpha * num_topics as f64;
        let doc_topic = doc_topic_counts
            .iter()
            .zip(&doc_tokens)
            .map(|(counts, tokens)| {
                counts
                    .iter()
                    .map(|&c| (c as f64 + alpha) / (tokens.len() as f64 + topic_smoothing))
                    .collect()
            })
            .collect();

        Self {
            num_topics,
            alpha,
            topic_term,
            doc_topic,
        }
    }

    #[must_use]
    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    /// Term distribution of one topic (`phi[topic]`).
    #[must_use]
    pub fn term_weights(&self, topic: usize) -> &[f64] {
        &self.topic_term[topic]
    }

    /// Topic distribution of one training document (`theta[doc]`).
    #[must_use]
    pub fn doc_weights(&self, doc: usize) -> &[f64] {
        &self.doc_topic[doc]
    }

    /// Deterministic fold-in inference of the topic distribution for an
    /// unseen bag-of-words document. Returns a uniform prior for documents
    /// with no in-vocabulary tokens.
    #[must_use]
    pub fn infer(&self, bow: &[(usize, usize)]) -> Vec<f64> {
        let uniform = 1.0 / self.num_topics as f64;
        let mut theta = vec![uniform; self.num_topics];
        if bow.is_empty() {
            return theta;
        }

        let token_count: f64 = bow.iter().map(|&(_, c)| c as f64).sum();
        let denom = token_count + self.alpha * self.num_topics as f64;

        for _ in 0..INFERENCE_ITERATIONS {
            let mut accum = vec![self.alpha; self.num_topics];
            for &(term, count) in bow {
                let mut gamma: Vec<f64> = (0..self.num_topics)
                    .map(|k| theta[k] * self.topic_term[k][term])
                    .collect();
                let sum: f64 = gamma.iter().sum();
                if sum <= 0.0 {
                    continue;
                }
                for (k, g) in gamma.iter_mut().enumerate() {
                    accum[k] += count as f64 * *g / sum;
                }
            }
            for (k, a) in accum.iter().enumerate() {
                theta[k] = a / denom;
            }
        }

        // Normalize away smoothing drift.
        let total: f64 = theta.iter().sum();
        for t in &mut theta {
            *t /= total;
        }
        theta
    }

    /// Per-word log₂ likelihood of the training corpus under the fitted
    /// model — the log-scale perplexity bound. Typically negative; values
    /// closer to zero indicate a tighter fit.
    #[must_use]
    pub fn log_perplexity(&self, corpus: &[Vec<(usize, usize)>]) -> f64 {
        let mut log_likelihood = 0.0_f64;
        let mut token_count = 0usize;
        for (d, bow) in corpus.iter().enumerate() {
            for &(term, count) in bow {
                let p: f64 = (0..self.num_topics)
                    .map(|k| self.doc_topic[d][k] * self.topic_term[k][term])
                    .sum();
                if p > 0.0 {
                    log_likelihood += count as f64 * p.log2();
                }
                token_count += count;
            }
        }
        if token_count == 0 {
            return 0.0;
        }
        log_likelihood / token_count as f64
    }
}
