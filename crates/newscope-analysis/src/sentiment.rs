//! Lexicon-based sentiment scoring.
//!
//! Each document gets a scalar polarity in `[-1, 1]` from a signed
//! word-weight lexicon; the corpus-level result is the proportion of
//! positive / neutral / negative documents.

#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

use newscope_core::{NormalizedDocument, SentimentDistribution};

use crate::error::AnalysisError;

/// Default polarity weights for news coverage in this domain.
///
/// Keys are lowercase surface forms. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` negative. Document scores are clamped to `[-1.0, 1.0]`.
const DEFAULT_LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("성장", 0.4),
    ("상승", 0.4),
    ("확대", 0.3),
    ("호조", 0.5),
    ("최대", 0.3),
    ("신기록", 0.5),
    ("흑자", 0.5),
    ("성공", 0.4),
    ("협력", 0.3),
    ("수상", 0.3),
    ("혁신", 0.3),
    ("개선", 0.3),
    ("회복", 0.4),
    ("record", 0.4),
    ("growth", 0.4),
    ("strong", 0.3),
    ("breakthrough", 0.5),
    ("partnership", 0.3),
    // Negative signals
    ("하락", -0.4),
    ("감소", -0.3),
    ("적자", -0.5),
    ("부진", -0.4),
    ("리콜", -0.6),
    ("소송", -0.5),
    ("우려", -0.3),
    ("지연", -0.3),
    ("결함", -0.6),
    ("위기", -0.5),
    ("중단", -0.4),
    ("규제", -0.3),
    ("감산", -0.3),
    ("decline", -0.4),
    ("lawsuit", -0.5),
    ("recall", -0.6),
    ("delay", -0.3),
    ("defect", -0.6),
    ("concern", -0.3),
];

/// Per-document polarity classifier aggregated into a corpus distribution.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: HashMap<String, f64>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self {
            lexicon: DEFAULT_LEXICON
                .iter()
                .map(|(term, weight)| ((*term).to_string(), *weight))
                .collect(),
        }
    }
}

impl SentimentScorer {
    /// Builds a scorer with a caller-supplied lexicon, replacing the default.
    #[must_use]
    pub fn with_lexicon<I, S>(lexicon: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            lexicon: lexicon
                .into_iter()
                .map(|(term, weight)| (term.into().to_lowercase(), weight))
                .collect(),
        }
    }

    /// Adds or overrides polarity terms.
    pub fn add_terms<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (term, weight) in terms {
            self.lexicon.insert(term.into().to_lowercase(), weight);
        }
    }

    /// Removes polarity terms.
    pub fn remove_terms<'a, I>(&mut self, terms: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for term in terms {
            self.lexicon.remove(&term.to_lowercase());
        }
    }

    /// Scalar polarity of one document: the sum of matched weights, clamped
    /// to `[-1.0, 1.0]`. Unknown-vocabulary documents score `0.0`.
    #[must_use]
    pub fn score_document(&self, doc: &NormalizedDocument) -> f64 {
        let mut score = 0.0_f64;
        for token in &doc.tokens {
            if let Some(weight) = self.lexicon.get(&token.to_lowercase()) {
                score += weight;
            }
        }
        score.clamp(-1.0, 1.0)
    }

    /// Classifies every document and returns the corpus-level distribution.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyDocumentSet`] for an empty slice —
    /// rejected before any work rather than dividing by zero.
    pub fn score(
        &self,
        docs: &[NormalizedDocument],
    ) -> Result<SentimentDistribution, AnalysisError> {
        if docs.is_empty() {
            return Err(AnalysisError::EmptyDocumentSet);
        }

        let mut positive = 0usize;
        let mut negative = 0usize;
        for doc in docs {
            let polarity = self.score_document(doc);
            if polarity > 0.0 {
                positive += 1;
            } else if polarity < 0.0 {
                negative += 1;
            }
        }
        let neutral = docs.len() - positive - negative;

        let total = docs.len() as f64;
        Ok(SentimentDistribution {
            positive: positive as f64 / total,
            neutral: neutral as f64 / total,
            negative: negative as f64 / total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(tokens: &[&str]) -> NormalizedDocument {
        NormalizedDocument::from_tokens(tokens.iter().map(|t| (*t).to_string()).collect())
    }

    #[test]
    fn empty_document_set_is_rejected() {
        let scorer = SentimentScorer::default();
        assert!(matches!(
            scorer.score(&[]),
            Err(AnalysisError::EmptyDocumentSet)
        ));
    }

    #[test]
    fn unknown_vocabulary_scores_neutral() {
        let scorer = SentimentScorer::default();
        assert_eq!(scorer.score_document(&doc(&["웨이퍼", "공장"])), 0.0);
    }

    #[test]
    fn positive_and_negative_terms_move_the_score() {
        let scorer = SentimentScorer::default();
        assert!(scorer.score_document(&doc(&["매출", "성장"])) > 0.0);
        assert!(scorer.score_document(&doc(&["출하", "지연"])) < 0.0);
    }

    #[test]
    fn scores_clamp_to_unit_interval() {
        let scorer = SentimentScorer::default();
        let very_positive = doc(&["성장", "상승", "호조", "신기록", "흑자", "성공", "회복"]);
        assert_eq!(scorer.score_document(&very_positive), 1.0);
        let very_negative = doc(&["적자", "리콜", "소송", "결함", "위기", "하락", "중단"]);
        assert_eq!(scorer.score_document(&very_negative), -1.0);
    }

    #[test]
    fn distribution_proportions_sum_to_one() {
        let scorer = SentimentScorer::default();
        let docs = vec![
            doc(&["성장"]),
            doc(&["하락"]),
            doc(&["웨이퍼"]),
            doc(&["성장", "하락"]), // +0.4 - 0.4 = neutral
        ];
        let dist = scorer.score(&docs).unwrap();
        assert!(dist.is_valid(), "invalid distribution: {dist:?}");
        assert!((dist.positive - 0.25).abs() < 1e-12);
        assert!((dist.negative - 0.25).abs() < 1e-12);
        assert!((dist.neutral - 0.5).abs() < 1e-12);
    }

    #[test]
    fn lexicon_mutation_changes_classification() {
        let mut scorer = SentimentScorer::default();
        assert_eq!(scorer.score_document(&doc(&["양산"])), 0.0);

        scorer.add_terms([("양산", 0.4)]);
        assert!(scorer.score_document(&doc(&["양산"])) > 0.0);

        scorer.remove_terms(["양산"]);
        assert_eq!(scorer.score_document(&doc(&["양산"])), 0.0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let scorer = SentimentScorer::default();
        assert!(scorer.score_document(&doc(&["Growth"])) > 0.0);
    }
}
