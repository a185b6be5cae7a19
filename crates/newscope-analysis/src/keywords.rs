//! Keyword, n-gram, and co-occurrence extraction over normalized documents.
//!
//! All functions here are pure over `&[NormalizedDocument]`; nothing caches
//! state between calls.

#![allow(clippy::cast_precision_loss)]

use std::collections::{HashMap, HashSet};

use newscope_core::{CorpusStats, KeywordSet, NormalizedDocument};

/// Default number of keywords returned by the weighted extractor.
pub const DEFAULT_KEYWORD_COUNT: usize = 20;

/// Top-`k` terms by raw occurrence count across the document set.
///
/// Ties are broken by first-seen order over the concatenated token stream.
#[must_use]
pub fn top_by_frequency(docs: &[NormalizedDocument], k: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut order = 0usize;
    for doc in docs {
        for token in &doc.tokens {
            let entry = counts.entry(token.as_str()).or_insert_with(|| {
                let slot = (0, order);
                order += 1;
                slot
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first_seen))| (term, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(k)
        .map(|(term, count, _)| (term.to_string(), count))
        .collect()
}

/// Top-`k` terms by mean TF-IDF across the corpus.
///
/// Term frequency is normalized per document; inverse document frequency is
/// the smoothed `ln((1 + n) / (1 + df)) + 1`, so terms frequent in few
/// documents score higher than terms ubiquitous across the corpus. Scores
/// are averaged over all documents (documents lacking the term contribute
/// zero), which keeps the ranking stable as the corpus grows.
#[must_use]
pub fn top_by_tfidf(docs: &[NormalizedDocument], k: usize) -> KeywordSet {
    let n_docs = docs.len();
    if n_docs == 0 {
        return Vec::new();
    }

    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut order = 0usize;
    for doc in docs {
        let mut seen: HashSet<&str> = HashSet::new();
        for token in &doc.tokens {
            first_seen.entry(token.as_str()).or_insert_with(|| {
                let slot = order;
                order += 1;
                slot
            });
            if seen.insert(token.as_str()) {
                *doc_freq.entry(token.as_str()).or_insert(0) += 1;
            }
        }
    }

    let idf = |df: usize| -> f64 { ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0 };

    let mut scores: HashMap<&str, f64> = HashMap::new();
    for doc in docs {
        if doc.tokens.is_empty() {
            continue;
        }
        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        for token in &doc.tokens {
            *term_counts.entry(token.as_str()).or_insert(0) += 1;
        }
        let doc_len = doc.tokens.len() as f64;
        for (term, count) in term_counts {
            let tf = count as f64 / doc_len;
            *scores.entry(term).or_insert(0.0) += tf * idf(doc_freq[term]);
        }
    }

    let mut ranked: Vec<(&str, f64)> = scores
        .into_iter()
        .map(|(term, total)| (term, total / n_docs as f64))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| first_seen[a.0].cmp(&first_seen[b.0]))
    });
    ranked
        .into_iter()
        .take(k)
        .map(|(term, score)| (term.to_string(), score))
        .collect()
}

/// Fixed-vocabulary analysis: for each known domain term, the number of
/// documents whose token stream contains it. Terms absent from every
/// document are reported with a zero count.
#[must_use]
pub fn term_document_frequency(
    docs: &[NormalizedDocument],
    vocabulary: &[String],
) -> Vec<(String, usize)> {
    vocabulary
        .iter()
        .map(|term| {
            let count = docs
                .iter()
                .filter(|doc| doc.tokens.iter().any(|t| t == term))
                .count();
            (term.clone(), count)
        })
        .collect()
}

/// Symmetric term-by-term co-occurrence counts over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct CooccurrenceMatrix {
    terms: Vec<String>,
    counts: Vec<Vec<u32>>,
}

impl CooccurrenceMatrix {
    /// The vocabulary, in the order used for matrix indices.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of documents containing both term `i` and term `j`.
    #[must_use]
    pub fn count(&self, i: usize, j: usize) -> u32 {
        self.counts[i][j]
    }

    /// Co-occurrence count looked up by term surface forms.
    #[must_use]
    pub fn count_for(&self, a: &str, b: &str) -> Option<u32> {
        let i = self.terms.iter().position(|t| t == a)?;
        let j = self.terms.iter().position(|t| t == b)?;
        Some(self.counts[i][j])
    }
}

/// Counts, for every pair of vocabulary terms, the documents in which both
/// appear. The diagonal is left at zero; the matrix is symmetric.
#[must_use]
pub fn cooccurrence_matrix(
    docs: &[NormalizedDocument],
    vocabulary: &[String],
) -> CooccurrenceMatrix {
    let size = vocabulary.len();
    let mut counts = vec![vec![0u32; size]; size];

    for doc in docs {
        let tokens: HashSet<&str> = doc.tokens.iter().map(String::as_str).collect();
        let present: Vec<usize> = vocabulary
            .iter()
            .enumerate()
            .filter(|(_, term)| tokens.contains(term.as_str()))
            .map(|(i, _)| i)
            .collect();
        for (a, &i) in present.iter().enumerate() {
            for &j in &present[a + 1..] {
                counts[i][j] += 1;
                counts[j][i] += 1;
            }
        }
    }

    CooccurrenceMatrix {
        terms: vocabulary.to_vec(),
        counts,
    }
}

/// Top-`k` contiguous `n`-grams (space-joined) by occurrence count, ties by
/// first-seen order. `n == 2` reproduces the classic bigram report.
#[must_use]
pub fn top_ngrams(docs: &[NormalizedDocument], n: usize, k: usize) -> Vec<(String, usize)> {
    if n == 0 {
        return Vec::new();
    }
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut order = 0usize;
    for doc in docs {
        if doc.tokens.len() < n {
            continue;
        }
        for window in doc.tokens.windows(n) {
            let gram = window.join(" ");
            let entry = counts.entry(gram).or_insert_with(|| {
                let slot = (0, order);
                order += 1;
                slot
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(gram, (count, first_seen))| (gram, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(k)
        .map(|(gram, count, _)| (gram, count))
        .collect()
}

/// Document, token, and unique-token counts over the set.
#[must_use]
pub fn corpus_stats(docs: &[NormalizedDocument]) -> CorpusStats {
    let mut unique: HashSet<&str> = HashSet::new();
    let mut token_count = 0usize;
    for doc in docs {
        token_count += doc.tokens.len();
        unique.extend(doc.tokens.iter().map(String::as_str));
    }
    CorpusStats {
        document_count: docs.len(),
        token_count,
        unique_token_count: unique.len(),
    }
}

/// Jaccard similarity of two documents' token sets, in `[0, 1]`.
/// Two empty documents are defined as dissimilar (0.0).
#[must_use]
pub fn jaccard_similarity(a: &NormalizedDocument, b: &NormalizedDocument) -> f64 {
    let set_a: HashSet<&str> = a.tokens.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.tokens.iter().map(String::as_str).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(tokens: &[&str]) -> NormalizedDocument {
        NormalizedDocument::from_tokens(tokens.iter().map(|t| (*t).to_string()).collect())
    }

    #[test]
    fn frequency_ranks_by_count_then_first_seen() {
        let docs = vec![doc(&["하이닉스", "HBM", "HBM", "수요"]), doc(&["수요", "공급"])];
        let top = top_by_frequency(&docs, 3);
        assert_eq!(top[0], ("HBM".to_string(), 2));
        assert_eq!(top[1], ("수요".to_string(), 2));
        assert_eq!(top[2], ("하이닉스".to_string(), 1));
    }

    #[test]
    fn frequency_tie_break_is_first_seen_order() {
        let docs = vec![doc(&["알파", "베타", "감마"])];
        let top = top_by_frequency(&docs, 3);
        assert_eq!(
            top,
            vec![
                ("알파".to_string(), 1),
                ("베타".to_string(), 1),
                ("감마".to_string(), 1)
            ]
        );
    }

    #[test]
    fn tfidf_prefers_terms_concentrated_in_few_documents() {
        let docs = vec![
            doc(&["공통", "희귀", "희귀", "희귀"]),
            doc(&["공통", "잡음"]),
            doc(&["공통", "잡음"]),
        ];
        let keywords = top_by_tfidf(&docs, 10);
        let score = |term: &str| {
            keywords
                .iter()
                .find(|(t, _)| t == term)
                .map(|(_, s)| *s)
                .unwrap()
        };
        assert!(
            score("희귀") > score("공통"),
            "rare term should outrank ubiquitous term: {keywords:?}"
        );
        assert!(keywords.iter().all(|(_, s)| *s >= 0.0));
    }

    #[test]
    fn tfidf_of_empty_corpus_is_empty() {
        assert!(top_by_tfidf(&[], 10).is_empty());
        assert!(top_by_tfidf(&[doc(&[])], 10).is_empty());
    }

    #[test]
    fn fixed_vocabulary_counts_documents_not_occurrences() {
        let docs = vec![doc(&["HBM", "HBM", "DRAM"]), doc(&["HBM"]), doc(&["NAND"])];
        let vocab = vec!["HBM".to_string(), "DRAM".to_string(), "TSV".to_string()];
        let freq = term_document_frequency(&docs, &vocab);
        assert_eq!(freq[0], ("HBM".to_string(), 2));
        assert_eq!(freq[1], ("DRAM".to_string(), 1));
        assert_eq!(freq[2], ("TSV".to_string(), 0));
    }

    #[test]
    fn cooccurrence_matrix_is_symmetric_with_zero_diagonal() {
        let docs = vec![
            doc(&["HBM", "DRAM", "수요"]),
            doc(&["HBM", "DRAM"]),
            doc(&["HBM"]),
        ];
        let vocab = vec!["HBM".to_string(), "DRAM".to_string(), "수요".to_string()];
        let matrix = cooccurrence_matrix(&docs, &vocab);
        assert_eq!(matrix.count(0, 1), 2);
        assert_eq!(matrix.count(1, 0), 2);
        assert_eq!(matrix.count(0, 2), 1);
        assert_eq!(matrix.count(0, 0), 0);
        assert_eq!(matrix.count_for("HBM", "DRAM"), Some(2));
        assert_eq!(matrix.count_for("HBM", "없음"), None);
    }

    #[test]
    fn bigrams_count_contiguous_pairs() {
        let docs = vec![doc(&["메모리", "수요", "증가"]), doc(&["메모리", "수요"])];
        let grams = top_ngrams(&docs, 2, 5);
        assert_eq!(grams[0], ("메모리 수요".to_string(), 2));
        assert_eq!(grams[1], ("수요 증가".to_string(), 1));
    }

    #[test]
    fn ngrams_skip_too_short_documents() {
        let docs = vec![doc(&["단독"])];
        assert!(top_ngrams(&docs, 2, 5).is_empty());
    }

    #[test]
    fn corpus_stats_counts_tokens_and_uniques() {
        let docs = vec![doc(&["a", "b", "a"]), doc(&["b", "c"])];
        let stats = corpus_stats(&docs);
        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.token_count, 5);
        assert_eq!(stats.unique_token_count, 3);
    }

    #[test]
    fn jaccard_similarity_bounds() {
        let a = doc(&["a", "b"]);
        let b = doc(&["b", "c"]);
        let sim = jaccard_similarity(&a, &b);
        assert!((sim - 1.0 / 3.0).abs() < 1e-12);
        assert!((jaccard_similarity(&a, &a) - 1.0).abs() < 1e-12);
        assert!(jaccard_similarity(&doc(&[]), &doc(&[])) < f64::EPSILON);
    }
}
