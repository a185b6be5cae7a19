//! Term dictionary and bag-of-words encoding for topic modeling.

#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

use newscope_core::NormalizedDocument;

/// Bidirectional term ↔ id mapping scoped to one prepared corpus.
///
/// Ids are assigned in first-seen order over the document set, which keeps
/// every downstream computation deterministic for a fixed corpus.
#[derive(Debug, Clone)]
pub struct Dictionary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Dictionary {
    /// Builds a dictionary from normalized documents, pruning frequency
    /// extremes: terms in fewer than `min_doc_count` documents or in more
    /// than `max_doc_ratio` of them are dropped.
    #[must_use]
    pub fn build(
        docs: &[NormalizedDocument],
        min_doc_count: usize,
        max_doc_ratio: f64,
    ) -> Self {
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for doc in docs {
            let mut seen: HashMap<&str, ()> = HashMap::new();
            for token in &doc.tokens {
                if seen.insert(token.as_str(), ()).is_none() {
                    let freq = doc_freq.entry(token.as_str()).or_insert(0);
                    if *freq == 0 {
                        first_seen.push(token.as_str());
                    }
                    *freq += 1;
                }
            }
        }

        let max_docs = (max_doc_ratio * docs.len() as f64).floor() as usize;
        let mut terms = Vec::new();
        let mut index = HashMap::new();
        for term in first_seen {
            let df = doc_freq[term];
            if df >= min_doc_count && df <= max_docs.max(min_doc_count) {
                index.insert(term.to_string(), terms.len());
                terms.push(term.to_string());
            }
        }

        Self { terms, index }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn id_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term surface form for an id assigned by this dictionary.
    #[must_use]
    pub fn term(&self, id: usize) -> &str {
        &self.terms[id]
    }

    /// Encodes a token stream as `(term_id, count)` pairs ordered by id.
    /// Tokens outside the dictionary are ignored.
    #[must_use]
    pub fn doc_to_bow(&self, tokens: &[String]) -> Vec<(usize, usize)> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            if let Some(id) = self.id_of(token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let mut bow: Vec<(usize, usize)> = counts.into_iter().collect();
        bow.sort_unstable_by_key(|(id, _)| *id);
        bow
    }
}
