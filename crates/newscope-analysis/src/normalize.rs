//! Lexicon-aware text normalization.
//!
//! Pipeline, strictly ordered: protect domain-lexicon terms and alphanumeric
//! technical terms, strip punctuation and digits from everything else,
//! collapse whitespace, segment into tagged tokens, then retain content
//! tokens that are not stop words or ideographic filler.
//!
//! The stop-word set and domain lexicon are configuration owned by the
//! normalizer instance; both can be mutated at any time without rebuilding
//! the segmenter's compiled patterns.

use std::collections::HashSet;

use regex::Regex;

use newscope_core::{Article, NormalizedDocument};

use crate::lexicon::DomainLexicon;

/// Part-of-speech-like tag assigned during segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    CommonNoun,
    /// Protected lexicon and technical terms.
    ProperNoun,
    Verb,
    Adjective,
    /// Single-character ideographs; never retained.
    Filler,
}

/// Korean functional stop words, including the particles a morphological
/// analyzer would have tagged and dropped.
const DEFAULT_STOP_WORDS: &[&str] = &[
    "이", "그", "저", "것", "수", "등", "및", "또는", "그리고", "하지만", "그러나", "그래서",
    "때문에", "위해", "대해", "관련", "따른", "따라", "통해", "의해", "대한", "있는", "없는",
    "은", "는", "가", "를", "을", "의", "에", "에서", "으로", "로", "와", "과", "도", "만",
    "까지", "부터", "이다", "입니다",
];

const DEFAULT_VERBS: &[&str] = &[
    "하다", "되다", "있다", "없다", "만들다", "늘리다", "줄이다", "높이다", "말했다", "밝혔다",
];

const DEFAULT_ADJECTIVES: &[&str] = &["새롭다", "크다", "작다", "높다", "낮다", "빠르다", "강하다"];

/// Lexicon-aware tokenizer/cleaner producing normalized token streams.
pub struct TextNormalizer {
    /// Protected terms ordered longest-first so span scanning is
    /// leftmost-longest.
    lexicon_terms: Vec<String>,
    lexicon_set: HashSet<String>,
    stop_words: HashSet<String>,
    verbs: HashSet<String>,
    adjectives: HashSet<String>,
    /// Latin-plus-digit technical terms (`HBM3E`, `5G`).
    technical: Regex,
    /// Latin/Hangul mixed-script runs kept as one token.
    mixed_script: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(&DomainLexicon::default())
    }
}

impl TextNormalizer {
    /// Builds a normalizer seeded with `lexicon` and the default stop-word
    /// and tag sets.
    ///
    /// # Panics
    ///
    /// Never panics: the segmenter patterns are compile-time constants.
    #[must_use]
    pub fn new(lexicon: &DomainLexicon) -> Self {
        let mut normalizer = Self {
            lexicon_terms: Vec::new(),
            lexicon_set: HashSet::new(),
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| (*s).to_string()).collect(),
            verbs: DEFAULT_VERBS.iter().map(|s| (*s).to_string()).collect(),
            adjectives: DEFAULT_ADJECTIVES.iter().map(|s| (*s).to_string()).collect(),
            technical: Regex::new(r"[A-Za-z][A-Za-z0-9]*[0-9][A-Za-z0-9]*|[0-9]+[A-Za-z][A-Za-z0-9]*")
                .unwrap(),
            mixed_script: Regex::new(r"[A-Za-z]+[가-힣]+|[가-힣]+[A-Za-z]+").unwrap(),
        };
        normalizer.add_lexicon_terms(lexicon.all_terms());
        normalizer
    }

    /// Adds terms to the protected domain lexicon, effective immediately.
    pub fn add_lexicon_terms<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for term in terms {
            let term = term.into();
            if !term.is_empty() && self.lexicon_set.insert(term.clone()) {
                self.lexicon_terms.push(term);
            }
        }
        // Longest-first keeps span scanning leftmost-longest.
        self.lexicon_terms
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    }

    /// Removes terms from the protected domain lexicon.
    pub fn remove_lexicon_terms<'a, I>(&mut self, terms: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for term in terms {
            if self.lexicon_set.remove(term) {
                self.lexicon_terms.retain(|t| t != term);
            }
        }
    }

    /// Adds words to the stop-word set.
    pub fn add_stop_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words.extend(words.into_iter().map(Into::into));
    }

    /// Removes words from the stop-word set.
    pub fn remove_stop_words<'a, I>(&mut self, words: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for word in words {
            self.stop_words.remove(word);
        }
    }

    /// Current protected-term list, longest first.
    #[must_use]
    pub fn lexicon_terms(&self) -> &[String] {
        &self.lexicon_terms
    }

    /// Segments `text` into tagged tokens (normalization stages 1-4,
    /// before the retention filter).
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<(String, PosTag)> {
        let mut raw: Vec<(String, bool)> = Vec::new();
        let mut cursor = 0;
        for (start, end) in self.protected_spans(text) {
            if cursor < start {
                push_plain_tokens(&text[cursor..start], &mut raw);
            }
            raw.push((text[start..end].to_string(), true));
            cursor = end;
        }
        if cursor < text.len() {
            push_plain_tokens(&text[cursor..], &mut raw);
        }

        raw.into_iter()
            .map(|(token, protected)| {
                let tag = self.tag(&token, protected);
                (token, tag)
            })
            .collect()
    }

    /// Runs the full normalization pipeline over raw text.
    #[must_use]
    pub fn normalize(&self, text: &str) -> NormalizedDocument {
        let tokens = self
            .segment(text)
            .into_iter()
            .filter(|(token, tag)| self.retain(token, *tag))
            .map(|(token, _)| token)
            .collect();
        NormalizedDocument::from_tokens(tokens)
    }

    /// Normalizes an article body, binding the article id to the document.
    ///
    /// An [`newscope_core::ArticleBody::ExtractionFailed`] body normalizes
    /// to an empty token stream.
    #[must_use]
    pub fn normalize_article(&self, article: &Article) -> NormalizedDocument {
        let mut doc = match article.body.as_text() {
            Some(text) => self.normalize(text),
            None => NormalizedDocument::from_tokens(Vec::new()),
        };
        doc.article_id = Some(article.id.clone());
        doc
    }

    /// Non-overlapping protected byte spans.
    ///
    /// Leftmost wins; at the same start a lexicon term beats a pattern
    /// match even when the pattern span is longer, so `SK하이닉스가` yields
    /// the lexicon token `SK하이닉스` with the particle split off rather
    /// than one fused mixed-script token.
    fn protected_spans(&self, text: &str) -> Vec<(usize, usize)> {
        // (start, end, priority): 0 = lexicon, 1 = pattern.
        let mut candidates: Vec<(usize, usize, u8)> = Vec::new();
        for term in &self.lexicon_terms {
            for (start, matched) in text.match_indices(term.as_str()) {
                let end = start + matched.len();
                if latin_boundary_ok(text, start, end) {
                    candidates.push((start, end, 0));
                }
            }
        }
        for m in self.technical.find_iter(text) {
            candidates.push((m.start(), m.end(), 1));
        }
        for m in self.mixed_script.find_iter(text) {
            candidates.push((m.start(), m.end(), 1));
        }

        candidates.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.2.cmp(&b.2))
                .then_with(|| b.1.cmp(&a.1))
        });
        let mut spans = Vec::new();
        let mut cursor = 0;
        for (start, end, _) in candidates {
            if start >= cursor {
                spans.push((start, end));
                cursor = end;
            }
        }
        spans
    }

    fn tag(&self, token: &str, protected: bool) -> PosTag {
        if protected || self.lexicon_set.contains(token) {
            return PosTag::ProperNoun;
        }
        if is_single_ideograph(token) {
            return PosTag::Filler;
        }
        if self.verbs.contains(token) {
            return PosTag::Verb;
        }
        if self.adjectives.contains(token) {
            return PosTag::Adjective;
        }
        PosTag::CommonNoun
    }

    fn retain(&self, token: &str, tag: PosTag) -> bool {
        match tag {
            PosTag::Filler => false,
            // Protected surface forms survive even a stop-listed spelling.
            PosTag::ProperNoun => true,
            PosTag::CommonNoun | PosTag::Verb | PosTag::Adjective => {
                !self.stop_words.contains(token)
            }
        }
    }
}

/// Strips punctuation and digits, collapses whitespace, and appends the
/// surviving chunks as unprotected raw tokens.
fn push_plain_tokens(text: &str, out: &mut Vec<(String, bool)>) {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphabetic() || c.is_whitespace() { c } else { ' ' })
        .collect();
    for chunk in cleaned.split_whitespace() {
        out.push((chunk.to_string(), false));
    }
}

/// Rejects a protected-span candidate glued to adjacent ASCII alphanumerics
/// (prevents `AI` from matching inside `RAID`). Hangul particles attach
/// directly to terms, so non-ASCII neighbors do not block a match.
fn latin_boundary_ok(text: &str, start: usize, end: usize) -> bool {
    let is_word = |c: char| c.is_ascii_alphanumeric();
    let first = text[start..end].chars().next();
    let last = text[start..end].chars().next_back();
    if let (Some(prev), Some(first)) = (text[..start].chars().next_back(), first) {
        if is_word(prev) && is_word(first) {
            return false;
        }
    }
    if let (Some(next), Some(last)) = (text[end..].chars().next(), last) {
        if is_word(last) && is_word(next) {
            return false;
        }
    }
    true
}

fn is_single_ideograph(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ('\u{4E00}'..='\u{9FFF}').contains(&c),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use newscope_core::ArticleBody;

    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::default()
    }

    #[test]
    fn lexicon_term_with_digits_survives_as_single_token() {
        let n = normalizer();
        let doc = n.normalize("SK하이닉스가 HBM3E 양산을 시작했다.");
        assert!(
            doc.tokens.iter().any(|t| t == "HBM3E"),
            "HBM3E must survive digit stripping intact: {:?}",
            doc.tokens
        );
        assert!(doc.tokens.iter().any(|t| t == "SK하이닉스"));
    }

    #[test]
    fn multi_word_lexicon_term_stays_one_token() {
        let n = normalizer();
        let doc = n.normalize("Through Silicon Via 기술이 적용됐다");
        assert!(doc.tokens.iter().any(|t| t == "Through Silicon Via"));
    }

    #[test]
    fn punctuation_and_digits_are_stripped_outside_protected_spans() {
        let n = normalizer();
        let doc = n.normalize("매출 1,000억원을 달성!! (사상 최대)");
        assert!(doc.tokens.iter().all(|t| !t.contains('!')));
        assert!(
            doc.tokens.iter().all(|t| t.chars().any(|c| !c.is_ascii_digit())),
            "bare numbers must not survive: {:?}",
            doc.tokens
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let n = normalizer();
        let first = n.normalize("삼성전자는 HBM3E와 DDR5 개발에 10조원을 투자한다. Through Silicon Via 포함.");
        let rejoined = first.tokens.join(" ");
        let second = n.normalize(&rejoined);
        assert_eq!(first.tokens, second.tokens);
    }

    #[test]
    fn stop_words_are_dropped_and_mutable() {
        let mut n = normalizer();
        let doc = n.normalize("반도체 수요는 증가");
        assert!(doc.tokens.contains(&"반도체".to_string()));
        assert!(!doc.tokens.contains(&"는".to_string()));

        n.add_stop_words(["반도체"]);
        let doc = n.normalize("반도체 수요는 증가");
        assert!(!doc.tokens.contains(&"반도체".to_string()));

        n.remove_stop_words(["반도체"]);
        let doc = n.normalize("반도체 수요는 증가");
        assert!(doc.tokens.contains(&"반도체".to_string()));
    }

    #[test]
    fn lexicon_mutation_takes_effect_without_reinitialization() {
        let mut n = normalizer();
        let before = n.normalize("신제품 GDDR7-X 공개");
        // Hyphen splits the unknown term without protection.
        assert!(!before.tokens.iter().any(|t| t == "GDDR7-X"));

        n.add_lexicon_terms(["GDDR7-X"]);
        let after = n.normalize("신제품 GDDR7-X 공개");
        assert!(after.tokens.iter().any(|t| t == "GDDR7-X"));

        n.remove_lexicon_terms(["GDDR7-X"]);
        let removed = n.normalize("신제품 GDDR7-X 공개");
        assert!(!removed.tokens.iter().any(|t| t == "GDDR7-X"));
    }

    #[test]
    fn single_ideograph_filler_is_dropped() {
        let n = normalizer();
        let doc = n.normalize("美 수출 규제 발표");
        assert!(!doc.tokens.contains(&"美".to_string()));
        assert!(doc.tokens.contains(&"수출".to_string()));
    }

    #[test]
    fn short_lexicon_term_does_not_match_inside_latin_word() {
        let n = normalizer();
        let tokens = n.normalize("RAID 구성 안내").tokens;
        // "AI" is in the lexicon but must not be carved out of "RAID".
        assert!(tokens.contains(&"RAID".to_string()));
        assert!(!tokens.contains(&"AI".to_string()));
    }

    #[test]
    fn lexicon_term_beats_the_mixed_script_pattern_at_the_same_start() {
        let n = normalizer();
        let doc = n.normalize("SK하이닉스가 실적을 발표했다");
        assert!(doc.tokens.iter().any(|t| t == "SK하이닉스"));
        assert!(!doc.tokens.iter().any(|t| t == "SK하이닉스가"));
    }

    #[test]
    fn mixed_script_run_is_one_token() {
        let n = normalizer();
        let doc = n.normalize("올해 메모리Top 업체 발표");
        assert!(doc.tokens.iter().any(|t| t == "메모리Top"));
    }

    #[test]
    fn segment_assigns_tags() {
        let n = normalizer();
        let tags = n.segment("HBM3E 개발을 하다");
        let find = |tok: &str| tags.iter().find(|(t, _)| t == tok).map(|(_, tag)| *tag);
        assert_eq!(find("HBM3E"), Some(PosTag::ProperNoun));
        assert_eq!(find("하다"), Some(PosTag::Verb));
        assert_eq!(find("개발을"), Some(PosTag::CommonNoun));
    }

    #[test]
    fn failed_extraction_normalizes_to_empty_document() {
        let n = normalizer();
        let article = Article::new(
            "sk_hynix",
            "t".into(),
            "https://example.com".into(),
            ArticleBody::ExtractionFailed,
        );
        let doc = n.normalize_article(&article);
        assert!(doc.is_empty());
        assert_eq!(doc.article_id.as_deref(), Some(article.id.as_str()));
    }
}
