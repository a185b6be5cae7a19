//! End-to-end tests of the analysis pipeline over the public API: a small
//! realistic corpus through normalization, extraction, scoring, and topic
//! modeling.

use newscope_analysis::{
    keywords, AnalysisOrchestrator, DomainLexicon, SentimentScorer, TextNormalizer, TopicModel,
};
use newscope_core::{Article, ArticleBody, NormalizedDocument};

fn article(url: &str, body: &str) -> Article {
    Article::new(
        "naver",
        format!("기사 {url}"),
        format!("https://news.example.com/{url}"),
        ArticleBody::Extracted(body.to_string()),
    )
}

fn corpus() -> Vec<Article> {
    vec![
        article("1", "SK하이닉스가 HBM3E 양산 확대를 발표했다. 메모리 수요 성장."),
        article("2", "삼성전자, HBM3E 공급 계약 체결. 메모리 시장 회복 조짐."),
        article("3", "파운드리 공정 수율 부진 우려. 양산 일정 지연."),
        article("4", "파운드리 투자 확대, 신규 공정 개발 착수."),
    ]
}

fn normalized(articles: &[Article], normalizer: &TextNormalizer) -> Vec<NormalizedDocument> {
    articles
        .iter()
        .map(|a| normalizer.normalize_article(a))
        .collect()
}

#[test]
fn lexicon_terms_survive_into_extracted_keywords() {
    let articles = corpus();
    let normalizer = TextNormalizer::new(&DomainLexicon::default());
    let docs = normalized(&articles, &normalizer);

    // Every document keeps its protected technical terms intact.
    assert!(docs[0].tokens.iter().any(|t| t == "HBM3E"));
    assert!(docs[0].tokens.iter().any(|t| t == "SK하이닉스"));

    let ranked = keywords::top_by_tfidf(&docs, 20);
    assert!(
        ranked.iter().any(|(term, _)| term == "HBM3E"),
        "HBM3E should rank among keywords: {ranked:?}"
    );
}

#[test]
fn fixed_vocabulary_reporting_covers_the_domain_lexicon() {
    let articles = corpus();
    let normalizer = TextNormalizer::new(&DomainLexicon::default());
    let docs = normalized(&articles, &normalizer);

    let vocabulary = DomainLexicon::default().all_terms();
    let frequency = keywords::term_document_frequency(&docs, &vocabulary);
    let hbm3e = frequency
        .iter()
        .find(|(term, _)| term == "HBM3E")
        .expect("HBM3E is in the default lexicon");
    assert_eq!(hbm3e.1, 2);

    let matrix = keywords::cooccurrence_matrix(&docs, &vocabulary);
    assert_eq!(matrix.count_for("HBM3E", "SK하이닉스"), Some(1));
}

#[test]
fn corpus_stats_and_ngrams_report_over_retained_tokens() {
    let articles = corpus();
    let normalizer = TextNormalizer::new(&DomainLexicon::default());
    let docs = normalized(&articles, &normalizer);

    let stats = keywords::corpus_stats(&docs);
    assert_eq!(stats.document_count, 4);
    assert!(stats.token_count > 0);
    assert!(stats.unique_token_count <= stats.token_count);

    let bigrams = keywords::top_ngrams(&docs, 2, 10);
    assert!(!bigrams.is_empty());
}

#[test]
fn sentiment_distribution_reflects_polarity_mix() {
    let articles = corpus();
    let normalizer = TextNormalizer::new(&DomainLexicon::default());
    let docs = normalized(&articles, &normalizer);

    let dist = SentimentScorer::default().score(&docs).unwrap();
    assert!(dist.is_valid());
    // Documents 1/2/4 carry positive signals; document 3 negative ones.
    assert!(dist.positive > 0.0);
    assert!(dist.negative > 0.0);
}

#[test]
fn repeated_topic_training_is_bit_reproducible() {
    let articles = corpus();
    let normalizer = TextNormalizer::new(&DomainLexicon::default());
    let docs = normalized(&articles, &normalizer);

    let run = || {
        let mut model = TopicModel::default();
        model.prepare(&docs).unwrap();
        model.train(2, 15).unwrap();
        model.topics(8).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn orchestrator_produces_one_immutable_result_per_run() {
    let articles = corpus();
    let orchestrator = AnalysisOrchestrator::default();

    let result = orchestrator.analyze(&articles).unwrap();
    assert_eq!(result.article_ids.len(), 4);
    assert_eq!(result.topics.len(), 3);
    assert!(result.sentiment.is_valid());

    // Two runs are independent records.
    let second = orchestrator.analyze(&articles).unwrap();
    assert_ne!(result.id, second.id);
    assert_eq!(result.article_ids, second.article_ids);
}
