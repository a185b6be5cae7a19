//! Core data model: articles, queries, and analysis outputs.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Body text of a collected article.
///
/// Extraction failure is recorded as data rather than dropping the article,
/// so callers can distinguish "no content available" from "article not found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ArticleBody {
    /// Successfully extracted body text (may be a search-API snippet).
    Extracted(String),
    /// The content container never appeared or extraction timed out.
    ExtractionFailed,
}

impl ArticleBody {
    /// Returns the extracted text, or `None` for the failure sentinel.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArticleBody::Extracted(text) => Some(text.as_str()),
            ArticleBody::ExtractionFailed => None,
        }
    }

    /// True when extraction failed for this article.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, ArticleBody::ExtractionFailed)
    }
}

/// One collected news article.
///
/// Created by a source adapter and immutable afterwards, except that an
/// extraction retry may backfill `body`. The `id` is derived from
/// `(source, url)` so it is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    /// Registered name of the source adapter that produced this article.
    pub source: String,
    pub title: String,
    pub url: String,
    pub body: ArticleBody,
    pub published_at: Option<DateTime<Utc>>,
    pub collected_at: DateTime<Utc>,
    /// Free-form provider metadata (raw snippet, category, unparsed dates).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Article {
    /// Creates an article stamped with the current collection time.
    #[must_use]
    pub fn new(source: &str, title: String, url: String, body: ArticleBody) -> Self {
        Self {
            id: Self::id_for(source, &url),
            source: source.to_string(),
            title,
            url,
            body,
            published_at: None,
            collected_at: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }

    /// Backfills the body after a successful extraction retry.
    ///
    /// The only mutation permitted after collection: an
    /// [`ArticleBody::ExtractionFailed`] sentinel may be replaced with
    /// extracted text. A body that already extracted is left untouched.
    pub fn backfill_body(&mut self, text: String) {
        if self.body.is_failed() {
            self.body = ArticleBody::Extracted(text);
        }
    }

    /// Stable identifier for a `(source, url)` pair: the first 16 hex chars
    /// of `sha256(source ‖ '\n' ‖ url)`.
    #[must_use]
    pub fn id_for(source: &str, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(b"\n");
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();
        digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
    }
}

/// Bound on how old returned results may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyWindow {
    Day,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl RecencyWindow {
    /// The `dateRestrict` code understood by the Google Custom Search API.
    #[must_use]
    pub fn google_date_restrict(self) -> &'static str {
        match self {
            RecencyWindow::Day => "d1",
            RecencyWindow::Week => "w1",
            RecencyWindow::Month => "m1",
            RecencyWindow::Quarter => "m3",
            RecencyWindow::HalfYear => "m6",
            RecencyWindow::Year => "y1",
        }
    }

    /// Earliest publication instant still inside the window, relative to `now`.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            RecencyWindow::Day => 1,
            RecencyWindow::Week => 7,
            RecencyWindow::Month => 30,
            RecencyWindow::Quarter => 90,
            RecencyWindow::HalfYear => 182,
            RecencyWindow::Year => 365,
        };
        now - Duration::days(days)
    }

    /// Whether `published` falls inside the window ending at `now`.
    #[must_use]
    pub fn contains(self, now: DateTime<Utc>, published: DateTime<Utc>) -> bool {
        published >= self.cutoff(now)
    }
}

impl FromStr for RecencyWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(RecencyWindow::Day),
            "week" => Ok(RecencyWindow::Week),
            "month" => Ok(RecencyWindow::Month),
            "quarter" => Ok(RecencyWindow::Quarter),
            "half-year" => Ok(RecencyWindow::HalfYear),
            "year" => Ok(RecencyWindow::Year),
            other => Err(format!(
                "unknown recency window '{other}' (expected day|week|month|quarter|half-year|year)"
            )),
        }
    }
}

/// A search request fanned out across one or more registered sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
    pub max_results: usize,
    pub recency: Option<RecencyWindow>,
    /// Names of the adapters to query; must be a non-empty subset of the
    /// registered adapter set.
    pub sources: Vec<String>,
}

/// The ordered token sequence remaining after normalization.
///
/// Derived from an article body, recomputed on demand, never persisted
/// independently of its source article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Id of the source article, when normalization started from one.
    pub article_id: Option<String>,
    pub tokens: Vec<String>,
}

impl NormalizedDocument {
    #[must_use]
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self {
            article_id: None,
            tokens,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Ranked term → importance mapping. Scores are non-negative and need not
/// sum to 1.
pub type KeywordSet = Vec<(String, f64)>;

/// Proportions of documents classified positive / neutral / negative.
///
/// Invariant: each proportion is in `[0, 1]` and the three sum to 1.0
/// within floating tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentDistribution {
    /// Checks the distribution invariant.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let in_range =
            |p: f64| (0.0..=1.0).contains(&p);
        in_range(self.positive)
            && in_range(self.neutral)
            && in_range(self.negative)
            && ((self.positive + self.neutral + self.negative) - 1.0).abs() < 1e-9
    }
}

/// One inferred topic: an id stable within its trained model and the topic's
/// terms sorted by descending weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: usize,
    pub terms: Vec<(String, f64)>,
}

/// Aggregate statistics over a normalized document set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub document_count: usize,
    pub token_count: usize,
    pub unique_token_count: usize,
}

/// The assembled output of one analysis run. Created once per orchestration
/// run and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    /// Ids of the articles the analysis was computed over.
    pub article_ids: Vec<String>,
    pub keywords: KeywordSet,
    pub sentiment: SentimentDistribution,
    pub topics: Vec<Topic>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    #[must_use]
    pub fn new(
        article_ids: Vec<String>,
        keywords: KeywordSet,
        sentiment: SentimentDistribution,
        topics: Vec<Topic>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            article_ids,
            keywords,
            sentiment,
            topics,
            created_at: Utc::now(),
        }
    }
}
