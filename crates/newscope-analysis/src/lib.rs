//! Text analytics over collected article corpora.
//!
//! Pipeline stages: lexicon-aware normalization into token streams, keyword
//! and n-gram extraction, lexicon-based sentiment scoring, and seeded LDA
//! topic modeling with per-partition model instances. The
//! [`AnalysisOrchestrator`] sequences the stages into one
//! [`newscope_core::AnalysisResult`].

pub mod error;
pub mod keywords;
pub mod lexicon;
pub mod normalize;
pub mod orchestrator;
pub mod sentiment;
pub mod topic;

pub use error::{AnalysisError, Stage};
pub use lexicon::DomainLexicon;
pub use normalize::{PosTag, TextNormalizer};
pub use orchestrator::AnalysisOrchestrator;
pub use sentiment::SentimentScorer;
pub use topic::{ModelFit, PartitionedTopicModels, TopicModel, TopicModelConfig};
