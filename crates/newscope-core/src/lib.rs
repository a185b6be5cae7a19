//! Shared domain types and contracts for the Newscope collection and
//! analysis pipeline.
//!
//! Everything that crosses a crate boundary lives here: the [`Article`]
//! record produced by source adapters, the [`SourceAdapter`] capability
//! trait the aggregator iterates over, environment-driven application
//! configuration, and the JSON export side-channel for offline inspection
//! of collected result sets.

pub mod app_config;
pub mod config;
pub mod export;
pub mod source;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use export::{export_search_results, ExportError, ExportRecord};
pub use source::{SourceAdapter, SourceError};
pub use types::{
    AnalysisResult, Article, ArticleBody, CorpusStats, KeywordSet, NormalizedDocument,
    RecencyWindow, SearchQuery, SentimentDistribution, Topic,
};
