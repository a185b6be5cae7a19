//! Keyword-search API adapters and the cross-source aggregator.
//!
//! The Naver News Open API and Google Custom Search clients implement
//! [`newscope_core::SourceAdapter`]; [`SearchAggregator`] fans a query out
//! across every registered adapter, isolates per-source failures, and merges
//! the results into one date-ordered list.

pub mod aggregator;
pub mod error;
pub mod google;
pub mod naver;

pub use aggregator::SearchAggregator;
pub use error::SearchError;
pub use google::GoogleCseClient;
pub use naver::NaverNewsClient;
