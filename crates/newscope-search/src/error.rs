//! Aggregator-level query validation errors.

use thiserror::Error;

/// Invalid-input failures rejected before any source is contacted.
///
/// Per-source failures never surface here; they are logged and yield zero
/// items from the failing source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The query named no sources at all.
    #[error("query names no sources")]
    EmptySources,

    /// The query named a source with no registered adapter.
    #[error("unknown source '{0}': no adapter registered under that name")]
    UnknownSource(String),

    /// `max_results` must be at least 1.
    #[error("max_results must be at least 1")]
    ZeroMaxResults,
}
