//! Typed failures for the analysis pipeline.

use std::fmt;

use thiserror::Error;

/// The pipeline stage an orchestration failure originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Keywords,
    Sentiment,
    Topics,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Normalize => "normalize",
            Stage::Keywords => "keywords",
            Stage::Sentiment => "sentiment",
            Stage::Topics => "topics",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the analysis pipeline.
///
/// Invalid-input variants are rejected before any work begins; invalid-state
/// variants are fatal to the analysis call that violated the precondition.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The orchestrator was handed an empty article set.
    #[error("empty input: analysis requires at least one article")]
    EmptyInput,

    /// Sentiment scoring was handed an empty document set.
    #[error("empty document set: sentiment scoring requires at least one document")]
    EmptyDocumentSet,

    /// Corpus preparation produced no usable dictionary or encoding
    /// (every document normalized to nothing, or pruning removed all terms).
    #[error("empty corpus after normalization: nothing to model")]
    EmptyCorpus,

    /// An operation was called out of order on the topic model.
    #[error("invalid state: {operation} requires a {required} model")]
    InvalidState {
        operation: &'static str,
        required: &'static str,
    },

    /// `train` was called with zero topics or zero passes.
    #[error("invalid training parameters: {0}")]
    InvalidParameters(String),

    /// A stage of the orchestrated pipeline failed; nothing was committed.
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Wraps an error with the pipeline stage it occurred in.
    #[must_use]
    pub fn in_stage(self, stage: Stage) -> Self {
        AnalysisError::Stage {
            stage,
            source: Box::new(self),
        }
    }
}
