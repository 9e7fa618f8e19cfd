//! Error types for encoding, model preparation and posterior projections.

use crate::predictor::PredictorKind;
use thiserror::Error;

/// Error type for every fallible operation in the crate.
///
/// The first three variants are the encoding taxonomy: each names the
/// offending predictor and is raised either when a model is built or when new
/// data is encoded with a fitted encoder. None of them is recoverable inside
/// the library; the caller has to fix the data or the model description.
#[derive(Debug, Error)]
pub enum MonoError {
    /// The column is not ordered-discrete (unordered labels, continuous
    /// values, or integers below 1).
    #[error("predictor '{predictor}' cannot be modeled as monotonic: {kind} ({detail})")]
    InvalidPredictorKind {
        predictor: String,
        kind: PredictorKind,
        detail: String,
    },

    /// Fewer than two categories, so no simplex can be formed.
    #[error("predictor '{predictor}' has {n_categories} categories; a monotonic effect needs at least 2")]
    DegenerateCategory {
        predictor: String,
        n_categories: usize,
    },

    /// A label (or rank) absent from the training-time category table.
    #[error("predictor '{predictor}' has unknown category '{category}'")]
    UnknownCategory { predictor: String, category: String },

    /// Empty data provided where non-empty was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// A vector violates the simplex invariant.
    #[error("invalid simplex: {0}")]
    InvalidSimplex(String),

    /// A prior specification is malformed or has the wrong length.
    #[error("invalid prior: {0}")]
    InvalidPrior(String),

    /// Invalid option or argument value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two sequences that must align do not.
    #[error("length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    /// A column referenced by the model is absent from the data frame.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// A parameter expected in the posterior draws is absent.
    #[error("missing parameter '{0}' in posterior draws")]
    MissingParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MonoError>;
