//! Typed predictor columns and their kind tag.
//!
//! A column's [`PredictorKind`] is inferred once, from the variant and its
//! values, and every encoder decision is taken against that tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of predictor kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictorKind {
    /// Ordered labels or integer-valued data; eligible for a monotonic effect.
    OrderedDiscrete,
    /// Labels without an order.
    UnorderedDiscrete,
    /// Real-valued data with non-integer values.
    Continuous,
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictorKind::OrderedDiscrete => write!(f, "ordered-discrete"),
            PredictorKind::UnorderedDiscrete => write!(f, "unordered-discrete"),
            PredictorKind::Continuous => write!(f, "continuous"),
        }
    }
}

/// A single data column.
///
/// # Example
/// ```
/// use mono_effects::predictor::{Column, PredictorKind};
///
/// let income = Column::ordered(
///     &["below_20", "20_to_40", "40_to_100", "greater_100"],
///     &["20_to_40", "below_20", "greater_100"],
/// );
/// assert_eq!(income.kind(), PredictorKind::OrderedDiscrete);
/// assert_eq!(income.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Labels with a declared order; `levels` may include unobserved labels.
    Ordered {
        levels: Vec<String>,
        values: Vec<String>,
    },
    /// Labels without an order.
    Unordered(Vec<String>),
    /// Integer values.
    Integer(Vec<i64>),
    /// Real values.
    Numeric(Vec<f64>),
}

// 2^63; `i64::MAX as f64` rounds up to this value.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Column {
    /// Build an ordered column from string slices.
    pub fn ordered<S: AsRef<str>>(levels: &[S], values: &[S]) -> Self {
        Column::Ordered {
            levels: levels.iter().map(|s| s.as_ref().to_string()).collect(),
            values: values.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Build an unordered column from string slices.
    pub fn unordered<S: AsRef<str>>(values: &[S]) -> Self {
        Column::Unordered(values.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        match self {
            Column::Ordered { values, .. } => values.len(),
            Column::Unordered(values) => values.len(),
            Column::Integer(values) => values.len(),
            Column::Numeric(values) => values.len(),
        }
    }

    /// Whether the column holds no observations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Infer the kind tag for this column.
    ///
    /// Numeric columns count as ordered-discrete when every value is a finite
    /// whole number.
    pub fn kind(&self) -> PredictorKind {
        match self {
            Column::Ordered { .. } | Column::Integer(_) => PredictorKind::OrderedDiscrete,
            Column::Unordered(_) => PredictorKind::UnorderedDiscrete,
            Column::Numeric(values) => {
                if values.iter().all(|v| v.is_finite() && v.fract() == 0.0) {
                    PredictorKind::OrderedDiscrete
                } else {
                    PredictorKind::Continuous
                }
            }
        }
    }

    /// Integer view of an integer-valued column, `None` for label columns,
    /// non-integral numerics, or whole numbers outside the `i64` range.
    pub fn as_integers(&self) -> Option<Vec<i64>> {
        match self {
            Column::Integer(values) => Some(values.clone()),
            Column::Numeric(values) if self.kind() == PredictorKind::OrderedDiscrete => values
                .iter()
                .map(|&v| (-I64_BOUND..I64_BOUND).contains(&v).then(|| v as i64))
                .collect(),
            _ => None,
        }
    }

    /// Real view of a numeric column, `None` for label columns.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            Column::Integer(values) => Some(values.iter().map(|&v| v as f64).collect()),
            Column::Numeric(values) => Some(values.clone()),
            _ => None,
        }
    }
}
