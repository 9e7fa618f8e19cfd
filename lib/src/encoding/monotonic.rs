//! Monotonic encoder for ordinal predictors.
//!
//! Maps ordered labels or positive integers to ranks `1..=C`.

use crate::encoding::table::{CategoryTable, LevelScale, MAX_CATEGORIES};
use crate::encoding::traits::{Encoder, FittedEncoder};
use crate::error::{MonoError, Result};
use crate::predictor::{Column, PredictorKind};
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Ranks of one column plus the category count they refer to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedColumn {
    /// One rank per observation, each in `[1, n_categories]`.
    pub ranks: Vec<usize>,
    /// Category count `C`.
    pub n_categories: usize,
}

/// Monotonic encoder for one predictor.
///
/// Fitting establishes the category table:
/// - ordered label columns use their declared levels, so `C` counts
///   unobserved levels too;
/// - integer-valued columns use the scale `1..=max`, or `1..=C` when a
///   category count is declared with [`with_n_categories`](Self::with_n_categories).
///
/// # Example
/// ```
/// use mono_effects::encoding::{Encoder, FittedEncoder, MonotonicEncoder};
/// use mono_effects::predictor::Column;
///
/// let levels = ["below_20", "20_to_40", "40_to_100", "greater_100"];
/// let column = Column::ordered(&levels, &["40_to_100", "below_20"]);
///
/// let fitted = MonotonicEncoder::new("income").fit(&column).unwrap();
/// let encoded = fitted.transform(&column).unwrap();
/// assert_eq!(encoded.ranks, vec![3, 1]);
/// assert_eq!(encoded.n_categories, 4);
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicEncoder {
    predictor: String,
    n_categories: Option<usize>,
}

impl MonotonicEncoder {
    /// Create an encoder for the named predictor.
    pub fn new(predictor: impl Into<String>) -> Self {
        Self {
            predictor: predictor.into(),
            n_categories: None,
        }
    }

    /// Declare the category count instead of inferring it from the data.
    pub fn with_n_categories(mut self, n_categories: usize) -> Self {
        self.n_categories = Some(n_categories);
        self
    }

    pub fn predictor(&self) -> &str {
        &self.predictor
    }

    fn invalid_kind(&self, kind: PredictorKind, detail: impl Into<String>) -> MonoError {
        MonoError::InvalidPredictorKind {
            predictor: self.predictor.clone(),
            kind,
            detail: detail.into(),
        }
    }

    fn check_not_degenerate(&self, n_categories: usize) -> Result<()> {
        if n_categories < 2 {
            return Err(MonoError::DegenerateCategory {
                predictor: self.predictor.clone(),
                n_categories,
            });
        }
        Ok(())
    }

    fn not_integral(&self, data: &Column) -> MonoError {
        if data.kind() == PredictorKind::OrderedDiscrete {
            self.invalid_kind(
                PredictorKind::OrderedDiscrete,
                "whole numbers exceed the 64-bit integer range",
            )
        } else {
            self.invalid_kind(PredictorKind::Continuous, "values are not whole numbers")
        }
    }

    fn fit_labels(&self, levels: &[String], values: &[String]) -> Result<CategoryTable> {
        if let Some(declared) = self.n_categories {
            if declared != levels.len() {
                return Err(MonoError::InvalidParameter(format!(
                    "predictor '{}' declares {} categories but its column has {} levels",
                    self.predictor,
                    declared,
                    levels.len()
                )));
            }
        }
        let table = CategoryTable::from_labels(&self.predictor, levels.to_vec())?;
        self.check_not_degenerate(table.len())?;
        for value in values {
            table.rank_of(value)?;
        }
        Ok(table)
    }

    fn fit_integers(&self, values: &[i64]) -> Result<CategoryTable> {
        if let Some(&bad) = values.iter().find(|&&v| v < 1) {
            return Err(self.invalid_kind(
                PredictorKind::OrderedDiscrete,
                format!("integer values must be >= 1, found {}", bad),
            ));
        }
        let max = values.iter().copied().max().unwrap_or(0);
        if max as u64 > MAX_CATEGORIES as u64 {
            return Err(self.invalid_kind(
                PredictorKind::OrderedDiscrete,
                format!(
                    "integer value {} is past the largest supported category {}",
                    max, MAX_CATEGORIES
                ),
            ));
        }
        let max = max as usize;
        let n_categories = self.n_categories.unwrap_or(max);
        let table = CategoryTable::from_integer_range(&self.predictor, n_categories)?;
        self.check_not_degenerate(table.len())?;
        if max > n_categories {
            return Err(MonoError::UnknownCategory {
                predictor: self.predictor.clone(),
                category: max.to_string(),
            });
        }
        Ok(table)
    }
}

/// Serializable parameters for a fitted MonotonicEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonotonicEncoderParams {
    /// Predictor name.
    pub predictor: String,
    /// Ordered levels; rank `i` is `levels[i - 1]`. Empty on the integer
    /// scale.
    pub levels: Vec<String>,
    /// Category count `C`.
    pub n_categories: usize,
    /// How the levels were established.
    pub scale: LevelScale,
}

/// Fitted MonotonicEncoder holding the training-time category table.
#[derive(Clone, Debug)]
pub struct FittedMonotonicEncoder {
    table: CategoryTable,
}

impl FittedMonotonicEncoder {
    pub fn predictor(&self) -> &str {
        self.table.predictor()
    }

    /// Category count `C`.
    pub fn n_categories(&self) -> usize {
        self.table.len()
    }

    /// Ordered levels learned at fit time.
    pub fn levels(&self) -> Cow<'_, [String]> {
        self.table.levels()
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Rank of a single label.
    pub fn rank_of(&self, label: &str) -> Result<usize> {
        self.table.rank_of(label)
    }

    /// Labels for a sequence of ranks.
    pub fn decode(&self, ranks: &[usize]) -> Result<Vec<String>> {
        ranks
            .iter()
            .map(|&r| self.table.label_of(r).map(Cow::into_owned))
            .collect()
    }
}

impl Encoder for MonotonicEncoder {
    type Input = Column;
    type Output = EncodedColumn;
    type Params = MonotonicEncoderParams;
    type Fitted = FittedMonotonicEncoder;

    fn fit(&self, data: &Column) -> Result<FittedMonotonicEncoder> {
        if data.is_empty() {
            return Err(MonoError::EmptyData(format!(
                "cannot fit monotonic encoder for '{}' on an empty column",
                self.predictor
            )));
        }

        let table = match data {
            Column::Unordered(_) => {
                return Err(self.invalid_kind(
                    PredictorKind::UnorderedDiscrete,
                    "labels carry no order; declare levels with an ordered column",
                ))
            }
            Column::Ordered { levels, values } => self.fit_labels(levels, values)?,
            _ => match data.as_integers() {
                Some(values) => self.fit_integers(&values)?,
                None => return Err(self.not_integral(data)),
            },
        };

        debug!(
            "fitted monotonic encoder for '{}': {} categories from {} observations",
            self.predictor,
            table.len(),
            data.len()
        );
        Ok(FittedMonotonicEncoder { table })
    }
}

impl FittedEncoder for FittedMonotonicEncoder {
    type Input = Column;
    type Output = EncodedColumn;
    type Params = MonotonicEncoderParams;

    fn transform(&self, data: &Column) -> Result<EncodedColumn> {
        let invalid = |kind: PredictorKind, detail: &str| MonoError::InvalidPredictorKind {
            predictor: self.predictor().to_string(),
            kind,
            detail: detail.to_string(),
        };

        let ranks = match data {
            Column::Unordered(_) => {
                return Err(invalid(
                    PredictorKind::UnorderedDiscrete,
                    "labels carry no order",
                ))
            }
            Column::Ordered { values, .. } => values
                .iter()
                .map(|v| self.table.rank_of(v))
                .collect::<Result<Vec<_>>>()?,
            _ => match data.as_integers() {
                Some(values) => values
                    .iter()
                    .map(|&v| self.table.rank_of_integer(v))
                    .collect::<Result<Vec<_>>>()?,
                None if data.kind() == PredictorKind::OrderedDiscrete => {
                    return Err(invalid(
                        PredictorKind::OrderedDiscrete,
                        "whole numbers exceed the 64-bit integer range",
                    ))
                }
                None => return Err(invalid(PredictorKind::Continuous, "values are not whole numbers")),
            },
        };

        Ok(EncodedColumn {
            ranks,
            n_categories: self.table.len(),
        })
    }

    fn inverse_transform(&self, data: &EncodedColumn) -> Result<Column> {
        if data.n_categories != self.table.len() {
            return Err(MonoError::LengthMismatch {
                what: format!("category count of '{}'", self.predictor()),
                expected: self.table.len(),
                got: data.n_categories,
            });
        }
        match self.table.scale() {
            LevelScale::Labels => Ok(Column::Ordered {
                levels: self.table.levels().into_owned(),
                values: self.decode(&data.ranks)?,
            }),
            LevelScale::Integers => {
                // Range check through the table so out-of-range ranks fail.
                for &r in &data.ranks {
                    self.table.label_of(r)?;
                }
                Ok(Column::Integer(data.ranks.iter().map(|&r| r as i64).collect()))
            }
        }
    }

    fn extract_params(&self) -> MonotonicEncoderParams {
        let levels = match self.table.scale() {
            LevelScale::Labels => self.table.levels().into_owned(),
            LevelScale::Integers => Vec::new(),
        };
        MonotonicEncoderParams {
            predictor: self.table.predictor().to_string(),
            levels,
            n_categories: self.table.len(),
            scale: self.table.scale(),
        }
    }

    fn from_params(params: MonotonicEncoderParams) -> Result<Self> {
        let table = match params.scale {
            LevelScale::Labels => CategoryTable::from_labels(&params.predictor, params.levels)?,
            LevelScale::Integers => {
                CategoryTable::from_integer_range(&params.predictor, params.n_categories)?
            }
        };
        if table.len() != params.n_categories {
            return Err(MonoError::LengthMismatch {
                what: format!("levels of '{}'", params.predictor),
                expected: params.n_categories,
                got: table.len(),
            });
        }
        if table.len() < 2 {
            return Err(MonoError::DegenerateCategory {
                predictor: params.predictor,
                n_categories: table.len(),
            });
        }
        Ok(Self { table })
    }
}
