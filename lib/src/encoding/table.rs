//! Category-to-rank lookup table.

use crate::error::{MonoError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// How the levels of a table were established.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelScale {
    /// Declared ordered labels.
    Labels,
    /// The integer scale `1..=C`; the rank of value `v` is `v`.
    Integers,
}

/// Largest category count a table accepts.
///
/// Every term carries a Dirichlet concentration of length `C - 1` and Stan
/// indexes categories with 32-bit integers.
pub const MAX_CATEGORIES: usize = 1_000_000;

#[derive(Clone, Debug)]
enum Levels {
    Labels {
        levels: Vec<String>,
        index: HashMap<String, usize>,
    },
    Integers(usize),
}

/// Fixed, ordered mapping between category labels and ranks `1..=C`.
///
/// The integer scale stores only `C`; its labels are the decimal ranks.
#[derive(Clone, Debug)]
pub struct CategoryTable {
    predictor: String,
    levels: Levels,
}

impl CategoryTable {
    /// Build a table from ordered labels.
    ///
    /// Duplicate labels make the ordering ambiguous and are rejected.
    pub fn from_labels(predictor: &str, levels: Vec<String>) -> Result<Self> {
        check_count(predictor, levels.len())?;
        let mut index = HashMap::with_capacity(levels.len());
        for (pos, level) in levels.iter().enumerate() {
            if index.insert(level.clone(), pos + 1).is_some() {
                return Err(MonoError::InvalidParameter(format!(
                    "predictor '{}' declares level '{}' more than once",
                    predictor, level
                )));
            }
        }
        Ok(Self {
            predictor: predictor.to_string(),
            levels: Levels::Labels { levels, index },
        })
    }

    /// Build the integer table `1..=n_categories`.
    ///
    /// # Errors
    /// `InvalidParameter` when `n_categories` exceeds [`MAX_CATEGORIES`].
    pub fn from_integer_range(predictor: &str, n_categories: usize) -> Result<Self> {
        check_count(predictor, n_categories)?;
        Ok(Self {
            predictor: predictor.to_string(),
            levels: Levels::Integers(n_categories),
        })
    }

    pub fn predictor(&self) -> &str {
        &self.predictor
    }

    /// Ordered labels; built on demand for the integer scale.
    pub fn levels(&self) -> Cow<'_, [String]> {
        match &self.levels {
            Levels::Labels { levels, .. } => Cow::Borrowed(levels.as_slice()),
            Levels::Integers(n) => Cow::Owned((1..=*n).map(|v| v.to_string()).collect()),
        }
    }

    pub fn scale(&self) -> LevelScale {
        match self.levels {
            Levels::Labels { .. } => LevelScale::Labels,
            Levels::Integers(_) => LevelScale::Integers,
        }
    }

    /// Number of categories `C`.
    pub fn len(&self) -> usize {
        match &self.levels {
            Levels::Labels { levels, .. } => levels.len(),
            Levels::Integers(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rank of a label.
    pub fn rank_of(&self, label: &str) -> Result<usize> {
        match &self.levels {
            Levels::Labels { index, .. } => {
                index.get(label).copied().ok_or_else(|| self.unknown(label))
            }
            Levels::Integers(_) => match label.parse::<i64>() {
                Ok(value) => self.rank_of_integer(value),
                Err(_) => Err(self.unknown(label)),
            },
        }
    }

    /// Rank of an integer value.
    ///
    /// On the integer scale this is a range check; on a label table the value
    /// is looked up by its decimal label.
    pub fn rank_of_integer(&self, value: i64) -> Result<usize> {
        match &self.levels {
            Levels::Integers(n) => {
                if value >= 1 && (value as u64) <= *n as u64 {
                    Ok(value as usize)
                } else {
                    Err(self.unknown(&value.to_string()))
                }
            }
            Levels::Labels { .. } => self.rank_of(&value.to_string()),
        }
    }

    /// Label of a rank.
    pub fn label_of(&self, rank: usize) -> Result<Cow<'_, str>> {
        if rank == 0 || rank > self.len() {
            return Err(MonoError::UnknownCategory {
                predictor: self.predictor.clone(),
                category: format!("rank {}", rank),
            });
        }
        Ok(match &self.levels {
            Levels::Labels { levels, .. } => Cow::Borrowed(levels[rank - 1].as_str()),
            Levels::Integers(_) => Cow::Owned(rank.to_string()),
        })
    }

    fn unknown(&self, label: &str) -> MonoError {
        MonoError::UnknownCategory {
            predictor: self.predictor.clone(),
            category: label.to_string(),
        }
    }
}

fn check_count(predictor: &str, n_categories: usize) -> Result<()> {
    if n_categories > MAX_CATEGORIES {
        return Err(MonoError::InvalidParameter(format!(
            "predictor '{}' has {} categories, more than the supported {}",
            predictor, n_categories, MAX_CATEGORIES
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income_levels() -> Vec<String> {
        ["below_20", "20_to_40", "40_to_100", "greater_100"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_label_table_ranks_follow_order() {
        let table = CategoryTable::from_labels("income", income_levels()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rank_of("below_20").unwrap(), 1);
        assert_eq!(table.rank_of("greater_100").unwrap(), 4);
        assert_eq!(table.label_of(2).unwrap(), "20_to_40");
    }

    #[test]
    fn test_label_table_unknown() {
        let table = CategoryTable::from_labels("income", income_levels()).unwrap();
        assert!(matches!(
            table.rank_of("huge"),
            Err(MonoError::UnknownCategory { .. })
        ));
        assert!(table.label_of(0).is_err());
        assert!(table.label_of(5).is_err());
    }

    #[test]
    fn test_duplicate_levels_rejected() {
        let levels = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert!(matches!(
            CategoryTable::from_labels("x", levels),
            Err(MonoError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_integer_table() {
        let table = CategoryTable::from_integer_range("dose", 5).unwrap();
        assert_eq!(table.scale(), LevelScale::Integers);
        assert_eq!(table.rank_of_integer(3).unwrap(), 3);
        assert_eq!(table.rank_of("5").unwrap(), 5);
        assert!(table.rank_of_integer(0).is_err());
        assert!(table.rank_of_integer(6).is_err());
        assert!(table.rank_of_integer(-2).is_err());
    }

    #[test]
    fn test_integer_lookup_on_label_table() {
        let levels = vec!["1".to_string(), "2".to_string(), "10".to_string()];
        let table = CategoryTable::from_labels("grade", levels).unwrap();
        assert_eq!(table.rank_of_integer(10).unwrap(), 3);
        assert!(table.rank_of_integer(3).is_err());
    }

    #[test]
    fn test_integer_table_stores_only_count() {
        let table = CategoryTable::from_integer_range("dose", MAX_CATEGORIES).unwrap();
        assert_eq!(table.len(), MAX_CATEGORIES);
        assert_eq!(table.label_of(MAX_CATEGORIES).unwrap(), MAX_CATEGORIES.to_string());
        assert_eq!(table.rank_of_integer(999_999).unwrap(), 999_999);
        assert!(table.rank_of("many").is_err());
    }

    #[test]
    fn test_category_count_bound() {
        assert!(matches!(
            CategoryTable::from_integer_range("dose", usize::MAX),
            Err(MonoError::InvalidParameter(_))
        ));
        assert!(matches!(
            CategoryTable::from_integer_range("dose", MAX_CATEGORIES + 1),
            Err(MonoError::InvalidParameter(_))
        ));
    }
}
