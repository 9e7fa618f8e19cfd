//! Named-column data frames.
//!
//! A [`DataFrame`] is the tabular input of model preparation: the response
//! and every monotonic predictor are looked up by name, and all columns share
//! one row count.
//!
//! # Example
//!
//! ```rust
//! use mono_effects::dataset::DataFrame;
//! use mono_effects::predictor::Column;
//!
//! let frame = DataFrame::new()
//!     .with_column("ls", Column::Numeric(vec![30.0, 55.0]))
//!     .unwrap()
//!     .with_column("income", Column::ordered(&["low", "high"], &["low", "high"]))
//!     .unwrap();
//!
//! assert_eq!(frame.n_rows(), 2);
//! assert!(frame.column("income").is_ok());
//! ```

use crate::error::{MonoError, Result};
use crate::predictor::Column;

/// Ordered collection of equally long, uniquely named columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<(String, Column)>,
}

impl DataFrame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// - [`MonoError::InvalidParameter`] if the name is already taken
    /// - [`MonoError::LengthMismatch`] if the row count differs from the
    ///   existing columns
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        self.push(name, column)?;
        Ok(self)
    }

    /// In-place form of [`with_column`](Self::with_column).
    pub fn push(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(MonoError::InvalidParameter(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if let Some((_, first)) = self.columns.first() {
            if first.len() != column.len() {
                return Err(MonoError::LengthMismatch {
                    what: format!("rows of column '{}'", name),
                    expected: first.len(),
                    got: column.len(),
                });
            }
        }
        self.columns.push((name, column));
        Ok(())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| MonoError::MissingColumn(name.to_string()))
    }

    /// Number of rows; zero for a frame without columns.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }
}
