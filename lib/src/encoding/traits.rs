//! Core traits for encoders.
//!
//! This module defines the two central traits:
//! - [`Encoder`]: Used during fitting; carries options and learns a table from data.
//! - [`FittedEncoder`]: After fitting; ready to encode new data and to be persisted.

use crate::error::{MonoError, Result};
use crate::serialization::SerializableParams;

/// Trait for unfitted encoders.
///
/// An encoder learns a category table from training data and can then encode
/// new data against that table. This trait represents the configurable,
/// unfitted state.
///
/// # Example
/// ```ignore
/// use mono_effects::encoding::{Encoder, FittedEncoder, MonotonicEncoder};
///
/// let encoder = MonotonicEncoder::new("income");
/// let fitted = encoder.fit(&train_column)?;
/// let encoded = fitted.transform(&test_column)?;
/// ```
pub trait Encoder: Clone {
    /// Input data type.
    type Input;
    /// Output data type after encoding.
    type Output;
    /// Serializable representation of the learned table.
    type Params: SerializableParams;
    /// The fitted encoder type.
    type Fitted: FittedEncoder<Params = Self::Params, Input = Self::Input, Output = Self::Output>;

    /// Learn the category table from the training data.
    ///
    /// # Errors
    /// Returns [`MonoError`] if the data is empty, of the wrong kind, or
    /// yields a degenerate table.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fit the encoder and encode the training data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted encoders.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `inverse_transform(transform(x))` recovers the labels of `x`.
pub trait FittedEncoder: Clone {
    /// Input data type.
    type Input;
    /// Output data type after encoding.
    type Output;
    /// Serializable representation of the learned table.
    type Params: SerializableParams;

    /// Encode data against the learned table.
    ///
    /// Fails as a whole; no partial output is produced.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Decode encoded data back to the input representation.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input>;

    /// Extract the learned table as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted encoder from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted encoder to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let params = self.extract_params();
        let bytes = params
            .to_bytes()
            .map_err(|e| MonoError::InvalidParameter(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted encoder from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| MonoError::InvalidParameter(format!("corrupt encoder file: {}", e)))?;
        Self::from_params(params)
    }
}
