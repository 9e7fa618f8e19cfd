//! Monotonic encoding of ordinal predictors.
//!
//! An ordinal column is turned into the two inputs a monotonic term needs:
//! one rank per observation in `[1, C]` and the category count `C`.
//!
//! ```ignore
//! // levels: below_20 < 20_to_40 < 40_to_100 < greater_100
//! // values: [40_to_100, below_20]  ->  ranks [3, 1], C = 4
//! ```
//!
//! # Design Notes
//!
//! The category table is fixed by [`MonotonicEncoder::fit`] and never grows:
//! encoding held-out data only looks labels up, and a label outside the
//! table is an [`UnknownCategory`](crate::MonoError::UnknownCategory) error.

mod monotonic;
mod table;
mod traits;

pub use monotonic::{
    EncodedColumn, FittedMonotonicEncoder, MonotonicEncoder, MonotonicEncoderParams,
};
pub use table::{CategoryTable, LevelScale};
pub use traits::{Encoder, FittedEncoder};
