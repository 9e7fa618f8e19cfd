//! # mono-effects
//!
//! Monotonic effects for ordinal predictors in Bayesian regression models.
//!
//! An ordinal predictor with `C` ordered categories enters the linear
//! predictor as `b * Σ_{i ≤ min(rank, C-1)} ζ_i`: a single scale `b` gives the
//! direction and size of the effect, and a simplex `ζ` of length `C - 1`
//! distributes it over the steps between adjacent categories. The effect is
//! monotonic by construction while the spacing between categories is learned
//! from the data.
//!
//! ## Core Design Principles
//!
//! - **Fit/Transform Separation**: [`encoding::MonotonicEncoder`] learns the
//!   category order once; the fitted encoder only maps values to ranks and
//!   back, and can be persisted with its parameters.
//! - **Validated Values**: [`simplex::Simplex`] and
//!   [`simplex::MonotonicEffect`] cannot be built from values that break the
//!   simplex invariant.
//! - **Stan as the Sampler**: [`model::ModelBuilder`] emits a Stan program and
//!   its JSON data; posterior draws from CmdStan are read back into
//!   [`posterior::PosteriorDraws`] for summaries and projections.
//!
//! ## Quick Start
//!
//! ```rust
//! use mono_effects::dataset::DataFrame;
//! use mono_effects::model::ModelBuilder;
//! use mono_effects::predictor::Column;
//!
//! let levels = ["below_20", "20_to_40", "40_to_100", "greater_100"];
//! let frame = DataFrame::new()
//!     .with_column("ls", Column::Numeric(vec![30.0, 45.0, 60.0, 62.0]))?
//!     .with_column("income", Column::ordered(&levels, &levels))?;
//!
//! let model = ModelBuilder::new("ls").monotonic("income").build(&frame)?;
//! assert!(model.stan_code().contains("simplex[C_income - 1] simplex_income;"));
//! assert_eq!(model.stan_data()["C_income"], 4);
//! # Ok::<(), mono_effects::MonoError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `predictor` — Column values and predictor kinds
//! - `encoding` — Fitting and applying the category-to-rank mapping
//! - `simplex` — Simplex values and the cumulative monotonic transform
//! - `prior` — Dirichlet priors on the simplex and priors on the scale
//! - `model` — Model description, Stan emission and new-data encoding
//! - `stan` — Stan naming, program text and data layout
//! - `posterior` — CmdStan output, summaries and effect projections
//! - `dataset` — Named columns of equal length
//! - `config` — Family, intercept and interval settings
//! - `serialization` — Parameter persistence

/// Model configuration: family, intercept and interval settings.
pub mod config;

/// Named columns of equal length.
pub mod dataset;

/// Encoders mapping ordinal values to ranks.
pub mod encoding;

pub mod error;

/// Regression models with monotonic terms.
pub mod model;

/// Posterior draws, summaries and effect projections.
pub mod posterior;

pub mod predictor;

/// Priors on the simplex and the scale of a monotonic effect.
pub mod prior;

/// Binary persistence of fitted parameters.
pub mod serialization;

pub mod simplex;

/// Stan program and data emission.
pub mod stan;

pub use error::{MonoError, Result};
pub use predictor::{Column, PredictorKind};
pub use simplex::{mo, MonotonicEffect, Simplex};
