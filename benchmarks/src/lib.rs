//! Benchmark utilities for mono-effects.
//!
//! - Synthetic ordinal datasets with a known monotonic effect
//! - Synthetic posterior draws and their CmdStan CSV rendering
//! - Timing helpers for the standalone report binary

pub mod data;
pub mod utils;

pub use data::{OrdinalDataset, TrueEffect};
pub use utils::{time_fn, BenchmarkStats};
