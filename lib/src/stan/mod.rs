//! Stan program and data emission.
//!
//! - [`codegen`]: program text with the `mo` function and one block per term
//! - [`data`]: the JSON data document CmdStan reads with `data file=...`
//! - [`names`]: reporting names and CmdStan header normalization

pub mod codegen;
pub mod data;
pub mod names;
