mod ordinal;

pub use ordinal::{to_cmdstan_csv, OrdinalDataset, TrueEffect};
