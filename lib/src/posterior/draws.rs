//! Storage of posterior draws.

use crate::error::{MonoError, Result};
use crate::stan::names;
use csv::ReaderBuilder;
use log::debug;
use ndarray::{Array2, ArrayView1, Axis};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Immutable collection of posterior draws.
///
/// Rows are draws, columns are parameters. Chains are stacked in order, each
/// contributing [`draws_per_chain`](Self::draws_per_chain) consecutive rows.
#[derive(Clone, Debug)]
pub struct PosteriorDraws {
    names: Vec<String>,
    index: HashMap<String, usize>,
    values: Array2<f64>,
    n_chains: usize,
}

impl PosteriorDraws {
    /// Build from `samples[chain][draw][param]`.
    pub fn from_chains(names: Vec<String>, samples: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        if samples.is_empty() || samples[0].is_empty() {
            return Err(MonoError::EmptyData(
                "posterior needs at least one chain with one draw".to_string(),
            ));
        }
        let per_chain = samples[0].len();
        let n_params = names.len();
        let mut flat = Vec::with_capacity(samples.len() * per_chain * n_params);
        for (c, chain) in samples.iter().enumerate() {
            if chain.len() != per_chain {
                return Err(MonoError::LengthMismatch {
                    what: format!("draws in chain {}", c + 1),
                    expected: per_chain,
                    got: chain.len(),
                });
            }
            for draw in chain {
                if draw.len() != n_params {
                    return Err(MonoError::LengthMismatch {
                        what: format!("parameters per draw in chain {}", c + 1),
                        expected: n_params,
                        got: draw.len(),
                    });
                }
                flat.extend_from_slice(draw);
            }
        }
        let values = Array2::from_shape_vec((samples.len() * per_chain, n_params), flat)
            .map_err(|e| MonoError::InvalidParameter(e.to_string()))?;
        Self::from_matrix(names, values, samples.len())
    }

    /// Build from a `(draws, params)` matrix holding `n_chains` equal-length
    /// chains stacked in order.
    pub fn from_matrix(names: Vec<String>, values: Array2<f64>, n_chains: usize) -> Result<Self> {
        if values.ncols() != names.len() {
            return Err(MonoError::LengthMismatch {
                what: "parameter names".to_string(),
                expected: values.ncols(),
                got: names.len(),
            });
        }
        if n_chains == 0 || values.nrows() == 0 || values.nrows() % n_chains != 0 {
            return Err(MonoError::InvalidParameter(format!(
                "{} draws cannot be split into {} equal chains",
                values.nrows(),
                n_chains
            )));
        }
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(MonoError::InvalidParameter(format!(
                    "duplicate parameter '{}'",
                    name
                )));
            }
        }
        Ok(Self {
            names,
            index,
            values,
            n_chains,
        })
    }

    /// Read one chain from CmdStan CSV output.
    ///
    /// Comment lines (`#`) are skipped, sampler columns ending in `__` are
    /// dropped and indexed headers are normalized (`simplex_x.2` becomes
    /// `simplex_x[2]`).
    pub fn from_cmdstan_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_cmdstan_readers(vec![reader])
    }

    /// Read several chains, one reader per chain. All chains must have the
    /// same columns and draw count.
    pub fn from_cmdstan_readers<R: Read>(readers: Vec<R>) -> Result<Self> {
        let mut names: Option<Vec<String>> = None;
        let mut chains = Vec::with_capacity(readers.len());
        for (c, reader) in readers.into_iter().enumerate() {
            let (chain_names, draws) = read_cmdstan_chain(reader)?;
            match &names {
                None => names = Some(chain_names),
                Some(first) if *first != chain_names => {
                    return Err(MonoError::InvalidParameter(format!(
                        "chain {} has different columns than chain 1",
                        c + 1
                    )))
                }
                Some(_) => {}
            }
            chains.push(draws);
        }
        let names = names.ok_or_else(|| MonoError::EmptyData("no chains given".to_string()))?;
        debug!(
            "read {} chain(s) with {} parameters from CmdStan output",
            chains.len(),
            names.len()
        );
        Self::from_chains(names, chains)
    }

    /// Read CmdStan CSV files, one file per chain.
    pub fn from_cmdstan_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let readers = paths
            .iter()
            .map(|p| File::open(p).map(BufReader::new))
            .collect::<std::io::Result<Vec<_>>>()?;
        Self::from_cmdstan_readers(readers)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_params(&self) -> usize {
        self.names.len()
    }

    /// Total number of draws across chains.
    pub fn n_draws(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_chains(&self) -> usize {
        self.n_chains
    }

    pub fn draws_per_chain(&self) -> usize {
        self.values.nrows() / self.n_chains
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All draws of one parameter.
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let &j = self
            .index
            .get(name)
            .ok_or_else(|| MonoError::MissingParameter(name.to_string()))?;
        Ok(self.values.column(j))
    }

    /// Draws of one parameter split by chain.
    pub fn chains_of(&self, name: &str) -> Result<Vec<Vec<f64>>> {
        let column = self.column(name)?;
        let per_chain = self.draws_per_chain();
        Ok(column
            .axis_chunks_iter(Axis(0), per_chain)
            .map(|chunk| chunk.to_vec())
            .collect())
    }
}

fn read_cmdstan_chain<R: Read>(reader: R) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
    let mut rdr = ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let keep: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !names::is_sampler_column(h))
        .map(|(i, _)| i)
        .collect();
    let chain_names: Vec<String> = keep
        .iter()
        .map(|&i| names::normalize_cmdstan_name(&headers[i]))
        .collect();

    let mut draws = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let mut draw = Vec::with_capacity(keep.len());
        for &i in &keep {
            let field = record.get(i).unwrap_or_default();
            let value: f64 = field.parse().map_err(|_| {
                MonoError::InvalidParameter(format!(
                    "draw {}: column '{}' holds non-numeric value '{}'",
                    row + 1,
                    &headers[i],
                    field
                ))
            })?;
            draw.push(value);
        }
        draws.push(draw);
    }
    Ok((chain_names, draws))
}
