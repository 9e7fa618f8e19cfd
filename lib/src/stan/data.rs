//! Stan data document.

use crate::config::Family;
use crate::encoding::EncodedColumn;
use crate::error::{MonoError, Result};
use crate::model::MonotonicTerm;
use crate::stan::names;
use serde_json::{json, Map, Value};

/// Assemble the data object for `terms`, whose ranks are `encoded` in the
/// same order.
pub fn build(
    y: &[f64],
    terms: &[MonotonicTerm],
    encoded: &[EncodedColumn],
    family: Family,
) -> Result<Value> {
    if terms.len() != encoded.len() {
        return Err(MonoError::LengthMismatch {
            what: "encoded columns".to_string(),
            expected: terms.len(),
            got: encoded.len(),
        });
    }

    let mut data = Map::new();
    data.insert("N".to_string(), json!(y.len()));
    let response = if family.integer_response() {
        json!(y.iter().map(|&v| v as i32).collect::<Vec<_>>())
    } else {
        json!(y)
    };
    data.insert("Y".to_string(), response);

    for (term, column) in terms.iter().zip(encoded) {
        if column.ranks.len() != y.len() {
            return Err(MonoError::LengthMismatch {
                what: format!("ranks of '{}'", term.predictor()),
                expected: y.len(),
                got: column.ranks.len(),
            });
        }
        let ident = term.ident();
        data.insert(names::count_name(ident), json!(column.n_categories));
        data.insert(names::rank_name(ident), json!(column.ranks));
        data.insert(
            names::concentration_name(ident),
            json!(term.dirichlet().concentration()),
        );
    }

    Ok(Value::Object(data))
}
