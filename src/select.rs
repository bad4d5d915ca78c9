//! Variable subsetting and relabeling
//!
//! Builds a trimmed dataset carrying a station label and only the wanted
//! variables, with the auxiliary `number` variable dropped.

use crate::dataset::Dataset;
use crate::errors::{AnomVisError, Result};

/// Subset a dataset to `variables_wanted`, labeled with a location name.
///
/// A text variable `location` holding `name` once per `valid_time` entry is
/// made available; it is retained only when `variables_wanted` lists it. The
/// auxiliary variable `number` must exist on the source dataset and is never
/// carried into the result, even when listed.
///
/// Returns an independent dataset value; the input is left untouched. Fails
/// with a missing-key condition when `number` or any wanted variable is
/// absent.
pub fn select_variables(ds: &Dataset, name: &str, variables_wanted: &[&str]) -> Result<Dataset> {
    if !ds.contains("number") {
        return Err(AnomVisError::VariableNotFound {
            var: "number".to_string(),
        });
    }

    let mut out = ds.empty_like();
    for &wanted in variables_wanted {
        if wanted == "location" {
            let labels = vec![name.to_string(); ds.valid_time().len()];
            out.add_text_variable("location", "valid_time", labels)?;
        } else {
            let array = ds.variable(wanted)?.clone();
            if wanted != "number" {
                out.insert_array(wanted, array)?;
            }
        }
    }

    Ok(out)
}
