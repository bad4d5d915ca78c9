//! Extreme-date ranking
//!
//! Ranks the dates of a daily field by its spatial extreme (the max or min
//! across all grid points) and reports the most extreme ones.

use crate::errors::{AnomVisError, Result};
use crate::dataset::Dataset;
use chrono::NaiveDate;
use ndarray::Axis;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::str::FromStr;

/// Spatial ranking methods
///
/// A closed set: any other tag fails to parse with an explicit
/// unsupported-method error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeMethod {
    Max,
    Min,
}

impl ExtremeMethod {
    /// Word used in the printed report
    fn descriptor(&self) -> &'static str {
        match self {
            ExtremeMethod::Max => "highest",
            ExtremeMethod::Min => "lowest",
        }
    }
}

impl FromStr for ExtremeMethod {
    type Err = AnomVisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "max" => Ok(ExtremeMethod::Max),
            "min" => Ok(ExtremeMethod::Min),
            other => Err(AnomVisError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Find dates with the most extreme values of a variable.
///
/// Restricts the variable to dates in `[start_date, end_date]` inclusive,
/// reduces it over `latitude` and `longitude` per date, and returns the `n`
/// dates whose spatial extreme ranks first: ascending by value for
/// [`ExtremeMethod::Min`], descending for [`ExtremeMethod::Max`]. Fewer than
/// `n` dates are returned when the range holds fewer distinct dates.
///
/// Also prints a report to stdout: the selected dates in ascending calendar
/// order, and the top-`n` spatial extremes sorted descending. The value list
/// deliberately keeps its own descending sort, so it does not pair up
/// index-for-index with the returned dates when the method is `Min`.
pub fn get_extreme_dates(
    ds: &Dataset,
    variable: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    method: ExtremeMethod,
    n: usize,
) -> Result<Vec<NaiveDate>> {
    let var = ds.variable(variable)?;
    let data = var.numeric()?;

    let date_axis = var
        .axis_of("date")
        .ok_or_else(|| AnomVisError::DimensionNotFound {
            var: variable.to_string(),
            dim: "date".to_string(),
        })?;
    for dim in ["latitude", "longitude"] {
        if var.axis_of(dim).is_none() {
            return Err(AnomVisError::DimensionNotFound {
                var: variable.to_string(),
                dim: dim.to_string(),
            });
        }
    }

    let selected: Vec<(usize, NaiveDate)> = ds
        .date()
        .iter()
        .enumerate()
        .filter(|(_, d)| **d >= start_date && **d <= end_date)
        .map(|(i, d)| (i, *d))
        .collect();

    if selected.is_empty() {
        return Err(AnomVisError::EmptyDateRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        });
    }

    // One spatial extreme per retained date, skipping non-finite grid points
    let scalars: Vec<f64> = selected
        .par_iter()
        .map(|(i, _)| {
            let slice = data.index_axis(Axis(date_axis), *i);
            let folded = match method {
                ExtremeMethod::Max => slice.iter().filter(|x| x.is_finite()).fold(
                    f64::NEG_INFINITY,
                    |acc, &x| acc.max(x),
                ),
                ExtremeMethod::Min => slice
                    .iter()
                    .filter(|x| x.is_finite())
                    .fold(f64::INFINITY, |acc, &x| acc.min(x)),
            };
            if folded.is_finite() {
                folded
            } else {
                f64::NAN
            }
        })
        .collect();

    let mut ranked: Vec<(NaiveDate, f64)> = selected
        .iter()
        .map(|(_, d)| *d)
        .zip(scalars.iter().cloned())
        .collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    if method == ExtremeMethod::Max {
        ranked.reverse();
    }
    let dates: Vec<NaiveDate> = ranked.iter().take(n).map(|(d, _)| *d).collect();

    // Report values are always sorted descending, independent of the date sort
    let mut values = scalars;
    values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    values.truncate(n);

    let mut calendar_order = dates.clone();
    calendar_order.sort();
    println!(
        "Days with {} values of {}: {:?}",
        method.descriptor(),
        variable,
        calendar_order
    );
    println!("Values: {:?}\n", values);

    Ok(dates)
}
