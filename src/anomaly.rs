//! Smoothed-anomaly computation
//!
//! This module derives three variables from a gridded time series: a centered
//! rolling mean along `valid_time`, the anomaly of the raw signal from that
//! smooth, and a per-calendar-date aggregate of the anomaly.

use crate::dataset::Dataset;
use crate::errors::{AnomVisError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use ndarray::{ArrayD, Axis, IxDyn, Zip};
use std::str::FromStr;

/// Supported daily aggregation methods
///
/// This is a closed set: parsing any other tag fails with an explicit
/// unsupported-method error instead of skipping the daily step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggMethod {
    Mean,
    Max,
    Min,
}

impl AggMethod {
    /// Tag used in the derived variable name, e.g. `t2m_anomaly_mean`
    pub fn tag(&self) -> &'static str {
        match self {
            AggMethod::Mean => "mean",
            AggMethod::Max => "max",
            AggMethod::Min => "min",
        }
    }
}

impl FromStr for AggMethod {
    type Err = AnomVisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(AggMethod::Mean),
            "max" => Ok(AggMethod::Max),
            "min" => Ok(AggMethod::Min),
            other => Err(AnomVisError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Computes smoothed variable, anomaly, and daily aggregated anomaly.
///
/// Adds three variables to the dataset, overwriting them if already present:
/// - `{variable}_smooth`: centered rolling mean over `window_hours` points
///   along `valid_time`; edges without a full window are NaN
/// - `{variable}_anomaly`: the variable minus its smooth
/// - `{variable}_anomaly_{method}`: the anomaly grouped by calendar date and
///   reduced with `method`, on a date-typed `date` axis
///
/// Mutates and returns the same dataset handle; the original variable is
/// never replaced.
pub fn compute_anomaly(
    ds: &mut Dataset,
    variable: &str,
    method: AggMethod,
    window_hours: usize,
) -> Result<()> {
    let (dims, t_axis, smooth, anomaly) = {
        let var = ds.variable(variable)?;
        let data = var.numeric()?;
        let t_axis = var
            .axis_of("valid_time")
            .ok_or_else(|| AnomVisError::DimensionNotFound {
                var: variable.to_string(),
                dim: "valid_time".to_string(),
            })?;

        let smooth = rolling_mean(data, t_axis, window_hours)?;
        let anomaly = data - &smooth;
        (var.dims.clone(), t_axis, smooth, anomaly)
    };

    let groups = group_by_date(ds.valid_time());
    let daily = reduce_by_date(&anomaly, t_axis, &groups, method)?;
    let dates: Vec<NaiveDate> = groups.iter().map(|(d, _)| *d).collect();

    // The daily aggregate lives on a date-typed axis, populated here if the
    // dataset does not carry one yet.
    if ds.date().is_empty() {
        ds.set_date(dates);
    } else if ds.date() != dates.as_slice() {
        return Err(AnomVisError::StatisticsError(format!(
            "daily aggregate of '{}' disagrees with the dataset's existing date axis",
            variable
        )));
    }

    let dim_refs: Vec<&str> = dims.iter().map(|d| d.as_str()).collect();
    let daily_dims: Vec<&str> = dims
        .iter()
        .map(|d| if d == "valid_time" { "date" } else { d.as_str() })
        .collect();

    ds.add_variable(&format!("{variable}_smooth"), &dim_refs, smooth)?;
    ds.add_variable(&format!("{variable}_anomaly"), &dim_refs, anomaly)?;
    ds.add_variable(
        &format!("{variable}_anomaly_{}", method.tag()),
        &daily_dims,
        daily,
    )?;

    Ok(())
}

/// Centered rolling mean along an axis.
///
/// At index `i` the window covers `[i - (w-1)/2, i + w/2]` inclusive; indices
/// where the full window does not fit receive NaN, and NaN inputs propagate
/// into every window that contains them.
pub fn rolling_mean(data: &ArrayD<f64>, axis: usize, window: usize) -> Result<ArrayD<f64>> {
    if window == 0 {
        return Err(AnomVisError::StatisticsError(
            "rolling window must contain at least one point".to_string(),
        ));
    }
    if axis >= data.ndim() {
        return Err(AnomVisError::StatisticsError(format!(
            "axis {} is out of bounds for array with {} dimensions",
            axis,
            data.ndim()
        )));
    }

    let before = (window - 1) / 2;
    let after = window / 2;

    let mut out = ArrayD::from_elem(data.raw_dim(), f64::NAN);
    Zip::from(out.lanes_mut(Axis(axis)))
        .and(data.lanes(Axis(axis)))
        .par_for_each(|mut dst, src| {
            let n = src.len();
            for i in 0..n {
                if i >= before && i + after < n {
                    let mut sum = 0.0;
                    for j in (i - before)..=(i + after) {
                        sum += src[j];
                    }
                    dst[i] = sum / window as f64;
                }
            }
        });

    Ok(out)
}

/// Groups time-axis indices by calendar date, preserving first-occurrence order
fn group_by_date(valid_time: &[NaiveDateTime]) -> Vec<(NaiveDate, Vec<usize>)> {
    let mut groups: Vec<(NaiveDate, Vec<usize>)> = Vec::new();
    for (i, t) in valid_time.iter().enumerate() {
        let d = t.date();
        match groups.iter_mut().find(|(g, _)| *g == d) {
            Some((_, idxs)) => idxs.push(i),
            None => groups.push((d, vec![i])),
        }
    }
    // guard against unsorted time axes
    groups.sort_by_key(|(d, _)| *d);
    groups
}

/// Reduces an array per calendar date along the time axis.
///
/// Non-finite values are skipped the same way the spatial reductions skip
/// them; a date whose group holds no finite values reduces to NaN.
fn reduce_by_date(
    data: &ArrayD<f64>,
    t_axis: usize,
    groups: &[(NaiveDate, Vec<usize>)],
    method: AggMethod,
) -> Result<ArrayD<f64>> {
    let mut out_shape = data.shape().to_vec();
    out_shape[t_axis] = groups.len();
    let mut out = ArrayD::from_elem(IxDyn(&out_shape), f64::NAN);

    let mut slice_shape = data.shape().to_vec();
    slice_shape.remove(t_axis);

    for (j, (_, idxs)) in groups.iter().enumerate() {
        let mut dst = out.index_axis_mut(Axis(t_axis), j);

        match method {
            AggMethod::Mean => {
                let mut sum = ArrayD::<f64>::zeros(IxDyn(&slice_shape));
                let mut count = ArrayD::<f64>::zeros(IxDyn(&slice_shape));
                for &i in idxs {
                    let slice = data.index_axis(Axis(t_axis), i);
                    Zip::from(&mut sum).and(&mut count).and(&slice).for_each(
                        |s, c, &x| {
                            if x.is_finite() {
                                *s += x;
                                *c += 1.0;
                            }
                        },
                    );
                }
                Zip::from(&mut dst)
                    .and(&sum)
                    .and(&count)
                    .for_each(|d, &s, &c| *d = if c > 0.0 { s / c } else { f64::NAN });
            }
            AggMethod::Max => {
                let mut acc = ArrayD::from_elem(IxDyn(&slice_shape), f64::NEG_INFINITY);
                for &i in idxs {
                    let slice = data.index_axis(Axis(t_axis), i);
                    Zip::from(&mut acc).and(&slice).for_each(|a, &x| {
                        if x.is_finite() {
                            *a = a.max(x);
                        }
                    });
                }
                Zip::from(&mut dst).and(&acc).for_each(|d, &a| {
                    *d = if a == f64::NEG_INFINITY { f64::NAN } else { a };
                });
            }
            AggMethod::Min => {
                let mut acc = ArrayD::from_elem(IxDyn(&slice_shape), f64::INFINITY);
                for &i in idxs {
                    let slice = data.index_axis(Axis(t_axis), i);
                    Zip::from(&mut acc).and(&slice).for_each(|a, &x| {
                        if x.is_finite() {
                            *a = a.min(x);
                        }
                    });
                }
                Zip::from(&mut dst).and(&acc).for_each(|d, &a| {
                    *d = if a == f64::INFINITY { f64::NAN } else { a };
                });
            }
        }
    }

    Ok(out)
}
