//! Map rendering for a single time slice of a gridded field
//!
//! Renders one latitude/longitude field on a plain equirectangular plane
//! (Plate Carree: longitude on x, latitude on y) as a colored-cell map with
//! dashed gridlines and axis labels on the left and bottom edges, written to
//! a PNG file via `plotters`.

use crate::dataset::Dataset;
use crate::errors::{AnomVisError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use ndarray::Axis;
use plotters::prelude::*;
use std::path::Path;

/// Time-slice selector: exactly one axis is chosen
///
/// Selecting by date reads the daily `date` axis; selecting by valid time
/// reads the sub-daily `valid_time` axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSelector {
    Date(NaiveDate),
    ValidTime(NaiveDateTime),
}

impl TimeSelector {
    fn axis_name(&self) -> &'static str {
        match self {
            TimeSelector::Date(_) => "date",
            TimeSelector::ValidTime(_) => "valid_time",
        }
    }

    fn label(&self) -> String {
        match self {
            TimeSelector::Date(d) => d.to_string(),
            TimeSelector::ValidTime(t) => t.to_string(),
        }
    }
}

/// Plot a variable's field at one selected time and write it to `output` as PNG.
///
/// The selected slice must be two-dimensional over `latitude` and `longitude`.
/// Cells without a finite value are left blank. The title names the variable
/// and the selected time value.
pub fn plot_field(
    ds: &Dataset,
    variable: &str,
    selector: TimeSelector,
    output: &Path,
) -> Result<()> {
    let var = ds.variable(variable)?;
    let data = var.numeric()?;

    let axis_name = selector.axis_name();
    let t_axis = var
        .axis_of(axis_name)
        .ok_or_else(|| AnomVisError::DimensionNotFound {
            var: variable.to_string(),
            dim: axis_name.to_string(),
        })?;
    let index = match selector {
        TimeSelector::Date(d) => ds.date_index(d),
        TimeSelector::ValidTime(t) => ds.valid_time_index(t),
    }
    .ok_or_else(|| AnomVisError::CoordinateNotFound {
        coord: axis_name.to_string(),
        value: selector.label(),
    })?;

    let lat_axis = var
        .axis_of("latitude")
        .ok_or_else(|| AnomVisError::DimensionNotFound {
            var: variable.to_string(),
            dim: "latitude".to_string(),
        })?;
    let lon_axis = var
        .axis_of("longitude")
        .ok_or_else(|| AnomVisError::DimensionNotFound {
            var: variable.to_string(),
            dim: "longitude".to_string(),
        })?;

    let field = data.index_axis(Axis(t_axis), index);
    if field.ndim() != 2 {
        return Err(AnomVisError::StatisticsError(format!(
            "variable '{}' is not a 2-D field after time selection ({} dimensions remain)",
            variable,
            field.ndim()
        )));
    }

    // Axis positions within the sliced view
    let lat_pos = if lat_axis > t_axis { lat_axis - 1 } else { lat_axis };
    let lon_pos = if lon_axis > t_axis { lon_axis - 1 } else { lon_axis };

    // Color scale over the finite values of the slice
    let mut vmin = f64::INFINITY;
    let mut vmax = f64::NEG_INFINITY;
    for &x in field.iter() {
        if x.is_finite() {
            vmin = vmin.min(x);
            vmax = vmax.max(x);
        }
    }
    if !vmin.is_finite() {
        return Err(AnomVisError::PlotError(format!(
            "variable '{}' has no finite values at {}={}",
            variable,
            axis_name,
            selector.label()
        )));
    }

    let lat_edges = cell_edges(ds.latitude());
    let lon_edges = cell_edges(ds.longitude());
    let (x0, x1) = extent(&lon_edges);
    let (y0, y1) = extent(&lat_edges);

    let title = format!("{}, {}={}", variable, axis_name, selector.label());

    let root = BitMapBackend::new(output, (960, 640)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(56)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    // Labels stay on the bottom and left edges; the mesh itself is replaced
    // by dashed gridlines drawn below.
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(6)
        .y_labels(6)
        .x_desc("longitude")
        .y_desc("latitude")
        .draw()
        .map_err(plot_err)?;

    let span = vmax - vmin;
    chart
        .draw_series(
            (0..ds.latitude().len())
                .flat_map(|i| (0..ds.longitude().len()).map(move |j| (i, j)))
                .filter_map(|(i, j)| {
                    let value = if lat_pos < lon_pos {
                        field[[i, j]]
                    } else {
                        field[[j, i]]
                    };
                    if !value.is_finite() {
                        return None;
                    }
                    let t = if span > 0.0 { (value - vmin) / span } else { 0.5 };
                    // blue (cold) through red (warm)
                    let color = HSLColor(0.667 * (1.0 - t), 0.9, 0.5);
                    // corner order is (left, top), (right, bottom) regardless
                    // of the axis direction
                    let (ya, yb) = lat_edges[i];
                    let (xa, xb) = lon_edges[j];
                    Some(Rectangle::new(
                        [(xa.min(xb), ya.max(yb)), (xa.max(xb), ya.min(yb))],
                        color.filled(),
                    ))
                }),
        )
        .map_err(plot_err)?;

    let grid_style = ShapeStyle::from(&RGBColor(128, 128, 128).mix(0.7)).stroke_width(1);
    for k in 0..=5 {
        let x = x0 + (x1 - x0) * k as f64 / 5.0;
        chart
            .draw_series(DashedLineSeries::new(
                vec![(x, y0), (x, y1)],
                6,
                4,
                grid_style,
            ))
            .map_err(plot_err)?;
        let y = y0 + (y1 - y0) * k as f64 / 5.0;
        chart
            .draw_series(DashedLineSeries::new(
                vec![(x0, y), (x1, y)],
                6,
                4,
                grid_style,
            ))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

fn plot_err<E: std::fmt::Display>(e: E) -> AnomVisError {
    AnomVisError::PlotError(e.to_string())
}

/// Cell boundaries around each grid coordinate, from neighbor midpoints
fn cell_edges(coords: &[f64]) -> Vec<(f64, f64)> {
    let n = coords.len();
    (0..n)
        .map(|i| {
            let lo = if i == 0 {
                coords[0] - half_step(coords, 0)
            } else {
                (coords[i - 1] + coords[i]) / 2.0
            };
            let hi = if i + 1 == n {
                coords[n - 1] + half_step(coords, n - 1)
            } else {
                (coords[i] + coords[i + 1]) / 2.0
            };
            (lo, hi)
        })
        .collect()
}

/// Half the grid spacing at index `i`, signed with the axis direction
fn half_step(coords: &[f64], i: usize) -> f64 {
    if coords.len() < 2 {
        0.5
    } else if i == 0 {
        (coords[1] - coords[0]) / 2.0
    } else {
        (coords[i] - coords[i - 1]) / 2.0
    }
}

fn extent(edges: &[(f64, f64)]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(a, b) in edges {
        lo = lo.min(a.min(b));
        hi = hi.max(a.max(b));
    }
    (lo, hi)
}
