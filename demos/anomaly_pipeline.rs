//! Runs the full AnomVis pipeline on a synthetic hourly temperature dataset.
//!
//! This utility builds three weeks of hourly 2-metre temperature over a small
//! grid, then walks the usual workflow: select variables, compute the smoothed
//! anomaly, rank the most extreme dates, and plot the top one.

use anom_vis::prelude::*;
use anom_vis::parallel::get_parallel_info;
use chrono::{Duration, NaiveDate};
use ndarray::{arr0, ArrayD, IxDyn};
use std::path::Path;

fn main() -> Result<()> {
    ParallelConfig::new_default().setup_global_pool()?;
    get_parallel_info().print_info();

    // Hourly valid_time axis, 2025-12-01 through 2025-12-20
    let t0 = NaiveDate::from_ymd_opt(2025, 12, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let hours = 20 * 24;
    let valid_time: Vec<_> = (0..hours).map(|h| t0 + Duration::hours(h)).collect();

    let latitude: Vec<f64> = (0..5).map(|i| 60.0 - i as f64).collect();
    let longitude: Vec<f64> = (0..8).map(|j| -10.0 + j as f64).collect();

    // Diurnal cycle plus a warm spike around midday on Dec 15
    let mut t2m = ArrayD::zeros(IxDyn(&[hours as usize, 5, 8]));
    for h in 0..hours as usize {
        let diurnal = 5.0 * ((h % 24) as f64 * std::f64::consts::PI / 12.0).sin();
        let spike = if h / 24 == 14 { 8.0 } else { 0.0 };
        for i in 0..5 {
            for j in 0..8 {
                let lat_effect = -0.5 * i as f64;
                t2m[[h, i, j]] = 275.0 + diurnal + spike + lat_effect;
            }
        }
    }

    let mut ds = Dataset::new();
    ds.set_valid_time(valid_time);
    ds.set_grid(latitude, longitude);
    ds.add_variable("t2m", &["valid_time", "latitude", "longitude"], t2m)?;
    ds.add_variable("number", &[], arr0(0.0).into_dyn())?;

    let mut ds = select_variables(&ds, "StationA", &["t2m", "location"])?;
    compute_anomaly(&mut ds, "t2m", AggMethod::Max, 24)?;

    ds.print_structure();
    ds.summary("t2m_anomaly_max")?;

    let start = NaiveDate::from_ymd_opt(2025, 12, 2).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 12, 18).unwrap();
    let dates = get_extreme_dates(&ds, "t2m_anomaly_max", start, end, ExtremeMethod::Max, 5)?;

    let output = Path::new("t2m_anomaly_max.png");
    plot_field(&ds, "t2m_anomaly_max", TimeSelector::Date(dates[0]), output)?;
    println!("Saved map of the most extreme day to {}", output.display());

    Ok(())
}
