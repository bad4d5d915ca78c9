//! AnomVis: exploratory analysis of gridded meteorological time series
//!
//! A Rust library for working with labeled multi-dimensional array datasets
//! (spatial grid x time) to find and visualize weather extremes. AnomVis
//! provides smoothed climatological anomalies, ranking of dates by spatial
//! extremeness, map plots of a field at one time, and variable subsetting.
//!
//! ## Key Features
//!
//! - **Anomaly Computation**: centered rolling mean, anomaly, and daily
//!   aggregation (mean/max/min) over the `valid_time` axis
//! - **Extreme-Date Ranking**: top-n dates by the spatial max/min of a field
//!   within an inclusive date range
//! - **Map Plotting**: one time slice rendered on an equirectangular
//!   longitude/latitude plane with dashed gridlines, written to PNG
//! - **Variable Selection**: subsetting plus a per-time-step location label
//! - **Parallel Processing**: reductions run across cores using Rayon
//!
//! ## Module Organization
//!
//! - [`dataset`]: the labeled array dataset shared by every operation
//! - [`anomaly`]: smoothing, anomaly, and daily aggregation
//! - [`extremes`]: extreme-date ranking and the console report
//! - [`plot`]: map rendering via `plotters`
//! - [`select`]: variable subsetting and relabeling
//! - [`parallel`]: parallel processing configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use anom_vis::prelude::*;
//! use chrono::NaiveDate;
//!
//! # fn demo(mut ds: Dataset) -> anom_vis::errors::Result<()> {
//! // Smooth a temperature field with a 24-hour window and aggregate the
//! // anomaly per calendar date
//! compute_anomaly(&mut ds, "t2m", AggMethod::Max, 24)?;
//!
//! // Rank the dates with the highest spatial anomaly
//! let start = NaiveDate::from_ymd_opt(2025, 12, 2).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
//! let dates = get_extreme_dates(&ds, "t2m_anomaly_max", start, end, ExtremeMethod::Max, 5)?;
//!
//! // Plot the most extreme day
//! plot_field(&ds, "t2m_anomaly_max", TimeSelector::Date(dates[0]), "extreme.png".as_ref())?;
//! # Ok(())
//! # }
//! ```
//!
//! The dataset itself is caller-constructed; AnomVis never loads or persists
//! files beyond the rendered PNG.

// Core modules
pub mod anomaly;
pub mod dataset;
pub mod errors;
pub mod extremes;
pub mod parallel;
pub mod plot;
pub mod select;

// Direct re-exports for the public API
pub use anomaly::*;
pub use dataset::*;
pub use errors::*;
pub use extremes::*;
pub use parallel::*;
pub use plot::*;
pub use select::*;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::anomaly::{compute_anomaly, AggMethod};
    pub use crate::dataset::{DataArray, Dataset, VarValues};
    pub use crate::errors::{AnomVisError, Result};
    pub use crate::extremes::{get_extreme_dates, ExtremeMethod};
    pub use crate::parallel::ParallelConfig;
    pub use crate::plot::{plot_field, TimeSelector};
    pub use crate::select::select_variables;
}
