//! Comprehensive unit tests for AnomVis modules
//!
//! These tests provide extensive coverage of the core functionality
//! to ensure reliability and prevent regressions.

use anom_vis::{
    anomaly::{compute_anomaly, rolling_mean, AggMethod},
    dataset::Dataset,
    errors::{AnomVisError, Result},
    extremes::{get_extreme_dates, ExtremeMethod},
    parallel::{get_parallel_info, ParallelConfig},
    plot::{plot_field, TimeSelector},
    select::select_variables,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use ndarray::{arr0, ArrayD, IxDyn};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn hour(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

/// Two days of hourly data on a 2x2 grid; the signal is linear in time and
/// constant in space, so a centered rolling mean reproduces it exactly.
fn make_hourly_dataset() -> Dataset {
    let valid_time: Vec<NaiveDateTime> = (0..48)
        .map(|h| hour(2025, 12, 1, 0) + Duration::hours(h))
        .collect();

    let mut values = ArrayD::zeros(IxDyn(&[48, 2, 2]));
    for h in 0..48 {
        for i in 0..2 {
            for j in 0..2 {
                values[[h, i, j]] = h as f64;
            }
        }
    }

    let mut ds = Dataset::new();
    ds.set_valid_time(valid_time);
    ds.set_grid(vec![50.0, 49.0], vec![10.0, 11.0]);
    ds.add_variable("t2m", &["valid_time", "latitude", "longitude"], values)
        .unwrap();
    ds
}

/// Daily dataset, Dec 1-31 2025 on a 3x4 grid. Cell values are
/// `day_index + 0.01 * (i + j)`, so the spatial max per date is
/// `day_index + 0.05` and the spatial min is `day_index`.
fn make_daily_dataset() -> Dataset {
    let dates: Vec<NaiveDate> = (0..31).map(|k| date(2025, 12, 1) + Duration::days(k)).collect();

    let mut values = ArrayD::zeros(IxDyn(&[31, 3, 4]));
    for d in 0..31 {
        for i in 0..3 {
            for j in 0..4 {
                values[[d, i, j]] = d as f64 + 0.01 * (i + j) as f64;
            }
        }
    }

    let mut ds = Dataset::new();
    ds.set_date(dates);
    ds.set_grid(vec![52.0, 51.0, 50.0], vec![4.0, 5.0, 6.0, 7.0]);
    ds.add_variable(
        "t2m_anomaly_max",
        &["date", "latitude", "longitude"],
        values,
    )
    .unwrap();
    ds
}

#[test]
fn test_error_types() {
    let var_err = AnomVisError::VariableNotFound {
        var: "temp".to_string(),
    };
    assert!(format!("{}", var_err).contains("Variable 'temp' not found"));

    let dim_err = AnomVisError::DimensionNotFound {
        var: "temp".to_string(),
        dim: "valid_time".to_string(),
    };
    assert!(format!("{}", dim_err).contains("Dimension 'valid_time' not found in variable 'temp'"));

    let coord_err = AnomVisError::CoordinateNotFound {
        coord: "date".to_string(),
        value: "2025-12-10".to_string(),
    };
    assert!(format!("{}", coord_err).contains("'2025-12-10' not found on coordinate axis 'date'"));

    let method_err = AnomVisError::UnsupportedMethod {
        method: "median".to_string(),
    };
    assert!(format!("{}", method_err).contains("Unsupported method 'median'"));

    let generic_err = AnomVisError::Generic("Test error".to_string());
    assert_eq!(format!("{}", generic_err), "Test error");
}

#[test]
fn test_parallel_config() {
    let default_config = ParallelConfig::new_default();
    assert!(default_config.num_threads.is_none());

    let config_4 = ParallelConfig::with_threads(4);
    assert_eq!(config_4.num_threads, Some(4));

    let all_cores_config = ParallelConfig::all_cores();
    assert!(all_cores_config.num_threads.is_some());
    assert!(all_cores_config.num_threads.unwrap() > 0);

    let current = default_config.current_threads();
    assert!(current > 0);

    let info = get_parallel_info();
    assert!(info.current_threads > 0);
    assert!(info.available_cores > 0);
    info.print_info();
}

#[test]
fn test_method_parsing() {
    assert_eq!("mean".parse::<AggMethod>().unwrap(), AggMethod::Mean);
    assert_eq!("max".parse::<AggMethod>().unwrap(), AggMethod::Max);
    assert_eq!("min".parse::<AggMethod>().unwrap(), AggMethod::Min);
    assert_eq!(AggMethod::Mean.tag(), "mean");

    match "median".parse::<AggMethod>() {
        Err(AnomVisError::UnsupportedMethod { method }) => assert_eq!(method, "median"),
        _ => panic!("Expected UnsupportedMethod error"),
    }

    assert_eq!("max".parse::<ExtremeMethod>().unwrap(), ExtremeMethod::Max);
    assert_eq!("min".parse::<ExtremeMethod>().unwrap(), ExtremeMethod::Min);
    match "sum".parse::<ExtremeMethod>() {
        Err(AnomVisError::UnsupportedMethod { method }) => assert_eq!(method, "sum"),
        _ => panic!("Expected UnsupportedMethod error"),
    }
}

#[test]
fn test_dataset_variables() -> Result<()> {
    let mut ds = Dataset::new();
    ds.set_valid_time((0..4).map(|h| hour(2025, 12, 1, h)).collect());
    ds.set_grid(vec![50.0], vec![10.0, 11.0]);

    ds.add_variable(
        "t2m",
        &["valid_time", "latitude", "longitude"],
        ArrayD::zeros(IxDyn(&[4, 1, 2])),
    )?;
    assert!(ds.contains("t2m"));
    assert_eq!(ds.variable("t2m")?.shape(), vec![4, 1, 2]);
    assert_eq!(ds.variable("t2m")?.axis_of("longitude"), Some(2));

    // Scalar variable with no dimensions
    ds.add_variable("number", &[], arr0(0.0).into_dyn())?;
    assert!(ds.contains("number"));

    // Text variable along the time axis
    ds.add_text_variable("location", "valid_time", vec!["A".to_string(); 4])?;
    assert_eq!(ds.variable("location")?.text()?.len(), 4);
    assert!(ds.variable("location")?.numeric().is_err());

    // Missing variable
    match ds.variable("msl") {
        Err(AnomVisError::VariableNotFound { var }) => assert_eq!(var, "msl"),
        _ => panic!("Expected VariableNotFound error"),
    }

    // Unknown dimension name
    let result = ds.add_variable("bad", &["level"], ArrayD::zeros(IxDyn(&[3])));
    match result {
        Err(AnomVisError::DimensionNotFound { var, dim }) => {
            assert_eq!(var, "bad");
            assert_eq!(dim, "level");
        }
        _ => panic!("Expected DimensionNotFound error"),
    }

    // Shape disagreeing with the coordinate axis
    let result = ds.add_variable("bad", &["valid_time"], ArrayD::zeros(IxDyn(&[7])));
    assert!(matches!(result, Err(AnomVisError::ShapeMismatch { .. })));

    // Re-adding a name overwrites the values
    ds.add_variable(
        "t2m",
        &["valid_time", "latitude", "longitude"],
        ArrayD::from_elem(IxDyn(&[4, 1, 2]), 1.5),
    )?;
    assert_eq!(ds.numeric_variable("t2m")?[[0, 0, 0]], 1.5);

    assert_eq!(ds.variable_names(), vec!["location", "number", "t2m"]);

    ds.print_structure();
    ds.summary("t2m")?;

    Ok(())
}

#[test]
fn test_rolling_mean() -> Result<()> {
    let lane = ArrayD::from_shape_vec(IxDyn(&[5]), vec![1.0, 2.0, 3.0, 4.0, 5.0])?;

    let smooth = rolling_mean(&lane, 0, 3)?;
    assert!(smooth[[0]].is_nan());
    assert_eq!(smooth[[1]], 2.0);
    assert_eq!(smooth[[2]], 3.0);
    assert_eq!(smooth[[3]], 4.0);
    assert!(smooth[[4]].is_nan());

    // Window of one is the identity
    let identity = rolling_mean(&lane, 0, 1)?;
    assert_eq!(identity[[2]], 3.0);

    // Even window: [i - (w-1)/2, i + w/2] inclusive
    let smooth4 = rolling_mean(&lane, 0, 4)?;
    assert!(smooth4[[0]].is_nan());
    assert_eq!(smooth4[[1]], 2.5); // mean of 1..=4
    assert_eq!(smooth4[[2]], 3.5); // mean of 2..=5
    assert!(smooth4[[3]].is_nan());

    assert!(rolling_mean(&lane, 0, 0).is_err());
    assert!(rolling_mean(&lane, 3, 2).is_err());

    Ok(())
}

#[test]
fn test_compute_anomaly() -> Result<()> {
    let mut ds = make_hourly_dataset();
    compute_anomaly(&mut ds, "t2m", AggMethod::Mean, 5)?;

    assert!(ds.contains("t2m"));
    assert!(ds.contains("t2m_smooth"));
    assert!(ds.contains("t2m_anomaly"));
    assert!(ds.contains("t2m_anomaly_mean"));

    let data = ds.numeric_variable("t2m")?.clone();
    let smooth = ds.numeric_variable("t2m_smooth")?;
    let anomaly = ds.numeric_variable("t2m_anomaly")?;

    // Edges without a full window are NaN
    assert!(smooth[[0, 0, 0]].is_nan());
    assert!(smooth[[1, 0, 0]].is_nan());
    assert!(smooth[[46, 0, 0]].is_nan());
    assert!(smooth[[47, 0, 0]].is_nan());

    // The signal is linear in time, so the centered mean reproduces it and
    // the anomaly is exactly zero wherever the smooth is defined
    for h in 2..46 {
        assert_eq!(smooth[[h, 0, 0]], data[[h, 0, 0]]);
        assert_eq!(anomaly[[h, 1, 1]], 0.0);
        assert_eq!(
            anomaly[[h, 0, 0]],
            data[[h, 0, 0]] - smooth[[h, 0, 0]]
        );
    }

    // One daily value per calendar date, on a date-typed axis
    assert_eq!(ds.date().to_vec(), vec![date(2025, 12, 1), date(2025, 12, 2)]);
    let daily = ds.numeric_variable("t2m_anomaly_mean")?;
    assert_eq!(daily.shape(), &[2, 2, 2]);
    assert_eq!(daily[[0, 0, 0]], 0.0);
    assert_eq!(daily[[1, 0, 0]], 0.0);

    Ok(())
}

#[test]
fn test_compute_anomaly_daily_aggregate_matches_groups() -> Result<()> {
    // A nonlinear signal so the anomaly is not trivially zero
    let mut ds = make_hourly_dataset();
    {
        let mut values = ArrayD::zeros(IxDyn(&[48, 2, 2]));
        for h in 0..48 {
            let wave = ((h % 6) as f64).powi(2);
            for i in 0..2 {
                for j in 0..2 {
                    values[[h, i, j]] = wave + (i * 2 + j) as f64;
                }
            }
        }
        ds.add_variable("t2m", &["valid_time", "latitude", "longitude"], values)?;
    }

    compute_anomaly(&mut ds, "t2m", AggMethod::Max, 5)?;
    let anomaly = ds.numeric_variable("t2m_anomaly")?.clone();
    let daily = ds.numeric_variable("t2m_anomaly_max")?;

    // The daily aggregate equals a per-date reduction of the anomaly,
    // skipping the NaN edges
    for (day, range) in [(0usize, 0..24usize), (1, 24..48)] {
        for i in 0..2 {
            for j in 0..2 {
                let expected = range
                    .clone()
                    .map(|h| anomaly[[h, i, j]])
                    .filter(|x| x.is_finite())
                    .fold(f64::NEG_INFINITY, f64::max);
                assert_eq!(daily[[day, i, j]], expected);
            }
        }
    }

    Ok(())
}

#[test]
fn test_compute_anomaly_recompute_is_deterministic() -> Result<()> {
    let mut ds = make_hourly_dataset();
    compute_anomaly(&mut ds, "t2m", AggMethod::Min, 7)?;
    let first = ds.numeric_variable("t2m_anomaly_min")?.clone();

    compute_anomaly(&mut ds, "t2m", AggMethod::Min, 7)?;
    let second = ds.numeric_variable("t2m_anomaly_min")?;

    assert_eq!(first.shape(), second.shape());
    for (a, b) in first.iter().zip(second.iter()) {
        assert!(a == b || (a.is_nan() && b.is_nan()));
    }

    Ok(())
}

#[test]
fn test_compute_anomaly_missing_inputs() {
    let mut ds = make_hourly_dataset();

    let result = compute_anomaly(&mut ds, "msl", AggMethod::Mean, 5);
    assert!(matches!(
        result,
        Err(AnomVisError::VariableNotFound { .. })
    ));

    // A variable without the valid_time dimension cannot be smoothed
    let mut daily = make_daily_dataset();
    let result = compute_anomaly(&mut daily, "t2m_anomaly_max", AggMethod::Mean, 5);
    assert!(matches!(
        result,
        Err(AnomVisError::DimensionNotFound { .. })
    ));
}

#[test]
fn test_extreme_dates_max() -> Result<()> {
    let ds = make_daily_dataset();

    let dates = get_extreme_dates(
        &ds,
        "t2m_anomaly_max",
        date(2025, 12, 2),
        date(2025, 12, 15),
        ExtremeMethod::Max,
        5,
    )?;

    assert_eq!(dates.len(), 5);
    // The values grow with the day index, so the ranking is reverse-chronological
    assert_eq!(dates[0], date(2025, 12, 15));
    assert_eq!(dates[1], date(2025, 12, 14));
    assert_eq!(dates[4], date(2025, 12, 11));
    for d in &dates {
        assert!(*d >= date(2025, 12, 2) && *d <= date(2025, 12, 15));
    }

    Ok(())
}

#[test]
fn test_extreme_dates_min_sorts_ascending() -> Result<()> {
    let ds = make_daily_dataset();

    let dates = get_extreme_dates(
        &ds,
        "t2m_anomaly_max",
        date(2025, 12, 2),
        date(2025, 12, 15),
        ExtremeMethod::Min,
        3,
    )?;

    assert_eq!(
        dates,
        vec![date(2025, 12, 2), date(2025, 12, 3), date(2025, 12, 4)]
    );

    Ok(())
}

#[test]
fn test_extreme_dates_boundaries() -> Result<()> {
    let ds = make_daily_dataset();

    // n larger than the number of dates in range returns all of them, no padding
    let dates = get_extreme_dates(
        &ds,
        "t2m_anomaly_max",
        date(2025, 12, 10),
        date(2025, 12, 12),
        ExtremeMethod::Max,
        40,
    )?;
    assert_eq!(dates.len(), 3);

    // Range with no dates fails loudly
    let result = get_extreme_dates(
        &ds,
        "t2m_anomaly_max",
        date(2026, 1, 1),
        date(2026, 1, 31),
        ExtremeMethod::Max,
        5,
    );
    assert!(matches!(result, Err(AnomVisError::EmptyDateRange { .. })));

    // Missing variable and missing spatial dimensions surface as errors
    let result = get_extreme_dates(
        &ds,
        "nope",
        date(2025, 12, 2),
        date(2025, 12, 15),
        ExtremeMethod::Max,
        5,
    );
    assert!(matches!(result, Err(AnomVisError::VariableNotFound { .. })));

    Ok(())
}

#[test]
fn test_select_variables() -> Result<()> {
    let mut ds = Dataset::new();
    ds.set_valid_time((0..10).map(|h| hour(2025, 12, 1, h)).collect());
    ds.set_grid(vec![50.0], vec![10.0]);
    ds.add_variable(
        "t2m",
        &["valid_time", "latitude", "longitude"],
        ArrayD::from_elem(IxDyn(&[10, 1, 1]), 275.0),
    )?;
    ds.add_variable(
        "msl",
        &["valid_time", "latitude", "longitude"],
        ArrayD::from_elem(IxDyn(&[10, 1, 1]), 101325.0),
    )?;
    ds.add_variable("number", &[], arr0(0.0).into_dyn())?;

    let selected = select_variables(&ds, "StationA", &["t2m", "location"])?;

    assert_eq!(selected.num_variables(), 2);
    assert!(selected.contains("t2m"));
    assert!(selected.contains("location"));
    assert!(!selected.contains("msl"));
    assert!(!selected.contains("number"));

    let labels = selected.variable("location")?.text()?;
    assert_eq!(labels.len(), 10);
    assert!(labels.iter().all(|l| l == "StationA"));

    // The source dataset is untouched
    assert!(ds.contains("number"));
    assert!(!ds.contains("location"));

    // 'number' is dropped even when explicitly wanted
    let selected = select_variables(&ds, "StationA", &["t2m", "number"])?;
    assert!(!selected.contains("number"));

    Ok(())
}

#[test]
fn test_select_variables_missing_keys() -> Result<()> {
    let mut ds = Dataset::new();
    ds.set_valid_time((0..4).map(|h| hour(2025, 12, 1, h)).collect());
    ds.set_grid(vec![50.0], vec![10.0]);
    ds.add_variable(
        "t2m",
        &["valid_time", "latitude", "longitude"],
        ArrayD::zeros(IxDyn(&[4, 1, 1])),
    )?;

    // No 'number' auxiliary variable
    match select_variables(&ds, "StationA", &["t2m"]) {
        Err(AnomVisError::VariableNotFound { var }) => assert_eq!(var, "number"),
        _ => panic!("Expected VariableNotFound error for 'number'"),
    }

    ds.add_variable("number", &[], arr0(0.0).into_dyn())?;

    // A wanted variable that does not exist
    match select_variables(&ds, "StationA", &["t2m", "tp"]) {
        Err(AnomVisError::VariableNotFound { var }) => assert_eq!(var, "tp"),
        _ => panic!("Expected VariableNotFound error for 'tp'"),
    }

    Ok(())
}

#[test]
fn test_plot_field_by_date() -> Result<()> {
    let ds = make_daily_dataset();
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let output = temp_dir.path().join("field.png");

    plot_field(
        &ds,
        "t2m_anomaly_max",
        TimeSelector::Date(date(2025, 12, 15)),
        &output,
    )?;

    let meta = std::fs::metadata(&output)?;
    assert!(meta.len() > 0);

    Ok(())
}

#[test]
fn test_plot_field_by_valid_time() -> Result<()> {
    let ds = make_hourly_dataset();
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let output = temp_dir.path().join("field_hourly.png");

    plot_field(
        &ds,
        "t2m",
        TimeSelector::ValidTime(hour(2025, 12, 1, 6)),
        &output,
    )?;

    assert!(output.exists());

    Ok(())
}

#[test]
fn test_plot_field_errors() {
    let ds = make_daily_dataset();
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let output = temp_dir.path().join("never.png");

    // Selector value not on the axis
    let result = plot_field(
        &ds,
        "t2m_anomaly_max",
        TimeSelector::Date(date(2026, 6, 1)),
        &output,
    );
    assert!(matches!(
        result,
        Err(AnomVisError::CoordinateNotFound { .. })
    ));

    // Variable without the selected axis
    let result = plot_field(
        &ds,
        "t2m_anomaly_max",
        TimeSelector::ValidTime(hour(2025, 12, 1, 0)),
        &output,
    );
    assert!(matches!(
        result,
        Err(AnomVisError::DimensionNotFound { .. })
    ));

    assert!(!output.exists());
}
