//! In-memory labeled array dataset
//!
//! This module provides the shared data structure the analysis functions operate on:
//! a collection of named multi-dimensional arrays whose dimensions refer to the
//! dataset's coordinate axes (`valid_time`, `date`, `latitude`, `longitude`).
//! Construction of the contents is caller-owned; this module only enforces that
//! every variable's shape agrees with the coordinate axes it names.

use crate::errors::{AnomVisError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use ndarray::ArrayD;
use std::collections::BTreeMap;

/// Values held by a variable: gridded numeric data or per-step text labels
#[derive(Debug, Clone)]
pub enum VarValues {
    Numeric(ArrayD<f64>),
    Text(Vec<String>),
}

/// A named-dimension array, the per-variable building block of a [`Dataset`]
#[derive(Debug, Clone)]
pub struct DataArray {
    pub dims: Vec<String>,
    pub values: VarValues,
}

impl DataArray {
    /// Position of a dimension within this variable, if present
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Shape of the underlying values
    pub fn shape(&self) -> Vec<usize> {
        match &self.values {
            VarValues::Numeric(a) => a.shape().to_vec(),
            VarValues::Text(v) => vec![v.len()],
        }
    }

    /// Borrow the numeric values, or fail for a text variable
    pub fn numeric(&self) -> Result<&ArrayD<f64>> {
        match &self.values {
            VarValues::Numeric(a) => Ok(a),
            VarValues::Text(_) => Err(AnomVisError::StatisticsError(
                "variable holds text labels, not numeric data".to_string(),
            )),
        }
    }

    /// Borrow the text labels, or fail for a numeric variable
    pub fn text(&self) -> Result<&[String]> {
        match &self.values {
            VarValues::Text(v) => Ok(v),
            VarValues::Numeric(_) => Err(AnomVisError::StatisticsError(
                "variable holds numeric data, not text labels".to_string(),
            )),
        }
    }
}

/// Labeled multi-dimensional array dataset
///
/// Variables are stored by name and validated against the four coordinate axes
/// at insertion time. The time axes are date-typed (`chrono`), never strings.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    valid_time: Vec<NaiveDateTime>,
    date: Vec<NaiveDate>,
    latitude: Vec<f64>,
    longitude: Vec<f64>,
    variables: BTreeMap<String, DataArray>,
}

impl Dataset {
    /// Create an empty dataset with no coordinate axes or variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset with the same coordinate axes but no variables
    pub fn empty_like(&self) -> Self {
        Self {
            valid_time: self.valid_time.clone(),
            date: self.date.clone(),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            variables: BTreeMap::new(),
        }
    }

    pub fn set_valid_time(&mut self, valid_time: Vec<NaiveDateTime>) {
        self.valid_time = valid_time;
    }

    pub fn set_date(&mut self, date: Vec<NaiveDate>) {
        self.date = date;
    }

    pub fn set_grid(&mut self, latitude: Vec<f64>, longitude: Vec<f64>) {
        self.latitude = latitude;
        self.longitude = longitude;
    }

    pub fn valid_time(&self) -> &[NaiveDateTime] {
        &self.valid_time
    }

    pub fn date(&self) -> &[NaiveDate] {
        &self.date
    }

    pub fn latitude(&self) -> &[f64] {
        &self.latitude
    }

    pub fn longitude(&self) -> &[f64] {
        &self.longitude
    }

    /// Length of a coordinate axis, or `None` for an unknown dimension name
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        match dim {
            "valid_time" => Some(self.valid_time.len()),
            "date" => Some(self.date.len()),
            "latitude" => Some(self.latitude.len()),
            "longitude" => Some(self.longitude.len()),
            _ => None,
        }
    }

    /// Index of a date value on the `date` axis
    pub fn date_index(&self, value: NaiveDate) -> Option<usize> {
        self.date.iter().position(|d| *d == value)
    }

    /// Index of a time value on the `valid_time` axis
    pub fn valid_time_index(&self, value: NaiveDateTime) -> Option<usize> {
        self.valid_time.iter().position(|t| *t == value)
    }

    /// Insert a variable, validating its dimension names and shape against the
    /// coordinate axes. Re-inserting an existing name overwrites it.
    pub fn insert_array(&mut self, name: &str, array: DataArray) -> Result<()> {
        let shape = array.shape();
        if array.dims.len() != shape.len() {
            return Err(AnomVisError::ShapeMismatch {
                var: name.to_string(),
                message: format!(
                    "{} dimension names for {} array axes",
                    array.dims.len(),
                    shape.len()
                ),
            });
        }
        for (dim, &len) in array.dims.iter().zip(shape.iter()) {
            let axis_len = self
                .dim_len(dim)
                .ok_or_else(|| AnomVisError::DimensionNotFound {
                    var: name.to_string(),
                    dim: dim.clone(),
                })?;
            if len != axis_len {
                return Err(AnomVisError::ShapeMismatch {
                    var: name.to_string(),
                    message: format!(
                        "axis '{}' has length {} but coordinate has length {}",
                        dim, len, axis_len
                    ),
                });
            }
        }
        self.variables.insert(name.to_string(), array);
        Ok(())
    }

    /// Add a numeric variable over the named dimensions
    pub fn add_variable(&mut self, name: &str, dims: &[&str], values: ArrayD<f64>) -> Result<()> {
        self.insert_array(
            name,
            DataArray {
                dims: dims.iter().map(|d| d.to_string()).collect(),
                values: VarValues::Numeric(values),
            },
        )
    }

    /// Add a text variable along a single named dimension
    pub fn add_text_variable(&mut self, name: &str, dim: &str, values: Vec<String>) -> Result<()> {
        self.insert_array(
            name,
            DataArray {
                dims: vec![dim.to_string()],
                values: VarValues::Text(values),
            },
        )
    }

    /// Look up a variable by name
    pub fn variable(&self, name: &str) -> Result<&DataArray> {
        self.variables
            .get(name)
            .ok_or_else(|| AnomVisError::VariableNotFound {
                var: name.to_string(),
            })
    }

    /// Borrow a variable's numeric values directly
    pub fn numeric_variable(&self, name: &str) -> Result<&ArrayD<f64>> {
        self.variable(name)?.numeric()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Variable names in alphabetical order
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(|k| k.as_str()).collect()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Computes quick statistics (min/mean/max/std) on a numeric variable.
    pub fn summary(&self, name: &str) -> Result<()> {
        let data = self.numeric_variable(name)?;

        let finite: Vec<f64> = data.iter().cloned().filter(|x| x.is_finite()).collect();
        if finite.is_empty() {
            return Err(AnomVisError::StatisticsError(format!(
                "variable '{}' has no finite values to summarize",
                name
            )));
        }

        let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean: f64 = finite.iter().sum::<f64>() / finite.len() as f64;
        let std_dev =
            (finite.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / finite.len() as f64).sqrt();

        println!("\n Summary for Variable: {}", name);
        println!("================================");
        println!("   Min: {}", min);
        println!("   Max: {}", max);
        println!("   Mean: {:.2}", mean);
        println!("   Std Dev: {:.2}", std_dev);

        Ok(())
    }

    /// Lists all coordinate axes and variables in a clean, organized format.
    pub fn print_structure(&self) {
        println!("\n Dimensions");
        println!("==============");

        let axes: [(&str, usize); 4] = [
            ("date", self.date.len()),
            ("latitude", self.latitude.len()),
            ("longitude", self.longitude.len()),
            ("valid_time", self.valid_time.len()),
        ];
        for (name, len) in axes.iter().filter(|(_, len)| *len > 0) {
            println!("    {} = {}", name, len);
        }

        println!("\n Variables");
        println!("=============");

        if self.variables.is_empty() {
            println!("   (No variables found)");
        } else {
            for (name, var) in &self.variables {
                let data_type = match &var.values {
                    VarValues::Numeric(_) => "float64",
                    VarValues::Text(_) => "str",
                };
                let shape: Vec<String> = var.shape().iter().map(|s| s.to_string()).collect();
                if var.dims.is_empty() {
                    println!("    {} ({}): scalar", name, data_type);
                } else {
                    println!(
                        "    {} ({}): [{}] = ({})",
                        name,
                        data_type,
                        var.dims.join(", "),
                        shape.join(" x ")
                    );
                }
            }
        }
    }
}
