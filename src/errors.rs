//! Centralized error handling for AnomVis
//!
//! This module provides structured error types instead of a generic
//! `Box<dyn Error>`, enabling better error context and type safety.

use std::fmt;

/// Main error type for AnomVis operations
#[derive(Debug)]
pub enum AnomVisError {
    /// Variable not found in the dataset
    VariableNotFound { var: String },

    /// Dimension not found in variable
    DimensionNotFound { var: String, dim: String },

    /// Coordinate value not found on an axis
    CoordinateNotFound { coord: String, value: String },

    /// Unsupported aggregation or ranking method tag
    UnsupportedMethod { method: String },

    /// Date range selection yielded no dates
    EmptyDateRange { start: String, end: String },

    /// Variable shape does not match the dataset's coordinate axes
    ShapeMismatch { var: String, message: String },

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Statistics computation errors
    StatisticsError(String),

    /// Plot rendering errors
    PlotError(String),

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Generic error for backward compatibility
    Generic(String),
}

impl fmt::Display for AnomVisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomVisError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in dataset", var)
            }
            AnomVisError::DimensionNotFound { var, dim } => {
                write!(f, "Dimension '{}' not found in variable '{}'", dim, var)
            }
            AnomVisError::CoordinateNotFound { coord, value } => {
                write!(f, "Value '{}' not found on coordinate axis '{}'", value, coord)
            }
            AnomVisError::UnsupportedMethod { method } => {
                write!(f, "Unsupported method '{}'", method)
            }
            AnomVisError::EmptyDateRange { start, end } => {
                write!(f, "No dates fall within the range {} to {}", start, end)
            }
            AnomVisError::ShapeMismatch { var, message } => {
                write!(f, "Shape mismatch for variable '{}': {}", var, message)
            }
            AnomVisError::ArrayError(e) => write!(f, "Array error: {}", e),
            AnomVisError::StatisticsError(msg) => {
                write!(f, "Statistics computation error: {}", msg)
            }
            AnomVisError::PlotError(msg) => write!(f, "Plot rendering error: {}", msg),
            AnomVisError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            AnomVisError::IoError(e) => write!(f, "I/O error: {}", e),
            AnomVisError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AnomVisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnomVisError::ArrayError(e) => Some(e),
            AnomVisError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ndarray::ShapeError> for AnomVisError {
    fn from(error: ndarray::ShapeError) -> Self {
        AnomVisError::ArrayError(error)
    }
}

impl From<std::io::Error> for AnomVisError {
    fn from(error: std::io::Error) -> Self {
        AnomVisError::IoError(error)
    }
}

impl From<String> for AnomVisError {
    fn from(error: String) -> Self {
        AnomVisError::Generic(error)
    }
}

impl From<&str> for AnomVisError {
    fn from(error: &str) -> Self {
        AnomVisError::Generic(error.to_string())
    }
}

/// Result type alias for AnomVis operations
pub type Result<T> = std::result::Result<T, AnomVisError>;
