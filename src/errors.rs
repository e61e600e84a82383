//! Centralized error handling for tc_text
//!
//! Every failure of a conversion surfaces as a [`TrackTextError`]. Nothing is
//! retried or recovered locally: the binary prints the error and exits with a
//! non-zero status.

use std::fmt;
use std::path::PathBuf;

/// Main error type for tc_text operations
#[derive(Debug)]
pub enum TrackTextError {
    /// The input dataset does not exist
    InputNotFound { path: PathBuf },

    /// The dataset exists but does not have the expected track layout
    MalformedDataset { message: String },

    /// The output text file could not be written
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Variable not found in NetCDF file
    VariableNotFound { var: String },

    /// Configuration is incomplete or inconsistent
    InvalidConfig { message: String },

    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// JSON configuration file could not be parsed
    ConfigParseError(serde_json::Error),

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),
}

impl TrackTextError {
    pub fn malformed(message: impl Into<String>) -> Self {
        TrackTextError::MalformedDataset {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        TrackTextError::InvalidConfig {
            message: message.into(),
        }
    }
}

impl fmt::Display for TrackTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackTextError::InputNotFound { path } => {
                write!(f, "Input dataset not found: {}", path.display())
            }
            TrackTextError::MalformedDataset { message } => {
                write!(f, "Malformed track dataset: {}", message)
            }
            TrackTextError::WriteFailed { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }
            TrackTextError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in file", var)
            }
            TrackTextError::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            TrackTextError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            TrackTextError::IoError(e) => write!(f, "I/O error: {}", e),
            TrackTextError::ConfigParseError(e) => write!(f, "Config file error: {}", e),
            TrackTextError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            TrackTextError::ArrayError(e) => write!(f, "Array error: {}", e),
        }
    }
}

impl std::error::Error for TrackTextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackTextError::WriteFailed { source, .. } => Some(source),
            TrackTextError::NetCDFError(e) => Some(e),
            TrackTextError::IoError(e) => Some(e),
            TrackTextError::ConfigParseError(e) => Some(e),
            TrackTextError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for TrackTextError {
    fn from(error: netcdf::Error) -> Self {
        TrackTextError::NetCDFError(error)
    }
}

impl From<std::io::Error> for TrackTextError {
    fn from(error: std::io::Error) -> Self {
        TrackTextError::IoError(error)
    }
}

impl From<serde_json::Error> for TrackTextError {
    fn from(error: serde_json::Error) -> Self {
        TrackTextError::ConfigParseError(error)
    }
}

impl From<ndarray::ShapeError> for TrackTextError {
    fn from(error: ndarray::ShapeError) -> Self {
        TrackTextError::ArrayError(error)
    }
}

/// Result type alias for tc_text operations
pub type Result<T> = std::result::Result<T, TrackTextError>;
