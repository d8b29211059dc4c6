//! Unified error handling for the kwscope crate
//!
//! Each analyzer owns a domain-specific error type; this module wraps them
//! into a single `Error` enum for callers that drive several analyzers.
//!
//! # Architecture
//!
//! - [`KwscopeErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use kwscope::error::{Error, ErrorCategory, KwscopeErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.category() == ErrorCategory::InsufficientData {
//!         eprintln!("Not enough history yet: {err}");
//!     } else {
//!         eprintln!("Analysis failed: {err}");
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

pub use crate::clustering::ClusteringError;
pub use crate::trend::TrendError;

/// Common trait for all kwscope error types
pub trait KwscopeErrorTrait: std::error::Error {
    /// Check if this error is recoverable (retrying with more or fixed input may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed input rejected at the call boundary
    Input,
    /// Not enough data for the analysis to proceed
    InsufficientData,
    /// Configuration and option validation errors
    Config,
    /// File I/O errors
    Io,
    /// JSON/TOML encoding errors
    Serialization,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short description for the category
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Input => "invalid input",
            Self::InsufficientData => "insufficient data",
            Self::Config => "configuration error",
            Self::Io => "I/O error",
            Self::Serialization => "serialization error",
            Self::Other => "other error",
        }
    }
}

/// Input-shape violations detected before computation begins
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Keyword text is empty or whitespace
    #[error("Keyword must not be empty")]
    EmptyKeyword,

    /// Required text field is empty
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// Numeric field is NaN, infinite or negative
    #[error("Invalid {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Numeric field outside its declared range
    #[error("{field} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A nested record failed validation
    #[error("Invalid record at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: Box<InputError>,
    },
}

impl InputError {
    /// Attach the position of the offending record
    #[must_use]
    pub fn at(self, index: usize) -> Self {
        Self::InvalidRecord {
            index,
            source: Box::new(self),
        }
    }
}

impl KwscopeErrorTrait for InputError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}

/// Unified error type for the kwscope crate
#[derive(Error, Debug)]
pub enum Error {
    /// Boundary validation errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Trend analysis errors
    #[error("Trend error: {0}")]
    Trend(#[from] TrendError),

    /// Clustering errors
    #[error("Clustering error: {0}")]
    Clustering(#[from] ClusteringError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl KwscopeErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Input(e) => e.is_recoverable(),
            Self::Trend(e) => e.is_recoverable(),
            Self::Clustering(e) => e.is_recoverable(),
            Self::Io(_) => true, // I/O errors are often transient
            Self::Json(_) | Self::Toml(_) => false,
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Input(e) => e.category(),
            Self::Trend(e) => e.category(),
            Self::Clustering(e) => e.category(),
            Self::Io(_) => ErrorCategory::Io,
            Self::Json(_) | Self::Toml(_) => ErrorCategory::Serialization,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
