// Error types for the drum analyzer
//
// This module defines the error type surfaced by the decoding and analysis
// pipeline, with stable numeric codes so the CLI and HTTP layers can report
// failures consistently.

use log::error;
use std::fmt;
use std::path::Path;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent rendering across the
/// CLI and HTTP front-ends.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Log an analysis error with structured context
///
/// Emits the error code, the component where the error surfaced and the
/// human-readable message.
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=SampleAnalyzer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Analysis-related errors
///
/// `FileNotFound` and `NotADirectory` are top-level failures of the
/// single-file and batch entry points. `DecodeFailed` is raised per file and
/// becomes an error record during batch analysis.
///
/// Error code range: 3001-3005
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Single-file entry point was given a path that is not an existing file
    FileNotFound { path: String },

    /// Batch entry point was given a path that is not an existing directory
    NotADirectory { path: String },

    /// Audio file could not be opened, parsed or decoded
    DecodeFailed { path: String, reason: String },

    /// Underlying filesystem error
    Io { details: String },

    /// Configuration values are out of range
    InvalidConfig { reason: String },
}

impl AnalysisError {
    pub fn file_not_found(path: &Path) -> Self {
        AnalysisError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn not_a_directory(path: &Path) -> Self {
        AnalysisError::NotADirectory {
            path: path.display().to_string(),
        }
    }

    pub fn decode_failed(path: &Path, reason: impl fmt::Display) -> Self {
        AnalysisError::DecodeFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::FileNotFound { .. } => 3001,
            AnalysisError::NotADirectory { .. } => 3002,
            AnalysisError::DecodeFailed { .. } => 3003,
            AnalysisError::Io { .. } => 3004,
            AnalysisError::InvalidConfig { .. } => 3005,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::FileNotFound { path } => {
                format!("Audio file not found: {}", path)
            }
            AnalysisError::NotADirectory { path } => format!("Not a directory: {}", path),
            AnalysisError::DecodeFailed { path, reason } => {
                format!("Failed to decode {}: {}", path, reason)
            }
            AnalysisError::Io { details } => format!("I/O error: {}", details),
            AnalysisError::InvalidConfig { reason } => {
                format!("Invalid configuration: {}", reason)
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for AnalysisError {}

/// Convert from std::io::Error to AnalysisError
impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io {
            details: err.to_string(),
        }
    }
}
