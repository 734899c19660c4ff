//! # Error Types
//!
//! Structured error types for calc_core. Arithmetic failures never cross the
//! engine boundary (the engine folds them into the error display state), but
//! the arithmetic, parsing and settings APIs report them through [`CalcError`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//! use calc_core::operation::Operation;
//! use rust_decimal::Decimal;
//!
//! let result: CalcResult<Decimal> = Operation::Divide.apply(Decimal::ONE, Decimal::ZERO);
//! assert_eq!(result, Err(CalcError::DivisionByZero));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Division with a zero divisor
    #[error("Division by zero")]
    DivisionByZero,

    /// Result does not fit the decimal representation
    #[error("Arithmetic overflow: {operation}")]
    Overflow { operation: String },

    /// Result is too small to keep the context's significant digits
    #[error("Arithmetic underflow: {operation}")]
    Underflow { operation: String },

    /// A number literal could not be parsed
    #[error("Invalid input '{value}': {reason}")]
    InvalidInput { value: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an Overflow error
    pub fn overflow(operation: impl Into<String>) -> Self {
        CalcError::Overflow {
            operation: operation.into(),
        }
    }

    /// Create an Underflow error
    pub fn underflow(operation: impl Into<String>) -> Self {
        CalcError::Underflow {
            operation: operation.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::DivisionByZero => "DIVISION_BY_ZERO",
            CalcError::Overflow { .. } => "OVERFLOW",
            CalcError::Underflow { .. } => "UNDERFLOW",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
