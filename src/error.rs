//! Error types shared by the simulation core

use thiserror::Error;

/// Errors raised by the simulation core
///
/// Every variant is fatal to the current run. Numerical divergence is not
/// represented here: overflow and NaN flow through to the output sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Sequence '{sequence}' has length {actual}, expected {expected}")]
    ShapeMismatch {
        sequence: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown signal kind '{0}' (expected rectangular, triangular or harmonic)")]
    UnknownSignalKind(String),

    #[error("Division by zero: {0} must be non-zero")]
    DivisionByZero(&'static str),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SimError::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    pub(crate) fn check_len(
        sequence: &'static str,
        expected: usize,
        actual: usize,
    ) -> Result<(), SimError> {
        if expected == actual {
            Ok(())
        } else {
            Err(SimError::ShapeMismatch {
                sequence,
                expected,
                actual,
            })
        }
    }
}

/// Convenience alias used throughout the crate
pub type SimResult<T> = Result<T, SimError>;
