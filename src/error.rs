//! Error types.
//!
//! Two layers:
//!
//! - [`NumericError`]: typed failures of the numerical core (interpolation,
//!   peak finding, least squares). Library callers can match on these.
//! - [`AppError`]: what the binary reports. Carries a process exit code:
//!   `2` invalid input, `3` no usable data, `4` numeric/fit failure.

use thiserror::Error;

/// Failures of the numerical routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumericError {
    /// Not enough samples for the requested method.
    #[error("not enough data points: need at least {needed}, got {got}")]
    TooFewPoints { needed: usize, got: usize },
    /// `x` and `y` inputs differ in length.
    #[error("x and y must have the same length (x: {x_len}, y: {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },
    /// Two samples share the same x value.
    #[error("duplicate x value at indices {first} and {second}")]
    DuplicateX { first: usize, second: usize },
    /// An input value is NaN or infinite.
    #[error("non-finite input value at index {index}")]
    NonFinite { index: usize },
    /// A curve passed to the peak finder has fewer than two points.
    #[error("curve must have at least 2 points to define a FWHM, got {got}")]
    CurveTooShort { got: usize },
    /// A linear system could not be solved.
    #[error("singular or near-singular system")]
    Singular,
    /// An iterative solver did not converge.
    #[error("no convergence after {iterations} iterations")]
    MaxIterations { iterations: usize },
}

impl NumericError {
    /// Exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            NumericError::Singular | NumericError::MaxIterations { .. } => 4,
            _ => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    /// Wrap a numeric error with context about where it happened.
    pub fn numeric(context: &str, err: NumericError) -> Self {
        Self::new(err.exit_code(), format!("{context}: {err}"))
    }
}

impl From<NumericError> for AppError {
    fn from(err: NumericError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
