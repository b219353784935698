//! Error types shared across the crate.
//!
//! Exit codes carried by [`AppError`]:
//!
//! - `1`: the sounding itself is unusable (no valid measurements),
//! - `2`: bad invocation, unreadable or unwritable files, invalid configuration,
//! - `4`: internal failure (formatter errors, debug artifacts).

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

/// A sounding with zero usable measurement points.
///
/// Rendered as the fixed string embedded in the machine-readable error
/// document, so callers can match on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError;

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no valid measurements")
    }
}

impl std::error::Error for ValidationError {}

/// Failure inside (or absence of) the iterative inversion backend.
///
/// Callers treat any variant as a signal to fall back to the half-spacing
/// estimator rather than abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The crate was built without the `solver` feature.
    Unavailable,
    /// The solver ran but the numerics broke down.
    Numerical(String),
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::Unavailable => write!(f, "iterative solver not compiled into this build"),
            SolveError::Numerical(detail) => write!(f, "inversion failed: {detail}"),
        }
    }
}

impl std::error::Error for SolveError {}
