use crate::minimize::ObjectiveError;

pub type Result<T> = std::result::Result<T, MinimizerError>;

/// Error types for the simplex minimizers
#[derive(Debug, thiserror::Error)]
pub enum MinimizerError {
    /// Returned when a point is empty or does not match the expected dimension.
    #[error("invalid dimension: expected {expected}, got {got}")]
    InvalidDimension { expected: usize, got: usize },

    /// Returned when the initial point has a NaN or infinite coordinate.
    #[error("initial point must have finite coordinates")]
    InvalidInitialPoint,

    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f64),

    #[error("tolerance must be non-negative, got {0}")]
    InvalidTolerance(f64),

    /// Returned when the multi-start sampling interval is empty or not finite.
    #[error("invalid bounds: lower ({lower}) must be finite and not greater than upper ({upper})")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The objective function itself failed. The original error is kept as the source.
    #[error("objective evaluation failed: {0}")]
    Objective(#[source] ObjectiveError),
}

impl MinimizerError {
    /// Recover the objective's own error when this is an [`MinimizerError::Objective`].
    pub fn into_objective_error(self) -> Option<ObjectiveError> {
        match self {
            MinimizerError::Objective(e) => Some(e),
            _ => None,
        }
    }
}
