//! Error types for the vectorization pipeline

use thiserror::Error;

/// Main error type for vectorization operations.
///
/// Per the pipeline's error-handling design, only input validation ever
/// surfaces an error to the caller: numeric degeneracies (singular circle
/// fits, zero-length tangents) and extractor failures (k-means
/// non-convergence) are neutralized locally with fallbacks and never
/// constructed as `AlgorithmError`. The variant exists for genuinely
/// unrecoverable internal states so the type stays honest about `Result`.
#[derive(Error, Debug)]
pub enum VectorizeError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("algorithm error: {message}")]
    AlgorithmError { message: String },
}

impl VectorizeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn algorithm_error(message: impl Into<String>) -> Self {
        Self::AlgorithmError {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type VectorizeResult<T> = Result<T, VectorizeError>;
