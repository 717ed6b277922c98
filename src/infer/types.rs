//! Inference error types

use thiserror::Error;

/// Why an inference attempt produced no schema
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("no inference provider configured")]
    NotConfigured,
    #[error("inference API error: {0}")]
    Api(String),
    #[error("invalid inference response: {0}")]
    InvalidResponse(String),
}
