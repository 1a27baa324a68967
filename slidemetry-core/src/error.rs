//! Error types for measurement operations.

use thiserror::Error;

/// Result type for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Errors that can occur while measuring slide elements.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// No slide container is attached, so nothing can be measured.
    #[error("No slide container attached")]
    ContainerMissing,

    /// A geometry read failed, e.g. the node left the document mid-capture.
    #[error("Surface detached: {0}")]
    Detached(String),

    /// Snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
