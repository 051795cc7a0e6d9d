//! Error types for the host-service boundary.

use thiserror::Error;

/// Failures surfaced by the browser host services.
///
/// None of these are fatal: every caller in the pipeline degrades to
/// "skip this one update" and logs at debug level.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("storage backend: {0}")]
    Storage(String),

    #[error("tab capture: {0}")]
    Capture(String),

    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
}
