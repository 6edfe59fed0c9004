//! Error types for modsweep-inventory

use thiserror::Error;

/// Errors that can occur while rendering a collection report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Structured document serialization failed
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
