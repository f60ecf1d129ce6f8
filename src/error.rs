//! Error types for spinlog

use thiserror::Error;

/// Errors that can occur outside the builders' never-fail contract.
///
/// Field-level parse gaps are not errors: builders resolve them to absent
/// fields and always return a record. Anything surfacing here is either a
/// caller contract violation or a collaborator-facing failure (state
/// serialization, alert delivery).
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to load tracker state: {0}")]
    StateError(String),

    #[error("Alert delivery failed: {0}")]
    DispatchError(String),
}
