//! Error types for the Toolsmith inventory system
//!
//! This module provides structured error definitions using thiserror, with
//! anyhow bridging for errors raised at the binary edges.

use thiserror::Error;

/// Main error type for Toolsmith operations
#[derive(Error, Debug)]
pub enum ToolsmithError {
    /// Requested tool id has no matching record
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Input rejected before touching the store (missing/empty field, bad shape)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file exists but does not parse as an inventory document
    #[error("Malformed inventory document: {0}")]
    MalformedDocument(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Toolsmith operations
pub type Result<T> = std::result::Result<T, ToolsmithError>;

/// Convert anyhow::Error to ToolsmithError
impl From<anyhow::Error> for ToolsmithError {
    fn from(err: anyhow::Error) -> Self {
        ToolsmithError::Other(err.to_string())
    }
}
