//! Error types for the audit crate.
//!
//! Appending and querying never fail; these errors only surface while
//! constructing a log or while mirroring entries to an output stream.

use thiserror::Error;

/// Errors that can occur during audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The configured capacity cannot hold any entry.
    #[error("invalid audit log capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),

    /// Failed to mirror an entry to its output stream.
    #[error("failed to mirror audit entry: {0}")]
    MirrorFailed(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
