//! Error types for modstore
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::hash::NameHash;
use crate::scalar::ScalarKind;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for modstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Store file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read store file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write store file {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    /// Framing violation found while scanning. The store should not be
    /// trusted past `offset`.
    #[error("Corrupted store at offset {offset}: {reason}")]
    CorruptedStore { offset: usize, reason: String },

    #[error("Unknown type tag 0x{tag:02x} at offset {offset}")]
    UnknownTypeTag { tag: u8, offset: usize },

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("Allocation failure: could not grow store by {requested} bytes")]
    AllocationFailure { requested: usize },

    // -------------------------------------------------------------------------
    // Field Errors
    // -------------------------------------------------------------------------
    #[error("Type mismatch for field {field}: stored {stored:?}, requested {requested:?}")]
    TypeMismatch {
        field: NameHash,
        stored: ScalarKind,
        requested: ScalarKind,
    },

    #[error("Field {field} given more than once")]
    DuplicateField { field: NameHash },
}

impl StoreError {
    pub(crate) fn corrupted(offset: usize, reason: impl Into<String>) -> Self {
        StoreError::CorruptedStore {
            offset,
            reason: reason.into(),
        }
    }

    /// True for errors that mean the buffer contents can no longer be trusted
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StoreError::CorruptedStore { .. } | StoreError::UnknownTypeTag { .. }
        )
    }
}
