//! Track model error types

use thiserror::Error;

use crate::capabilities::Capability;

/// Errors a backing track model can report when asked to mutate its rows
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The model is locked against edits (e.g. a locked playlist)
    #[error("Track model is locked")]
    Locked,

    /// A row index outside the current result set
    #[error("Row {row} out of range (row count {row_count})")]
    RowOutOfRange { row: usize, row_count: usize },

    /// The model does not support the requested operation
    #[error("Operation not supported by this model: {0:?}")]
    Unsupported(Capability),
}

/// Result type for track model operations
pub type ModelResult<T> = Result<T, ModelError>;
