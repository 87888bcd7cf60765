//! Editor error types

use std::fmt;
use thiserror::Error;

/// Which list an index was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    Column,
    Row,
    Component,
}

impl fmt::Display for IndexTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexTarget::Column => f.write_str("column"),
            IndexTarget::Row => f.write_str("row"),
            IndexTarget::Component => f.write_str("component"),
        }
    }
}

/// Errors raised while applying an action to the grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// An index argument fell outside the list it addresses
    #[error("invalid {target} index {index} (length {len})")]
    InvalidIndex {
        target: IndexTarget,
        index: usize,
        len: usize,
    },

    /// A drop-target identifier did not have the `components-row-<r>-col-<c>` shape
    #[error("invalid droppable identifier format: {0:?}")]
    InvalidDroppableId(String),

    /// A row's cell list is not aligned with the column list
    #[error("row {row} has {cells} cells but the grid has {columns} columns")]
    Misaligned {
        row: usize,
        cells: usize,
        columns: usize,
    },

    /// Every number above the grid's existing ids has been handed out
    #[error("no fresh {0} id available: existing ids already use the largest number")]
    IdsExhausted(&'static str),

    /// A structural edit was attempted while the editor is not in edit mode
    #[error("editor is not in edit mode")]
    ReadOnly,
}

/// Result type for editor operations
pub type EditResult<T> = Result<T, EditError>;

/// Fails with `InvalidIndex` unless `index < len`.
pub(crate) fn check_index(target: IndexTarget, index: usize, len: usize) -> EditResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::InvalidIndex { target, index, len })
    }
}

/// Like [`check_index`], but `index == len` (append position) is allowed.
pub(crate) fn check_insert_index(target: IndexTarget, index: usize, len: usize) -> EditResult<()> {
    if index <= len {
        Ok(())
    } else {
        Err(EditError::InvalidIndex { target, index, len })
    }
}
