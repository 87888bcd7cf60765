use serde::{Deserialize, Serialize};

use crate::coords::CellCoord;

/// Everything the reducer understands. One action per dispatch.
///
/// Wire form is a JSON object tagged by `type`, e.g.
/// `{"type": "MOVE_COMPONENT", "sourceRow": 0, "sourceColumn": 1, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditorAction {
    MoveColumn {
        source: usize,
        destination: usize,
    },
    MoveRow {
        source: usize,
        destination: usize,
    },
    /// When source and destination are the same cell, `destination_index` is
    /// an index into the list *after* the component has been removed.
    #[serde(rename_all = "camelCase")]
    MoveComponent {
        source_row: usize,
        source_column: usize,
        source_index: usize,
        destination_row: usize,
        destination_column: usize,
        destination_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    DeleteComponent {
        row_index: usize,
        column_index: usize,
        component_index: usize,
    },
    InsertRow {
        index: usize,
    },
    DeleteRow {
        index: usize,
    },
    InsertColumn {
        index: usize,
    },
    DeleteColumn {
        index: usize,
    },
    Undo,
    Redo,
}

impl EditorAction {
    /// Typed form of `MoveComponent`, for hosts that already know cell coordinates.
    pub fn move_component(
        from: CellCoord,
        source_index: usize,
        to: CellCoord,
        destination_index: usize,
    ) -> Self {
        EditorAction::MoveComponent {
            source_row: from.row,
            source_column: from.column,
            source_index,
            destination_row: to.row,
            destination_column: to.column,
            destination_index,
        }
    }

    pub fn delete_component(cell: CellCoord, component_index: usize) -> Self {
        EditorAction::DeleteComponent {
            row_index: cell.row,
            column_index: cell.column,
            component_index,
        }
    }

    /// True for every action that changes the grid and records history.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, EditorAction::Undo | EditorAction::Redo)
    }

    /// The wire tag, e.g. `MOVE_COLUMN`.
    pub fn kind(&self) -> &'static str {
        match self {
            EditorAction::MoveColumn { .. } => "MOVE_COLUMN",
            EditorAction::MoveRow { .. } => "MOVE_ROW",
            EditorAction::MoveComponent { .. } => "MOVE_COMPONENT",
            EditorAction::DeleteComponent { .. } => "DELETE_COMPONENT",
            EditorAction::InsertRow { .. } => "INSERT_ROW",
            EditorAction::DeleteRow { .. } => "DELETE_ROW",
            EditorAction::InsertColumn { .. } => "INSERT_COLUMN",
            EditorAction::DeleteColumn { .. } => "DELETE_COLUMN",
            EditorAction::Undo => "UNDO",
            EditorAction::Redo => "REDO",
        }
    }
}
