use serde::{Deserialize, Serialize};

use crate::EditorAction;
use crate::coords::parse_droppable_id;
use crate::error::EditResult;

/// What was dragged. Selects which move action a drop turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DragKind {
    Column,
    Row,
    Component,
}

/// One end of a drag: the drop target's identifier and the index inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragLocation {
    pub droppable_id: String,
    pub index: usize,
}

impl DragLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }
}

/// A completed gesture as reported by the drag host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragResult {
    #[serde(rename = "type")]
    pub kind: DragKind,
    pub source: DragLocation,
    /// `None` when the item was dropped outside every target.
    pub destination: Option<DragLocation>,
}

/// Turn a finished drag into the action to dispatch.
///
/// Returns `Ok(None)` for a cancelled drop. Droppable identifiers are only
/// decoded for component drags; a malformed one is an integration bug and
/// fails with `InvalidDroppableId`.
pub fn action_for_drop(result: &DragResult) -> EditResult<Option<EditorAction>> {
    let Some(destination) = &result.destination else {
        log::trace!("drop of {:?} cancelled", result.kind);
        return Ok(None);
    };

    let action = match result.kind {
        DragKind::Column => EditorAction::MoveColumn {
            source: result.source.index,
            destination: destination.index,
        },
        DragKind::Row => EditorAction::MoveRow {
            source: result.source.index,
            destination: destination.index,
        },
        DragKind::Component => {
            let from = parse_droppable_id(&result.source.droppable_id)?;
            let to = parse_droppable_id(&destination.droppable_id)?;
            EditorAction::move_component(from, result.source.index, to, destination.index)
        }
    };

    Ok(Some(action))
}
