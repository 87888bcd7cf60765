use std::path::PathBuf;

use crate::drag::{DragResult, action_for_drop};
use crate::error::{EditError, EditResult};
use crate::{EditorAction, EditorConfig, EditorState, Grid};

/// Receives the grid when the host asks to save. The editor defines no
/// storage format of its own.
pub trait GridSink {
    fn save(&mut self, grid: &Grid) -> anyhow::Result<()>;
}

/// Writes the grid as pretty JSON to a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    pub path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GridSink for JsonFileSink {
    fn save(&mut self, grid: &Grid) -> anyhow::Result<()> {
        grid.save_json_file(&self.path)
    }
}

/// Keeps every saved snapshot in memory. Handy for hosts that forward grids
/// elsewhere, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub saved: Vec<Grid>,
}

impl GridSink for MemorySink {
    fn save(&mut self, grid: &Grid) -> anyhow::Result<()> {
        self.saved.push(grid.clone());
        Ok(())
    }
}

/// A live editing session: the current state plus the edit-mode switch.
///
/// Hosts call [`Editor::dispatch`] once per gesture. A failed dispatch leaves
/// the session exactly as it was.
#[derive(Debug, Clone)]
pub struct Editor {
    state: EditorState,
    pub edit_mode: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorState::default())
    }
}

impl Editor {
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            edit_mode: true,
        }
    }

    pub fn with_grid(grid: Grid, config: &EditorConfig) -> Self {
        Self::new(EditorState::with_config(grid, config))
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn can_undo(&self) -> bool {
        self.edit_mode && self.state.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.edit_mode && self.state.can_redo()
    }

    pub fn dispatch(&mut self, action: &EditorAction) -> EditResult<()> {
        if !self.edit_mode {
            log::warn!("{} rejected: not in edit mode", action.kind());
            return Err(EditError::ReadOnly);
        }

        match self.state.apply(action) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                log::warn!("{} rejected: {e}", action.kind());
                Err(e)
            }
        }
    }

    /// Dispatch whatever a completed drag gesture maps to.
    /// Returns the action that was applied, if any.
    pub fn handle_drop(&mut self, result: &DragResult) -> EditResult<Option<EditorAction>> {
        let Some(action) = action_for_drop(result)? else {
            return Ok(None);
        };
        self.dispatch(&action)?;
        Ok(Some(action))
    }

    /// Hand the current grid to `sink` as one snapshot. Allowed in any mode.
    pub fn save(&self, sink: &mut dyn GridSink) -> anyhow::Result<()> {
        sink.save(&self.state.grid)?;
        log::info!(
            "saved grid: {} columns x {} rows, {} components",
            self.state.grid.columns.len(),
            self.state.grid.rows.len(),
            self.state.grid.component_count()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellCoord, DragKind, DragLocation};

    #[test]
    fn read_only_session_rejects_everything_but_save() -> anyhow::Result<()> {
        let mut ed = Editor::default();
        ed.dispatch(&EditorAction::InsertRow { index: 0 })?;
        ed.edit_mode = false;

        assert_eq!(
            ed.dispatch(&EditorAction::DeleteRow { index: 0 }),
            Err(EditError::ReadOnly)
        );
        assert_eq!(ed.dispatch(&EditorAction::Undo), Err(EditError::ReadOnly));
        assert!(!ed.can_undo());

        let mut sink = MemorySink::default();
        ed.save(&mut sink)?;
        assert_eq!(sink.saved.len(), 1);
        assert_eq!(sink.saved[0].rows.len(), 4);
        Ok(())
    }

    #[test]
    fn failed_dispatch_keeps_state() {
        let mut ed = Editor::default();
        let before = ed.state().clone();
        assert!(ed.dispatch(&EditorAction::DeleteColumn { index: 10 }).is_err());
        assert_eq!(ed.state(), &before);
    }

    #[test]
    fn misaligned_grid_is_reported_not_edited() {
        let mut grid = Grid::with_dimensions(2, 2, 1);
        grid.rows[1].cells.pop_back();
        let mut ed = Editor::with_grid(grid, &EditorConfig::default());
        let before = ed.state().clone();

        assert_eq!(
            ed.dispatch(&EditorAction::MoveColumn {
                source: 1,
                destination: 0
            }),
            Err(EditError::Misaligned {
                row: 1,
                cells: 1,
                columns: 2
            })
        );
        assert_eq!(ed.state(), &before);
    }

    #[test]
    fn handle_drop_dispatches_move() -> anyhow::Result<()> {
        let mut ed = Editor::default();
        let drop = DragResult {
            kind: DragKind::Component,
            source: DragLocation::new(CellCoord::new(0, 0).droppable_id(), 0),
            destination: Some(DragLocation::new(CellCoord::new(2, 2).droppable_id(), 2)),
        };

        let applied = ed.handle_drop(&drop)?;
        assert!(matches!(applied, Some(EditorAction::MoveComponent { .. })));

        let cell = ed.grid().cell(CellCoord::new(2, 2)).unwrap();
        assert_eq!(cell.components[2].id, "comp-0-0-0");
        assert!(ed.can_undo());
        Ok(())
    }

    #[test]
    fn save_snapshots_are_independent_of_later_edits() -> anyhow::Result<()> {
        let mut ed = Editor::default();
        let mut sink = MemorySink::default();
        ed.save(&mut sink)?;
        ed.dispatch(&EditorAction::DeleteRow { index: 0 })?;
        ed.save(&mut sink)?;

        assert_eq!(sink.saved[0].rows.len(), 3);
        assert_eq!(sink.saved[1].rows.len(), 2);
        Ok(())
    }

    #[test]
    fn json_file_sink_writes_loadable_grid() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("grid_core_sink_{}.json", std::process::id()));
        let ed = Editor::default();
        ed.save(&mut JsonFileSink::new(&path))?;
        let loaded = Grid::load_json_file(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(&loaded, ed.grid());
        Ok(())
    }
}
