use std::sync::Arc;

use im::Vector;

use crate::error::{EditError, EditResult, IndexTarget, check_index, check_insert_index};
use crate::{Cell, Column, Component, EditorAction, EditorConfig, Grid, History, Row};

/// Everything the editor knows: the current grid plus its undo/redo history.
///
/// A value type. [`reduce`] never touches its input; it hands back a new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub grid: Grid,
    history: History,
    /// Highest number used so far when minting ids for inserted items.
    next_id: u64,
    placeholder: Arc<str>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl EditorState {
    /// Start editing `grid` with default settings.
    pub fn new(grid: Grid) -> Self {
        Self::with_config(grid, &EditorConfig::default())
    }

    pub fn with_config(grid: Grid, config: &EditorConfig) -> Self {
        Self {
            next_id: grid.id_watermark(),
            grid,
            history: History::new(config.history_limit),
            placeholder: Arc::from(config.placeholder_content.as_str()),
        }
    }

    /// Start from the configured default grid.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_config(config.initial_grid(), config)
    }

    /// Grids that `Undo` would restore, oldest first.
    pub fn history(&self) -> &Vector<Grid> {
        self.history.past()
    }

    /// Grids that `Redo` would restore, nearest first.
    pub fn future(&self) -> &Vector<Grid> {
        self.history.future()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn apply(&self, action: &EditorAction) -> EditResult<EditorState> {
        reduce(self, action)
    }

    fn mint_id(&mut self, prefix: &'static str) -> EditResult<String> {
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(EditError::IdsExhausted(prefix))?;
        Ok(format!("{prefix}-{}", self.next_id))
    }

    fn placeholder_cell(&mut self) -> EditResult<Cell> {
        let cell_id = self.mint_id("cell")?;
        let comp_id = self.mint_id("comp")?;
        Ok(Cell::new(cell_id, [Component::new(comp_id, &*self.placeholder)]))
    }
}

/// Apply one action and return the next state.
///
/// Structural actions push the pre-edit grid onto the history and clear the
/// redo stack. `Undo`/`Redo` with an empty stack return an identical state.
/// Any out-of-range index fails with `InvalidIndex` before anything is built,
/// so a rejected action never leaves a half-edited grid behind. A grid whose
/// rows do not line up with its columns is refused with `Misaligned`.
pub fn reduce(state: &EditorState, action: &EditorAction) -> EditResult<EditorState> {
    // `grid` is public, so alignment is rechecked on every call
    state.grid.validate()?;
    let mut next = state.clone();

    match *action {
        EditorAction::MoveColumn {
            source,
            destination,
        } => move_column(&mut next.grid, source, destination)?,

        EditorAction::MoveRow {
            source,
            destination,
        } => move_row(&mut next.grid, source, destination)?,

        EditorAction::MoveComponent {
            source_row,
            source_column,
            source_index,
            destination_row,
            destination_column,
            destination_index,
        } => move_component(
            &mut next.grid,
            (source_row, source_column, source_index),
            (destination_row, destination_column, destination_index),
        )?,

        EditorAction::DeleteComponent {
            row_index,
            column_index,
            component_index,
        } => delete_component(&mut next.grid, row_index, column_index, component_index)?,

        EditorAction::InsertRow { index } => insert_row(&mut next, index)?,

        EditorAction::DeleteRow { index } => {
            check_index(IndexTarget::Row, index, next.grid.rows.len())?;
            next.grid.rows.remove(index);
        }

        EditorAction::InsertColumn { index } => insert_column(&mut next, index)?,

        EditorAction::DeleteColumn { index } => delete_column(&mut next.grid, index)?,

        // history moves are not edits themselves and are never recorded
        EditorAction::Undo => {
            match next.history.undo(&state.grid) {
                Some(grid) => next.grid = grid,
                None => log::trace!("undo: history empty, nothing to do"),
            }
            return Ok(next);
        }
        EditorAction::Redo => {
            match next.history.redo(&state.grid) {
                Some(grid) => next.grid = grid,
                None => log::trace!("redo: future empty, nothing to do"),
            }
            return Ok(next);
        }
    }

    next.history.record(state.grid.clone());
    log::debug!(
        "{}: grid now {} columns x {} rows, {} undo entries",
        action.kind(),
        next.grid.columns.len(),
        next.grid.rows.len(),
        next.history.past().len()
    );
    Ok(next)
}

fn move_column(grid: &mut Grid, source: usize, destination: usize) -> EditResult<()> {
    let len = grid.columns.len();
    check_index(IndexTarget::Column, source, len)?;
    check_index(IndexTarget::Column, destination, len)?;

    let column = grid.columns.remove(source);
    grid.columns.insert(destination, column);

    // same splice on every row keeps cells[i] under columns[i]
    for row in grid.rows.iter_mut() {
        let cell = row.cells.remove(source);
        row.cells.insert(destination, cell);
    }
    Ok(())
}

fn move_row(grid: &mut Grid, source: usize, destination: usize) -> EditResult<()> {
    let len = grid.rows.len();
    check_index(IndexTarget::Row, source, len)?;
    check_index(IndexTarget::Row, destination, len)?;

    let row = grid.rows.remove(source);
    grid.rows.insert(destination, row);
    Ok(())
}

/// `(row, column, index)` of one component slot.
type Slot = (usize, usize, usize);

fn move_component(grid: &mut Grid, from: Slot, to: Slot) -> EditResult<()> {
    let (sr, sc, si) = from;
    let (dr, dc, di) = to;

    check_cell(grid, sr, sc)?;
    check_cell(grid, dr, dc)?;

    let source_len = grid.rows[sr].cells[sc].components.len();
    check_index(IndexTarget::Component, si, source_len)?;

    // destination index is expressed after the removal
    let dest_len = if (sr, sc) == (dr, dc) {
        source_len - 1
    } else {
        grid.rows[dr].cells[dc].components.len()
    };
    check_insert_index(IndexTarget::Component, di, dest_len)?;

    let component = grid.rows[sr].cells[sc].components.remove(si);
    grid.rows[dr].cells[dc].components.insert(di, component);
    Ok(())
}

fn delete_component(grid: &mut Grid, row: usize, column: usize, index: usize) -> EditResult<()> {
    check_cell(grid, row, column)?;
    let components = &mut grid.rows[row].cells[column].components;
    check_index(IndexTarget::Component, index, components.len())?;
    components.remove(index);
    Ok(())
}

fn insert_row(state: &mut EditorState, index: usize) -> EditResult<()> {
    check_insert_index(IndexTarget::Row, index, state.grid.rows.len())?;

    let row_id = state.mint_id("row")?;
    let cells = (0..state.grid.columns.len())
        .map(|_| state.placeholder_cell())
        .collect::<EditResult<Vec<Cell>>>()?;

    state.grid.rows.insert(index, Row::new(row_id, cells));
    Ok(())
}

fn insert_column(state: &mut EditorState, index: usize) -> EditResult<()> {
    check_insert_index(IndexTarget::Column, index, state.grid.columns.len())?;

    let title = format!("Column {}", state.grid.columns.len() + 1);
    let column = Column::new(state.mint_id("column")?, title);

    // build every new cell first so the grid is touched in one pass
    let cells = (0..state.grid.rows.len())
        .map(|_| state.placeholder_cell())
        .collect::<EditResult<Vec<Cell>>>()?;

    state.grid.columns.insert(index, column);
    for (row, cell) in state.grid.rows.iter_mut().zip(cells) {
        row.cells.insert(index, cell);
    }
    Ok(())
}

fn delete_column(grid: &mut Grid, index: usize) -> EditResult<()> {
    check_index(IndexTarget::Column, index, grid.columns.len())?;

    grid.columns.remove(index);
    for row in grid.rows.iter_mut() {
        row.cells.remove(index);
    }
    Ok(())
}

fn check_cell(grid: &Grid, row: usize, column: usize) -> EditResult<()> {
    check_index(IndexTarget::Row, row, grid.rows.len())?;
    check_index(IndexTarget::Column, column, grid.columns.len())
}
