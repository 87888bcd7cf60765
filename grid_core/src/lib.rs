//! Structural grid editor: a grid of rows and columns whose cells hold ordered,
//! draggable components, edited through a pure reducer with linear undo/redo.

pub mod action;
pub mod command;
pub mod config;
pub mod coords;
pub mod drag;
pub mod error;
pub mod history;
pub mod model;
pub mod reducer;
pub mod session;

pub use action::EditorAction;
pub use config::EditorConfig;
pub use coords::{CellCoord, parse_droppable_id};
pub use drag::{DragKind, DragLocation, DragResult, action_for_drop};
pub use error::{EditError, EditResult, IndexTarget};
pub use history::History;
pub use model::{Cell, Column, Component, Grid, Row};
pub use reducer::{EditorState, reduce};
pub use session::{Editor, GridSink, JsonFileSink, MemorySink};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
