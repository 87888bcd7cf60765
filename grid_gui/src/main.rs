use anyhow::Context;
use eframe::egui;
use grid_core::{CellCoord, Editor, EditorAction, EditorConfig, Grid, JsonFileSink};

const CELL_WIDTH: f32 = 160.0;
const ROW_HEADER_WIDTH: f32 = 90.0;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let grid_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "grid.json".to_string());
    let config_path = std::env::args().nth(2);

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Grid Editor",
        options,
        Box::new(|_cc| Ok(Box::new(GridApp::new(grid_path, config_path)))),
    )
}

/// Carried by egui while a component is being dragged.
#[derive(Debug, Clone, Copy)]
struct DraggedComponent {
    cell: CellCoord,
    index: usize,
}

struct GridApp {
    grid_path: String,
    editor: Editor,
    sink: JsonFileSink,

    // UI state
    last_error: Option<String>,
    status: Option<String>,
}

impl GridApp {
    fn new(grid_path: String, config_path: Option<String>) -> Self {
        let mut last_error = None;

        let config = match config_path {
            Some(p) => EditorConfig::load_json_file(&p)
                .with_context(|| format!("load config file: {p}"))
                .unwrap_or_else(|e| {
                    last_error = Some(format!("{e:#}"));
                    EditorConfig::default()
                }),
            None => EditorConfig::default(),
        };

        // a missing file just means a new grid; it gets created on save
        let grid = match Grid::load_json_file(&grid_path)
            .with_context(|| format!("load grid file: {grid_path}"))
        {
            Ok(g) => g,
            Err(e) => {
                log::warn!("{e:#}; starting from the default grid");
                config.initial_grid()
            }
        };

        Self {
            sink: JsonFileSink::new(&grid_path),
            grid_path,
            editor: Editor::with_grid(grid, &config),
            last_error,
            status: None,
        }
    }

    fn safe_dispatch(&mut self, action: EditorAction) {
        match self.editor.dispatch(&action) {
            Ok(()) => self.last_error = None,
            Err(e) => self.last_error = Some(format!("{}: {e}", action.kind())),
        }
    }

    fn safe_save(&mut self) {
        match self.editor.save(&mut self.sink) {
            Ok(()) => self.status = Some(format!("Saved {}", self.grid_path)),
            Err(e) => self.last_error = Some(format!("{e:#}")),
        }
    }

    fn history_label(&self) -> String {
        let state = self.editor.state();
        format!(
            "{} columns x {} rows | undo: {} redo: {}",
            state.grid.columns.len(),
            state.grid.rows.len(),
            state.history().len(),
            state.future().len()
        )
    }
}

/// Where a dropped component lands in `target`, given the drop position.
/// Dropping on the cell background appends; for the source cell that means the
/// last slot after removal.
fn append_index(grid: &Grid, payload: DraggedComponent, target: CellCoord) -> usize {
    let len = grid.cell(target).map(|c| c.components.len()).unwrap_or(0);
    if payload.cell == target {
        len.saturating_sub(1)
    } else {
        len
    }
}

/// Where a component dropped onto item `hovered` of `target` lands: just
/// before that item. In its own cell, items after the source shift up by one
/// once it is removed.
fn item_drop_index(payload: DraggedComponent, target: CellCoord, hovered: usize) -> usize {
    if payload.cell == target && payload.index < hovered {
        hovered - 1
    } else {
        hovered
    }
}

impl eframe::App for GridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut pending: Option<EditorAction> = None;
        let mut save = false;

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Grid Editor");
                ui.separator();
                ui.label(format!("File: {}", self.grid_path));
            });

            ui.horizontal(|ui| {
                ui.checkbox(&mut self.editor.edit_mode, "Edit mode");
                ui.separator();

                if self.editor.edit_mode {
                    if ui
                        .add_enabled(self.editor.can_undo(), egui::Button::new("Undo"))
                        .clicked()
                    {
                        pending = Some(EditorAction::Undo);
                    }
                    if ui
                        .add_enabled(self.editor.can_redo(), egui::Button::new("Redo"))
                        .clicked()
                    {
                        pending = Some(EditorAction::Redo);
                    }
                    if ui.button("Insert Row").clicked() {
                        pending = Some(EditorAction::InsertRow {
                            index: self.editor.grid().rows.len(),
                        });
                    }
                    if ui.button("Insert Column").clicked() {
                        pending = Some(EditorAction::InsertColumn {
                            index: self.editor.grid().columns.len(),
                        });
                    }
                    ui.separator();
                }

                if ui.button("Save").clicked() {
                    save = true;
                }
            });

            ui.label(self.history_label());

            if let Some(err) = &self.last_error {
                ui.colored_label(egui::Color32::RED, format!("Error: {err}"));
            } else if let Some(msg) = &self.status {
                ui.label(msg);
            }
        });

        // persistent vectors: this clone is cheap and frees `self` for the panels
        let grid = self.editor.grid().clone();
        let edit = self.editor.edit_mode;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                // column header
                ui.horizontal(|ui| {
                    ui.add_space(ROW_HEADER_WIDTH);
                    let count = grid.columns.len();
                    for (c, col) in grid.columns.iter().enumerate() {
                        ui.group(|ui| {
                            ui.set_width(CELL_WIDTH);
                            ui.horizontal(|ui| {
                                ui.strong(&col.title);
                                if !edit {
                                    return;
                                }
                                if ui.add_enabled(c > 0, egui::Button::new("<").small()).clicked() {
                                    pending = Some(EditorAction::MoveColumn {
                                        source: c,
                                        destination: c - 1,
                                    });
                                }
                                if ui
                                    .add_enabled(c + 1 < count, egui::Button::new(">").small())
                                    .clicked()
                                {
                                    pending = Some(EditorAction::MoveColumn {
                                        source: c,
                                        destination: c + 1,
                                    });
                                }
                                if ui.small_button("x").clicked() {
                                    pending = Some(EditorAction::DeleteColumn { index: c });
                                }
                            });
                        });
                    }
                });

                let row_count = grid.rows.len();
                for (r, row) in grid.rows.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.set_width(ROW_HEADER_WIDTH);
                            ui.strong(&row.id);
                            if !edit {
                                return;
                            }
                            ui.horizontal(|ui| {
                                if ui.add_enabled(r > 0, egui::Button::new("^").small()).clicked() {
                                    pending = Some(EditorAction::MoveRow {
                                        source: r,
                                        destination: r - 1,
                                    });
                                }
                                if ui
                                    .add_enabled(r + 1 < row_count, egui::Button::new("v").small())
                                    .clicked()
                                {
                                    pending = Some(EditorAction::MoveRow {
                                        source: r,
                                        destination: r + 1,
                                    });
                                }
                                if ui.small_button("x").clicked() {
                                    pending = Some(EditorAction::DeleteRow { index: r });
                                }
                            });
                        });

                        for (c, cell) in row.cells.iter().enumerate() {
                            let coord = CellCoord::new(r, c);
                            let frame = egui::Frame::default()
                                .inner_margin(4.0)
                                .stroke(ui.visuals().widgets.noninteractive.bg_stroke);

                            let (zone, dropped) =
                                ui.dnd_drop_zone::<DraggedComponent, _>(frame, |ui| {
                                    ui.set_width(CELL_WIDTH);
                                    ui.set_min_height(40.0);

                                    let mut on_item = None;
                                    for (i, comp) in cell.components.iter().enumerate() {
                                        if !edit {
                                            ui.label(&comp.content);
                                            continue;
                                        }

                                        let item = ui
                                            .horizontal(|ui| {
                                                let id = egui::Id::new(("component", comp.id.as_str()));
                                                let payload = DraggedComponent { cell: coord, index: i };
                                                let handle = ui
                                                    .dnd_drag_source(id, payload, |ui| {
                                                        ui.label(&comp.content);
                                                    })
                                                    .response;
                                                if ui.small_button("x").clicked() {
                                                    pending = Some(EditorAction::delete_component(coord, i));
                                                }
                                                handle
                                            })
                                            .inner;

                                        if let Some(payload) = item.dnd_release_payload::<DraggedComponent>() {
                                            on_item = Some((*payload, item_drop_index(*payload, coord, i)));
                                        }
                                    }
                                    on_item
                                });

                            let target = match (zone.inner, dropped) {
                                (Some((payload, i)), _) => Some((payload, i)),
                                (None, Some(payload)) => {
                                    Some((*payload, append_index(&grid, *payload, coord)))
                                }
                                (None, None) => None,
                            };

                            if let Some((payload, index)) = target {
                                pending = Some(EditorAction::move_component(
                                    payload.cell,
                                    payload.index,
                                    coord,
                                    index,
                                ));
                            }
                        }
                    });
                }
            });
        });

        if let Some(action) = pending {
            self.status = None;
            self.safe_dispatch(action);
        }
        if save {
            self.safe_save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_index_accounts_for_removal_in_same_cell() {
        let grid = Grid::with_dimensions(2, 1, 3);
        let payload = DraggedComponent {
            cell: CellCoord::new(0, 0),
            index: 1,
        };
        assert_eq!(append_index(&grid, payload, CellCoord::new(0, 0)), 2);
        assert_eq!(append_index(&grid, payload, CellCoord::new(0, 1)), 3);
    }

    #[test]
    fn drop_on_item_lands_before_it() -> anyhow::Result<()> {
        let at = CellCoord::new(0, 0);
        let first = DraggedComponent { cell: at, index: 0 };
        let last = DraggedComponent { cell: at, index: 2 };

        // same cell, dragging down onto the last item
        assert_eq!(item_drop_index(first, at, 2), 1);
        // same cell, dragging up onto the first item
        assert_eq!(item_drop_index(last, at, 0), 0);
        // other cell: no removal to account for
        assert_eq!(item_drop_index(first, CellCoord::new(0, 1), 2), 2);

        let mut editor = Editor::with_grid(Grid::with_dimensions(1, 1, 3), &EditorConfig::default());
        let index = item_drop_index(first, at, 2);
        editor.dispatch(&EditorAction::move_component(at, 0, at, index))?;

        let cell = editor.grid().cell(at).context("cell (0,0)")?;
        let ids: Vec<&str> = cell.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["comp-0-0-1", "comp-0-0-0", "comp-0-0-2"]);
        Ok(())
    }

    #[test]
    fn appended_move_is_accepted_by_the_editor() -> anyhow::Result<()> {
        let mut editor = Editor::with_grid(Grid::with_dimensions(2, 1, 3), &EditorConfig::default());
        let payload = DraggedComponent {
            cell: CellCoord::new(0, 0),
            index: 0,
        };
        let to = CellCoord::new(0, 0);
        let index = append_index(editor.grid(), payload, to);
        editor.dispatch(&EditorAction::move_component(payload.cell, payload.index, to, index))?;

        let cell = editor.grid().cell(to).context("cell (0,0)")?;
        assert_eq!(cell.components[2].id, "comp-0-0-0");
        Ok(())
    }
}
