use anyhow::Context;
use im::Vector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::coords::CellCoord;
use crate::error::{EditError, EditResult};

/// The smallest draggable unit. Owned by exactly one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub content: String,
}

impl Component {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// The intersection of one row and one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    #[serde(default)]
    pub components: Vector<Component>,
}

impl Cell {
    pub fn new(id: impl Into<String>, components: impl IntoIterator<Item = Component>) -> Self {
        Self {
            id: id.into(),
            components: components.into_iter().collect(),
        }
    }
}

/// A positional header. Cells are matched to columns by index, not by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub cells: Vector<Cell>,
}

impl Row {
    pub fn new(id: impl Into<String>, cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            id: id.into(),
            cells: cells.into_iter().collect(),
        }
    }
}

/// Ordered columns + ordered rows.
///
/// Invariant: every row holds exactly `columns.len()` cells. The reducer keeps
/// it; grids built by hand or loaded from disk should go through
/// [`Grid::validate`].
///
/// All lists are persistent vectors, so cloning a grid is cheap and edits copy
/// only the path they touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: Vector<Column>,
    pub rows: Vector<Row>,
}

impl Grid {
    /// Build a grid and check the alignment invariant.
    pub fn new(
        columns: impl IntoIterator<Item = Column>,
        rows: impl IntoIterator<Item = Row>,
    ) -> EditResult<Self> {
        let grid = Self {
            columns: columns.into_iter().collect(),
            rows: rows.into_iter().collect(),
        };
        grid.validate()?;
        Ok(grid)
    }

    /// A filled grid: `column-<c>` titled `Column <c+1>`, `row-<r>`,
    /// `cell-<r>-<c>`, and `comp-<r>-<c>-<k>` with content `Comp <r+1>-<c+1>-<k+1>`.
    pub fn with_dimensions(columns: usize, rows: usize, components_per_cell: usize) -> Self {
        let columns: Vector<Column> = (0..columns)
            .map(|c| Column::new(format!("column-{c}"), format!("Column {}", c + 1)))
            .collect();

        let rows = (0..rows)
            .map(|r| {
                let cells = (0..columns.len()).map(|c| {
                    let components = (0..components_per_cell).map(|k| {
                        Component::new(
                            format!("comp-{r}-{c}-{k}"),
                            format!("Comp {}-{}-{}", r + 1, c + 1, k + 1),
                        )
                    });
                    Cell::new(format!("cell-{r}-{c}"), components)
                });
                Row::new(format!("row-{r}"), cells)
            })
            .collect();

        Self { columns, rows }
    }

    /// Check that every row is index-aligned with the column list.
    pub fn validate(&self) -> EditResult<()> {
        let columns = self.columns.len();
        for (row, r) in self.rows.iter().enumerate() {
            if r.cells.len() != columns {
                return Err(EditError::Misaligned {
                    row,
                    cells: r.cells.len(),
                    columns,
                });
            }
        }
        Ok(())
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.rows.get(coord.row)?.cells.get(coord.column)
    }

    pub fn component_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .map(|c| c.components.len())
            .sum()
    }

    /// Largest trailing number found in any id (`cell-2-7` -> 7).
    /// Freshly minted ids are numbered above this so they never collide.
    pub(crate) fn id_watermark(&self) -> u64 {
        let columns = self.columns.iter().map(|c| c.id.as_str());
        let rows = self.rows.iter().flat_map(|r| {
            std::iter::once(r.id.as_str()).chain(r.cells.iter().flat_map(|c| {
                std::iter::once(c.id.as_str()).chain(c.components.iter().map(|k| k.id.as_str()))
            }))
        });

        columns
            .chain(rows)
            .filter_map(|id| id.rsplit('-').next()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }

    /// Save the grid to JSON.
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize grid to json")?;
        fs::write(path.as_ref(), json).context("write grid json file")?;
        Ok(())
    }

    /// Load a grid from JSON and check its alignment.
    pub fn load_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref()).context("read grid json file")?;
        let grid = serde_json::from_str::<Grid>(&text).context("parse grid json")?;
        grid.validate().context("validate grid layout")?;
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_dimensions_builds_aligned_grid() -> anyhow::Result<()> {
        let grid = Grid::with_dimensions(3, 3, 2);
        grid.validate()?;

        assert_eq!(grid.columns.len(), 3);
        assert_eq!(grid.rows.len(), 3);
        assert_eq!(grid.component_count(), 18);
        assert_eq!(grid.columns[1].title, "Column 2");

        let cell = grid.cell(CellCoord::new(2, 1)).context("cell (2,1)")?;
        assert_eq!(cell.id, "cell-2-1");
        assert_eq!(cell.components[1].id, "comp-2-1-1");
        assert_eq!(cell.components[1].content, "Comp 3-2-2");
        Ok(())
    }

    #[test]
    fn validate_reports_first_misaligned_row() {
        let grid = Grid {
            columns: [Column::new("a", "A"), Column::new("b", "B")]
                .into_iter()
                .collect(),
            rows: [
                Row::new("r0", [Cell::new("c0", []), Cell::new("c1", [])]),
                Row::new("r1", [Cell::new("c2", [])]),
            ]
            .into_iter()
            .collect(),
        };

        assert_eq!(
            grid.validate(),
            Err(EditError::Misaligned {
                row: 1,
                cells: 1,
                columns: 2
            })
        );
    }

    #[test]
    fn new_rejects_misaligned_rows() {
        let res = Grid::new(
            [Column::new("a", "A")],
            [Row::new("r0", [Cell::new("c0", []), Cell::new("c1", [])])],
        );
        assert!(matches!(res, Err(EditError::Misaligned { row: 0, .. })));
    }

    #[test]
    fn id_watermark_reads_trailing_numbers() {
        let grid = Grid::with_dimensions(2, 4, 1);
        // row-3 is the largest trailing number (cells end in -0/-1, comps in -0)
        assert_eq!(grid.id_watermark(), 3);
        assert_eq!(Grid::default().id_watermark(), 0);
    }

    #[test]
    fn json_roundtrip_through_file() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("grid_core_model_{}.json", std::process::id()));
        let grid = Grid::with_dimensions(2, 2, 1);
        grid.save_json_file(&path)?;
        let loaded = Grid::load_json_file(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(loaded, grid);
        Ok(())
    }

    #[test]
    fn load_rejects_misaligned_file() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("grid_core_bad_{}.json", std::process::id()));
        let json = r#"{
            "columns": [{"id": "a", "title": "A"}],
            "rows": [{"id": "r", "cells": []}]
        }"#;
        fs::write(&path, json)?;
        let res = Grid::load_json_file(&path);
        fs::remove_file(&path)?;
        assert!(res.is_err());
        Ok(())
    }
}
