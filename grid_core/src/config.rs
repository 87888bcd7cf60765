use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::Grid;

/// Editor settings. Every field has a default, so a partial JSON file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Max grids kept on each of the undo and redo stacks.
    /// `None` keeps everything for the life of the session.
    pub history_limit: Option<usize>,

    /// Content of the single component placed in every newly inserted cell.
    pub placeholder_content: String,

    pub initial_columns: usize,
    pub initial_rows: usize,
    pub components_per_cell: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            placeholder_content: "New Comp".to_string(),
            initial_columns: 3,
            initial_rows: 3,
            components_per_cell: 2,
        }
    }
}

impl EditorConfig {
    /// The grid a fresh editor starts with when the caller supplies none.
    pub fn initial_grid(&self) -> Grid {
        Grid::with_dimensions(
            self.initial_columns,
            self.initial_rows,
            self.components_per_cell,
        )
    }

    pub fn save_json_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize editor config")?;
        fs::write(path.as_ref(), json).context("write editor config file")?;
        Ok(())
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref()).context("read editor config file")?;
        let config = serde_json::from_str::<EditorConfig>(&text).context("parse editor config")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() -> anyhow::Result<()> {
        let cfg: EditorConfig = serde_json::from_str(r#"{ "history_limit": 50 }"#)?;
        assert_eq!(cfg.history_limit, Some(50));
        assert_eq!(cfg.placeholder_content, "New Comp");
        assert_eq!(cfg.initial_columns, 3);
        Ok(())
    }

    #[test]
    fn initial_grid_uses_configured_dimensions() -> anyhow::Result<()> {
        let cfg = EditorConfig {
            initial_columns: 4,
            initial_rows: 1,
            components_per_cell: 0,
            ..Default::default()
        };
        let grid = cfg.initial_grid();
        grid.validate()?;
        assert_eq!(grid.columns.len(), 4);
        assert_eq!(grid.rows.len(), 1);
        assert_eq!(grid.component_count(), 0);
        Ok(())
    }

    #[test]
    fn save_and_load_roundtrip() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!(
            "grid_core_config_{}.json",
            std::process::id()
        ));
        let cfg = EditorConfig {
            history_limit: Some(20),
            placeholder_content: "Empty".into(),
            ..Default::default()
        };
        cfg.save_json_file(&path)?;
        let loaded = EditorConfig::load_json_file(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded?, cfg);
        Ok(())
    }
}
