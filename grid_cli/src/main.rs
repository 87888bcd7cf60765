use anyhow::Context;
use grid_core::command::{ParseStatus, parse_command_line};
use grid_core::{DragResult, Editor, EditorAction, EditorConfig, Grid, JsonFileSink};
use std::env;
use std::fs;
use std::io::{self, Write};

fn print_help() {
    println!("Grid Editor CLI v{}", grid_core::version());
    println!(
        r#"
            Commands:
            new <grid.json> [columns rows components]
            config <config.json>
            show <grid.json>
            apply <grid.json> <actions.jsonl> [config.json]
            repl <grid.json> [config.json]

            Examples:
            cargo run -p grid_cli -- new grid.json
            cargo run -p grid_cli -- new grid.json 4 2 1
            cargo run -p grid_cli -- config editor.json
            cargo run -p grid_cli -- show grid.json
            cargo run -p grid_cli -- apply grid.json actions.jsonl
            cargo run -p grid_cli -- repl grid.json
        "#
    );
}

fn print_grid(grid: &Grid) {
    println!(
        "Grid: {} columns x {} rows, {} components",
        grid.columns.len(),
        grid.rows.len(),
        grid.component_count()
    );

    println!("Columns:");
    for (c, col) in grid.columns.iter().enumerate() {
        println!("  [{c}] {:<12} | {}", col.id, col.title);
    }

    for (r, row) in grid.rows.iter().enumerate() {
        println!("Row [{r}] {}", row.id);
        for (c, cell) in row.cells.iter().enumerate() {
            let items = cell
                .components
                .iter()
                .map(|k| format!("{}:{}", k.id, k.content))
                .collect::<Vec<_>>()
                .join(", ");
            let items = if items.is_empty() {
                "(empty)".to_string()
            } else {
                items
            };
            println!("  col {c} | {:<10} | {items}", cell.id);
        }
    }
}

fn load_config(path: Option<&String>) -> anyhow::Result<EditorConfig> {
    match path {
        Some(p) => EditorConfig::load_json_file(p)
            .with_context(|| format!("failed to load config '{p}'")),
        None => Ok(EditorConfig::default()),
    }
}

fn repl(grid_path: &str, config: &EditorConfig) -> anyhow::Result<()> {
    let grid = Grid::load_json_file(grid_path)
        .with_context(|| format!("failed to load grid '{grid_path}'"))?;
    let mut editor = Editor::with_grid(grid, config);
    let mut sink = JsonFileSink::new(grid_path);

    println!(
        "Loaded grid: {} columns x {} rows",
        editor.grid().columns.len(),
        editor.grid().rows.len()
    );
    println!("Type 'help' for commands. 'quit' to exit.");

    loop {
        print!("grid> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            // EOF (Ctrl+D)
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // editing verbs and JSON actions first
        match parse_command_line(line) {
            ParseStatus::Parsed(action) => {
                match editor.dispatch(&action) {
                    Ok(()) => println!(
                        "{} applied | undo: {} redo: {}",
                        action.kind(),
                        editor.state().history().len(),
                        editor.state().future().len()
                    ),
                    Err(e) => println!("{} failed: {e}", action.kind()),
                }
                continue;
            }
            ParseStatus::Incomplete(usage) => {
                println!("Usage: {usage}");
                continue;
            }
            ParseStatus::Invalid(msg) => {
                println!("{msg}");
                continue;
            }
            ParseStatus::NotEditorCommand => {
                // fall through to session commands
            }
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "help" => {
                println!("Editing:");
                for usage in grid_core::command::usage() {
                    println!("  {usage}");
                }
                println!(
                    r#"  {{"type": "MOVE_ROW", "source": 0, "destination": 1}}   (any action as JSON)
Session:
  drop <drag result json>
  show
  history
  edit on|off
  save
  quit"#
                );
            }
            "quit" | "exit" => break,

            "show" => print_grid(editor.grid()),

            "history" => {
                let state = editor.state();
                println!(
                    "undo entries: {} | redo entries: {} | edit mode: {}",
                    state.history().len(),
                    state.future().len(),
                    if editor.edit_mode { "on" } else { "off" }
                );
                for (i, g) in state.history().iter().enumerate() {
                    println!("  past[{i}]: {} cols x {} rows", g.columns.len(), g.rows.len());
                }
                for (i, g) in state.future().iter().enumerate() {
                    println!("  future[{i}]: {} cols x {} rows", g.columns.len(), g.rows.len());
                }
            }

            "edit" => {
                if parts.len() != 2 {
                    println!("Usage: edit on|off");
                    continue;
                }
                match parts[1].to_lowercase().as_str() {
                    "on" => editor.edit_mode = true,
                    "off" => editor.edit_mode = false,
                    _ => {
                        println!("Usage: edit on|off");
                        continue;
                    }
                }
                println!("Edit mode: {}", if editor.edit_mode { "on" } else { "off" });
            }

            "drop" => {
                let json = line[cmd.len()..].trim();
                let result = match serde_json::from_str::<DragResult>(json) {
                    Ok(r) => r,
                    Err(e) => {
                        println!("bad drag result json: {e}");
                        continue;
                    }
                };
                match editor.handle_drop(&result) {
                    Ok(Some(action)) => println!("{} applied", action.kind()),
                    Ok(None) => println!("(drop cancelled)"),
                    Err(e) => println!("drop failed: {e}"),
                }
            }

            "save" => {
                match editor.save(&mut sink) {
                    Ok(()) => println!("Saved grid: {grid_path}"),
                    Err(e) => println!("Save failed: {e:#}"),
                }
            }

            _ => println!("Unknown command. Type 'help'."),
        }
    }

    Ok(())
}

/// Replay one JSON action per line against the grid file, then save it.
fn apply_file(grid_path: &str, actions_path: &str, config: &EditorConfig) -> anyhow::Result<()> {
    let grid = Grid::load_json_file(grid_path)
        .with_context(|| format!("failed to load grid '{grid_path}'"))?;
    let text = fs::read_to_string(actions_path)
        .with_context(|| format!("read actions file '{actions_path}'"))?;

    let mut editor = Editor::with_grid(grid, config);
    let mut applied = 0usize;

    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let action = serde_json::from_str::<EditorAction>(line)
            .with_context(|| format!("{actions_path}:{}: parse action", n + 1))?;
        editor
            .dispatch(&action)
            .with_context(|| format!("{actions_path}:{}: {}", n + 1, action.kind()))?;
        applied += 1;
    }

    editor.save(&mut JsonFileSink::new(grid_path))?;
    println!("Applied {applied} actions and saved {grid_path}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "new" => {
            let path = args.get(2).context("missing <grid.json>")?;
            let defaults = EditorConfig::default();
            let dim = |i: usize, name: &str, default: usize| -> anyhow::Result<usize> {
                match args.get(i) {
                    Some(v) => v
                        .parse()
                        .with_context(|| format!("{name} must be a number")),
                    None => Ok(default),
                }
            };
            let columns = dim(3, "columns", defaults.initial_columns)?;
            let rows = dim(4, "rows", defaults.initial_rows)?;
            let components = dim(5, "components", defaults.components_per_cell)?;

            let grid = Grid::with_dimensions(columns, rows, components);
            grid.save_json_file(path)?;
            println!("Saved {columns}x{rows} grid to: {path}");
        }
        "config" => {
            let path = args.get(2).context("missing <config.json>")?;
            EditorConfig::default()
                .save_json_file(path)
                .with_context(|| format!("failed to write config '{path}'"))?;
            println!("Saved default editor config to: {path}");
        }
        "show" => {
            let path = args.get(2).context("missing <grid.json>")?;
            let grid = Grid::load_json_file(path)
                .with_context(|| format!("failed to load grid '{path}'"))?;
            print_grid(&grid);
        }
        "apply" => {
            let grid_path = args.get(2).context("missing <grid.json>")?;
            let actions_path = args.get(3).context("missing <actions.jsonl>")?;
            let config = load_config(args.get(4))?;
            apply_file(grid_path, actions_path, &config)?;
        }
        "repl" => {
            let path = args.get(2).context("missing <grid.json>")?;
            let config = load_config(args.get(3))?;
            repl(path, &config)?;
        }

        _ => print_help(),
    }

    Ok(())
}
