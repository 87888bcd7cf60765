// grid_core/src/command.rs
use crate::EditorAction;
use crate::coords::{CellCoord, parse_droppable_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    Parsed(EditorAction),
    Incomplete(&'static str), // valid verb, missing arguments (carries usage)
    Invalid(String),          // our syntax, but arguments don't parse
    NotEditorCommand,         // doesn't look like an editor command
}

const MVCOL: &str = "mvcol <from> <to>";
const MVROW: &str = "mvrow <from> <to>";
const MV: &str = "mv <row> <col> <index> <row> <col> <index>  OR  mv <droppable> <index> <droppable> <index>";
const RMCOMP: &str = "rmcomp <row> <col> <index>";
const INSROW: &str = "insrow <index>";
const RMROW: &str = "rmrow <index>";
const INSCOL: &str = "inscol <index>";
const RMCOL: &str = "rmcol <index>";

fn num(tok: &str) -> Result<usize, ParseStatus> {
    tok.parse::<usize>()
        .map_err(|_| ParseStatus::Invalid(format!("'{tok}' is not an index")))
}

/// Split `args` into exactly `N` indices, reporting missing or extra ones.
fn nums<const N: usize>(args: &[&str], usage: &'static str) -> Result<[usize; N], ParseStatus> {
    if args.len() < N {
        return Err(ParseStatus::Incomplete(usage));
    }
    if args.len() > N {
        return Err(ParseStatus::Invalid(format!("too many arguments. Usage: {usage}")));
    }
    let mut out = [0; N];
    for (slot, tok) in out.iter_mut().zip(args) {
        *slot = num(tok)?;
    }
    Ok(out)
}

fn parse_move(args: &[&str]) -> Result<EditorAction, ParseStatus> {
    // droppable form: the first argument names a cell
    if args.first().is_some_and(|a| a.starts_with("components-")) {
        if args.len() < 4 {
            return Err(ParseStatus::Incomplete(MV));
        }
        if args.len() > 4 {
            return Err(ParseStatus::Invalid(format!("too many arguments. Usage: {MV}")));
        }
        let from = parse_droppable_id(args[0]).map_err(|e| ParseStatus::Invalid(e.to_string()))?;
        let to = parse_droppable_id(args[2]).map_err(|e| ParseStatus::Invalid(e.to_string()))?;
        return Ok(EditorAction::move_component(from, num(args[1])?, to, num(args[3])?));
    }

    let [sr, sc, si, dr, dc, di] = nums::<6>(args, MV)?;
    Ok(EditorAction::move_component(
        CellCoord::new(sr, sc),
        si,
        CellCoord::new(dr, dc),
        di,
    ))
}

fn parse_words(verb: &str, args: &[&str]) -> Result<EditorAction, ParseStatus> {
    let action = match verb {
        "undo" | "redo" => {
            if !args.is_empty() {
                return Err(ParseStatus::Invalid(format!("{verb} takes no arguments")));
            }
            if verb == "undo" {
                EditorAction::Undo
            } else {
                EditorAction::Redo
            }
        }
        "mvcol" => {
            let [source, destination] = nums::<2>(args, MVCOL)?;
            EditorAction::MoveColumn {
                source,
                destination,
            }
        }
        "mvrow" => {
            let [source, destination] = nums::<2>(args, MVROW)?;
            EditorAction::MoveRow {
                source,
                destination,
            }
        }
        "mv" => parse_move(args)?,
        "rmcomp" => {
            let [row, column, index] = nums::<3>(args, RMCOMP)?;
            EditorAction::delete_component(CellCoord::new(row, column), index)
        }
        "insrow" => {
            let [index] = nums::<1>(args, INSROW)?;
            EditorAction::InsertRow { index }
        }
        "rmrow" => {
            let [index] = nums::<1>(args, RMROW)?;
            EditorAction::DeleteRow { index }
        }
        "inscol" => {
            let [index] = nums::<1>(args, INSCOL)?;
            EditorAction::InsertColumn { index }
        }
        "rmcol" => {
            let [index] = nums::<1>(args, RMCOL)?;
            EditorAction::DeleteColumn { index }
        }
        _ => return Err(ParseStatus::NotEditorCommand),
    };
    Ok(action)
}

/// Turn one line of user input into an action.
///
/// Accepts the short verbs listed in [`usage`] or a JSON action object
/// (`{"type": "UNDO"}`). Anything else is `NotEditorCommand`, so the caller
/// can fall through to its own commands.
pub fn parse_command_line(line: &str) -> ParseStatus {
    let line = line.trim();

    if line.starts_with('{') {
        return match serde_json::from_str::<EditorAction>(line) {
            Ok(action) => ParseStatus::Parsed(action),
            Err(e) => ParseStatus::Invalid(format!("bad action json: {e}")),
        };
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((verb, args)) = tokens.split_first() else {
        return ParseStatus::NotEditorCommand;
    };

    match parse_words(&verb.to_lowercase(), args) {
        Ok(action) => ParseStatus::Parsed(action),
        Err(status) => status,
    }
}

/// One usage line per editing verb.
pub fn usage() -> [&'static str; 10] {
    [
        MVCOL, MVROW, MV, RMCOMP, INSROW, RMROW, INSCOL, RMCOL, "undo", "redo",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index_form_move() {
        let st = parse_command_line("mv 0 0 0 0 0 1");
        let at = CellCoord::new(0, 0);
        assert_eq!(
            st,
            ParseStatus::Parsed(EditorAction::move_component(at, 0, at, 1))
        );
    }

    #[test]
    fn parses_droppable_form_move() {
        let st = parse_command_line("mv components-row-1-col-2 0 components-row-0-col-0 3");
        assert_eq!(
            st,
            ParseStatus::Parsed(EditorAction::move_component(
                CellCoord::new(1, 2),
                0,
                CellCoord::new(0, 0),
                3
            ))
        );
    }

    #[test]
    fn bad_droppable_is_invalid() {
        let st = parse_command_line("mv components-row-x-col-2 0 components-row-0-col-0 3");
        assert!(matches!(st, ParseStatus::Invalid(_)));
    }

    #[test]
    fn simple_verbs() {
        assert_eq!(
            parse_command_line("MVCOL 2 0"),
            ParseStatus::Parsed(EditorAction::MoveColumn {
                source: 2,
                destination: 0
            })
        );
        assert_eq!(
            parse_command_line("inscol 1"),
            ParseStatus::Parsed(EditorAction::InsertColumn { index: 1 })
        );
        assert_eq!(
            parse_command_line("rmcomp 1 2 3"),
            ParseStatus::Parsed(EditorAction::delete_component(CellCoord::new(1, 2), 3))
        );
        assert_eq!(parse_command_line("  undo "), ParseStatus::Parsed(EditorAction::Undo));
    }

    #[test]
    fn missing_arguments_are_incomplete() {
        assert_eq!(parse_command_line("rmrow"), ParseStatus::Incomplete(RMROW));
        assert_eq!(parse_command_line("mv 0 0 0"), ParseStatus::Incomplete(MV));
    }

    #[test]
    fn bad_numbers_and_extra_args_are_invalid() {
        assert!(matches!(parse_command_line("insrow -1"), ParseStatus::Invalid(_)));
        assert!(matches!(parse_command_line("mvrow 1 2 3"), ParseStatus::Invalid(_)));
        assert!(matches!(parse_command_line("redo now"), ParseStatus::Invalid(_)));
    }

    #[test]
    fn json_lines_are_accepted() {
        assert_eq!(
            parse_command_line(r#"{"type":"DELETE_ROW","index":4}"#),
            ParseStatus::Parsed(EditorAction::DeleteRow { index: 4 })
        );
        assert!(matches!(
            parse_command_line(r#"{"type":"NOPE"}"#),
            ParseStatus::Invalid(_)
        ));
    }

    #[test]
    fn other_lines_fall_through() {
        assert_eq!(parse_command_line("help"), ParseStatus::NotEditorCommand);
        assert_eq!(parse_command_line(""), ParseStatus::NotEditorCommand);
    }
}
