use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EditError, EditResult};

const ROW_PREFIX: &str = "components-row-";
const COL_SEPARATOR: &str = "-col-";

/// Position of one cell: row index + column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub column: usize,
}

impl CellCoord {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The drop-target identifier a drag host uses for this cell.
    pub fn droppable_id(&self) -> String {
        format!("{ROW_PREFIX}{}{COL_SEPARATOR}{}", self.row, self.column)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

impl FromStr for CellCoord {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_droppable_id(s)
    }
}

/// Decode `components-row-<r>-col-<c>` into a [`CellCoord`].
///
/// Strict: both numbers must be plain ASCII digits and nothing may precede or
/// follow the pattern.
pub fn parse_droppable_id(droppable_id: &str) -> EditResult<CellCoord> {
    let invalid = || EditError::InvalidDroppableId(droppable_id.to_string());

    let rest = droppable_id.strip_prefix(ROW_PREFIX).ok_or_else(invalid)?;
    let (row, column) = rest.split_once(COL_SEPARATOR).ok_or_else(invalid)?;

    let row = parse_digits(row).ok_or_else(invalid)?;
    let column = parse_digits(column).ok_or_else(invalid)?;

    Ok(CellCoord { row, column })
}

fn parse_digits(s: &str) -> Option<usize> {
    // usize::from_str accepts a leading '+', which the id format does not
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
