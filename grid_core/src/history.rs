use im::Vector;

use crate::Grid;

/// Linear undo/redo stacks of whole-grid snapshots.
///
/// `past` is oldest-first, so its back is the grid an undo restores.
/// `future` is nearest-first, so its front is the grid a redo restores.
/// Snapshots share structure with each other, so keeping many is cheap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    past: Vector<Grid>,
    future: Vector<Grid>,
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            past: Vector::new(),
            future: Vector::new(),
            limit,
        }
    }

    pub fn past(&self) -> &Vector<Grid> {
        &self.past
    }

    pub fn future(&self) -> &Vector<Grid> {
        &self.future
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Remember `previous` before a structural edit. Any redo branch is dropped.
    pub(crate) fn record(&mut self, previous: Grid) {
        self.past.push_back(previous);
        self.future.clear();
        self.trim_past();
    }

    /// Step back. Returns the grid to make current, or `None` when there is
    /// nothing to undo.
    pub(crate) fn undo(&mut self, current: &Grid) -> Option<Grid> {
        let previous = self.past.pop_back()?;
        self.future.push_front(current.clone());
        self.trim_future();
        Some(previous)
    }

    /// Step forward again after an undo.
    pub(crate) fn redo(&mut self, current: &Grid) -> Option<Grid> {
        let next = self.future.pop_front()?;
        self.past.push_back(current.clone());
        self.trim_past();
        Some(next)
    }

    fn trim_past(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.past.len() > limit {
            self.past.pop_front();
            log::debug!("history: evicted oldest undo entry (limit {limit})");
        }
    }

    fn trim_future(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.future.len() > limit {
            self.future.pop_back();
            log::debug!("history: evicted farthest redo entry (limit {limit})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cols: usize) -> Grid {
        Grid::with_dimensions(cols, 1, 0)
    }

    #[test]
    fn undo_then_redo_walks_both_stacks() {
        let mut h = History::new(None);
        h.record(grid(1));
        h.record(grid(2));

        // current is grid(3)
        assert_eq!(h.undo(&grid(3)), Some(grid(2)));
        assert_eq!(h.future().front(), Some(&grid(3)));
        assert_eq!(h.undo(&grid(2)), Some(grid(1)));
        assert_eq!(h.future().len(), 2);
        assert!(!h.can_undo());
        assert_eq!(h.undo(&grid(1)), None);

        assert_eq!(h.redo(&grid(1)), Some(grid(2)));
        assert_eq!(h.past().back(), Some(&grid(1)));
        assert_eq!(h.redo(&grid(2)), Some(grid(3)));
        assert!(!h.can_redo());
        assert_eq!(h.redo(&grid(3)), None);
    }

    #[test]
    fn record_clears_future() {
        let mut h = History::new(None);
        h.record(grid(1));
        h.undo(&grid(2));
        assert!(h.can_redo());

        h.record(grid(1));
        assert!(!h.can_redo());
    }

    #[test]
    fn limit_evicts_oldest_entries() {
        let mut h = History::new(Some(2));
        for n in 1..=4 {
            h.record(grid(n));
        }
        assert_eq!(h.past().len(), 2);
        assert_eq!(h.past().front(), Some(&grid(3)));

        h.undo(&grid(5));
        h.undo(&grid(4));
        assert!(!h.can_undo());
        assert_eq!(h.future().len(), 2);
    }

    #[test]
    fn zero_limit_disables_undo() {
        let mut h = History::new(Some(0));
        h.record(grid(1));
        assert!(!h.can_undo());
    }
}
