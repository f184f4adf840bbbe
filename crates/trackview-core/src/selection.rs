//! Row selection and selection-preserving refresh
//!
//! Row indices do not survive a search, sort or model reset. Before such an
//! operation the selection is captured as a [`SelectionSnapshot`] of stable
//! track identifiers; afterwards [`TableSelection::restore`] maps those
//! identifiers back to whatever rows they occupy now.

use std::collections::BTreeSet;
use std::hash::Hash;

use crate::column::ColumnVisibility;

/// Modifier keys held during a selection click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectModifiers {
    /// Shift key held (for range selection)
    pub shift: bool,
    /// Ctrl/Cmd key held (for toggle selection)
    pub ctrl: bool,
}

/// Position of the focused cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellIndex {
    pub row: usize,
    pub column: usize,
}

impl CellIndex {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Row selection of the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelection {
    rows: BTreeSet<usize>,
    current: Option<CellIndex>,
    anchor: Option<usize>,
}

impl TableSelection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected rows in ascending order
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }

    /// Selected rows as a Vec (ascending)
    pub fn rows_vec(&self) -> Vec<usize> {
        self.rows.iter().copied().collect()
    }

    /// Number of selected rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if any rows are selected
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if a row is selected
    pub fn is_selected(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// The focused cell, if any
    pub fn current(&self) -> Option<CellIndex> {
        self.current
    }

    /// First selected row
    pub fn first(&self) -> Option<usize> {
        self.rows.first().copied()
    }

    /// Add a row to the selection
    pub fn select(&mut self, row: usize) {
        self.rows.insert(row);
    }

    /// Add a range of rows to the selection
    pub fn select_range(&mut self, rows: std::ops::Range<usize>) {
        self.rows.extend(rows);
    }

    /// Select a single row and focus it, clearing everything else
    pub fn select_only(&mut self, row: usize, column: usize) {
        self.rows.clear();
        self.rows.insert(row);
        self.current = Some(CellIndex::new(row, column));
        self.anchor = Some(row);
    }

    /// Focus a cell without changing the selected rows
    pub fn set_current(&mut self, cell: CellIndex) {
        self.current = Some(cell);
    }

    /// Clear selected rows, focus and anchor
    pub fn clear(&mut self) {
        self.rows.clear();
        self.current = None;
        self.anchor = None;
    }

    /// Drop rows (and focus) that fall outside `[0, row_count)`
    pub fn clamp_to(&mut self, row_count: usize) {
        self.rows.retain(|&row| row < row_count);
        if self.current.is_some_and(|cell| cell.row >= row_count) {
            self.current = None;
        }
        if self.anchor.is_some_and(|row| row >= row_count) {
            self.anchor = None;
        }
    }

    /// Handle a click on `row` with modifiers
    ///
    /// Plain click selects only `row`, Ctrl toggles it, Shift extends the
    /// selection from the anchor to `row`.
    pub fn click(&mut self, row: usize, column: usize, modifiers: SelectModifiers) {
        if modifiers.shift {
            match self.anchor {
                Some(anchor) => {
                    let (start, end) = if anchor <= row { (anchor, row) } else { (row, anchor) };
                    self.rows.extend(start..=end);
                }
                None => {
                    self.select_only(row, column);
                }
            }
        } else if modifiers.ctrl {
            if !self.rows.remove(&row) {
                self.rows.insert(row);
            }
            self.anchor = Some(row);
        } else {
            self.select_only(row, column);
            return;
        }
        self.current = Some(CellIndex::new(row, column));
    }

    /// Restore a snapshot taken before the rows were invalidated.
    ///
    /// Replaces the current selection with every row `row_lookup` returns
    /// for every captured identifier. Identifiers that no longer resolve are
    /// skipped; identifiers resolving to several rows select all of them.
    /// If the previously focused identifier still resolves, its first row is
    /// focused at the recorded column (the leftmost visible column if that
    /// one is hidden now) and `true` is returned.
    pub fn restore<Id, F>(
        &mut self,
        snapshot: &SelectionSnapshot<Id>,
        row_lookup: F,
        columns: &ColumnVisibility,
    ) -> bool
    where
        Id: Clone + Eq + Hash,
        F: Fn(&Id) -> Vec<usize>,
    {
        self.clear();

        let focused = snapshot.current.as_ref().and_then(|(id, column)| {
            row_lookup(id).into_iter().min().map(|row| (row, *column))
        });
        if let Some((row, column)) = focused {
            let column = if columns.is_hidden(column) {
                columns.leftmost_visible()
            } else {
                column
            };
            self.select_only(row, column);
        }

        self.select_ids(&snapshot.selected, row_lookup);
        focused.is_some()
    }

    /// Add every row showing one of `ids` to the selection
    pub fn select_ids<Id, F>(&mut self, ids: &[Id], row_lookup: F)
    where
        F: Fn(&Id) -> Vec<usize>,
    {
        let mut missed = 0usize;
        for id in ids {
            let rows = row_lookup(id);
            if rows.is_empty() {
                missed += 1;
            }
            self.rows.extend(rows);
        }
        if missed > 0 {
            log::debug!("select_ids: {} of {} tracks not in view", missed, ids.len());
        }
    }
}

/// Selected tracks and focused cell captured by identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot<Id> {
    /// Selected track identifiers, deduplicated, in row order
    pub selected: Vec<Id>,
    /// Focused track and the column of the focused cell
    pub current: Option<(Id, usize)>,
}

impl<Id> Default for SelectionSnapshot<Id> {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
            current: None,
        }
    }
}

impl<Id: Clone + Eq + Hash> SelectionSnapshot<Id> {
    /// Capture `selection` using `id_at` to resolve rows.
    ///
    /// Rows without an identifier are skipped.
    pub fn capture<F>(selection: &TableSelection, id_at: F) -> Self
    where
        F: Fn(usize) -> Option<Id>,
    {
        let mut selected: Vec<Id> = Vec::with_capacity(selection.len());
        for row in selection.rows() {
            match id_at(row) {
                Some(id) if !selected.contains(&id) => selected.push(id),
                Some(_) => {}
                None => log::debug!("capture: skipping row {} without track id", row),
            }
        }
        let current = selection
            .current()
            .and_then(|cell| id_at(cell.row).map(|id| (id, cell.column)));
        Self { selected, current }
    }

    /// Check whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::TrackColumn;

    const IDS: [&str; 5] = ["a", "b", "c", "d", "e"];

    fn id_at(row: usize) -> Option<&'static str> {
        IDS.get(row).copied()
    }

    fn lookup(ids: &'static [&'static str]) -> impl Fn(&&'static str) -> Vec<usize> {
        move |id| {
            ids.iter()
                .enumerate()
                .filter(|(_, x)| *x == id)
                .map(|(row, _)| row)
                .collect()
        }
    }

    #[test]
    fn test_click_modifiers() {
        let mut selection = TableSelection::new();
        selection.click(1, 0, SelectModifiers::default());
        assert_eq!(selection.rows_vec(), vec![1]);

        selection.click(3, 0, SelectModifiers { shift: true, ctrl: false });
        assert_eq!(selection.rows_vec(), vec![1, 2, 3]);
        assert_eq!(selection.current(), Some(CellIndex::new(3, 0)));

        selection.click(2, 0, SelectModifiers { shift: false, ctrl: true });
        assert_eq!(selection.rows_vec(), vec![1, 3]);

        selection.click(4, 2, SelectModifiers::default());
        assert_eq!(selection.rows_vec(), vec![4]);
    }

    #[test]
    fn test_restore_fixed_point() {
        let mut selection = TableSelection::new();
        selection.click(1, 2, SelectModifiers::default());
        selection.click(3, 2, SelectModifiers { shift: false, ctrl: true });
        selection.set_current(CellIndex::new(1, 2));
        let before = selection.clone();

        let snapshot = SelectionSnapshot::capture(&selection, id_at);
        assert_eq!(snapshot.selected, vec!["b", "d"]);
        assert_eq!(snapshot.current, Some(("b", 2)));

        let restored = selection.restore(&snapshot, lookup(&IDS), &ColumnVisibility::new());
        assert!(restored);
        assert_eq!(selection.rows_vec(), before.rows_vec());
        assert_eq!(selection.current(), before.current());
    }

    #[test]
    fn test_restore_after_reorder_and_partial_miss() {
        let mut selection = TableSelection::new();
        selection.click(0, 1, SelectModifiers::default());
        selection.click(4, 1, SelectModifiers { shift: false, ctrl: true });
        let snapshot = SelectionSnapshot::capture(&selection, id_at);
        assert_eq!(snapshot.current, Some(("e", 1)));

        // "e" disappeared from the result set, "a" moved to row 2
        static AFTER: [&str; 3] = ["c", "b", "a"];
        let restored = selection.restore(&snapshot, lookup(&AFTER), &ColumnVisibility::new());
        assert!(!restored);
        assert_eq!(selection.rows_vec(), vec![2]);
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn test_restore_selects_all_duplicates() {
        let mut selection = TableSelection::new();
        selection.click(1, 0, SelectModifiers::default());
        let snapshot = SelectionSnapshot::capture(&selection, id_at);

        static PLAYLIST: [&str; 4] = ["b", "a", "b", "c"];
        assert!(selection.restore(&snapshot, lookup(&PLAYLIST), &ColumnVisibility::new()));
        assert_eq!(selection.rows_vec(), vec![0, 2]);
        assert_eq!(selection.current(), Some(CellIndex::new(0, 0)));
    }

    #[test]
    fn test_restore_focus_falls_back_to_visible_column() {
        let mut selection = TableSelection::new();
        selection.click(2, TrackColumn::Bpm.index(), SelectModifiers::default());
        let snapshot = SelectionSnapshot::capture(&selection, id_at);

        let columns = ColumnVisibility::with_hidden([TrackColumn::Position, TrackColumn::Bpm]);
        assert!(selection.restore(&snapshot, lookup(&IDS), &columns));
        assert_eq!(
            selection.current(),
            Some(CellIndex::new(2, TrackColumn::Artist.index()))
        );
    }

    #[test]
    fn test_capture_dedups_and_skips_missing_ids() {
        let mut selection = TableSelection::new();
        selection.select_range(0..7);
        let snapshot = SelectionSnapshot::capture(&selection, |row| {
            if row == 2 {
                None
            } else {
                Some(row % 3)
            }
        });
        assert_eq!(snapshot.selected, vec![0, 1, 2]);
        assert_eq!(snapshot.current, None);
    }

    #[test]
    fn test_clamp_to_row_count() {
        let mut selection = TableSelection::new();
        selection.select_range(0..5);
        selection.set_current(CellIndex::new(4, 0));
        selection.clamp_to(3);
        assert_eq!(selection.rows_vec(), vec![0, 1, 2]);
        assert_eq!(selection.current(), None);
    }
}
