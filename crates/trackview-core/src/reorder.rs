//! Drag-and-drop row reordering
//!
//! Reordering is done in two phases. [`compute_reorder`] turns the selected
//! rows and a drop destination into a [`ReorderPlan`] using plain row
//! numbers only; the caller then applies each move to its backing list and
//! selects [`ReorderPlan::selection`]. Rows are moved one at a time, so the
//! positions of rows still waiting to be moved are shifted after every move.

use std::collections::{BTreeSet, VecDeque};
use std::ops::Range;

/// A single row move
///
/// `Vec::remove(from)` followed by `Vec::insert(to, _)` on the backing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMove {
    pub from: usize,
    pub to: usize,
}

/// Result of [`compute_reorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    moves: Vec<RowMove>,
    destination: usize,
    selection: Range<usize>,
}

impl ReorderPlan {
    fn empty(destination: usize) -> Self {
        Self {
            moves: Vec::new(),
            destination,
            selection: destination..destination,
        }
    }

    /// Moves in the order they must be applied
    pub fn moves(&self) -> &[RowMove] {
        &self.moves
    }

    /// Normalised drop destination (insert-before row, `row_count` = append)
    pub fn destination(&self) -> usize {
        self.destination
    }

    /// Rows to select once every move has been applied
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// True when the plan neither moves nor selects anything
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.selection.is_empty()
    }

    /// Apply the moves to an ordered list
    ///
    /// Moves referencing rows outside `items` are skipped.
    pub fn apply<T>(&self, items: &mut Vec<T>) {
        for mv in &self.moves {
            if mv.from >= items.len() || mv.to >= items.len() {
                log::warn!("reorder: skipping move {:?} on {} rows", mv, items.len());
                continue;
            }
            let item = items.remove(mv.from);
            items.insert(mv.to, item);
        }
    }
}

/// Compute the moves needed to drop `selected_rows` at `destination`.
///
/// `destination` is the row the selection is dropped in front of; `None` or
/// anything past `row_count` means "after the last row". Dropping a
/// selection anywhere within `[min(selected), max(selected)]` does nothing
/// and yields an empty plan, as does an empty selection. Selected rows past
/// the end of the list are ignored.
pub fn compute_reorder(
    selected_rows: impl IntoIterator<Item = usize>,
    destination: Option<usize>,
    row_count: usize,
) -> ReorderPlan {
    let destination = destination
        .filter(|&row| row <= row_count)
        .unwrap_or(row_count);

    let rows: BTreeSet<usize> = selected_rows
        .into_iter()
        .filter(|&row| row < row_count)
        .collect();

    let (Some(&min_row), Some(&max_row)) = (rows.first(), rows.last()) else {
        return ReorderPlan::empty(destination);
    };

    if (min_row..=max_row).contains(&destination) {
        log::debug!(
            "reorder: drop at {} inside selection {}..={}, nothing to do",
            destination,
            min_row,
            max_row
        );
        return ReorderPlan::empty(destination);
    }

    let count = rows.len();
    // Moving up: bottom row first, so each insert pushes the rest down.
    // Moving down: top row first, so each removal pulls the rest up.
    let (mut pending, start): (VecDeque<usize>, usize) = if destination < min_row {
        (rows.iter().rev().copied().collect(), destination)
    } else {
        (rows.iter().copied().collect(), destination - count)
    };

    let mut moves = Vec::with_capacity(count);
    while let Some(moved) = pending.pop_front() {
        let to = if destination > moved {
            destination - 1
        } else {
            destination
        };
        if to != moved {
            moves.push(RowMove { from: moved, to });
        }

        for row in pending.iter_mut() {
            if *row > moved && destination > *row {
                *row -= 1;
            } else if *row < moved && destination < *row {
                *row += 1;
            }
        }
    }

    ReorderPlan {
        moves,
        destination,
        selection: start..start + count,
    }
}

/// Row a drop at vertical offset `y` lands in front of.
///
/// Users usually drop on the seam between two rows, so the row below the
/// seam is taken. Returns `None` when the drop is below the last row.
pub fn drop_row_at(y: f32, row_height: f32, row_count: usize) -> Option<usize> {
    if row_height <= 0.0 || row_count == 0 {
        return None;
    }
    let row = ((y + row_height / 2.0) / row_height).floor();
    if row < 0.0 {
        return Some(0);
    }
    let row = row as usize;
    (row < row_count).then_some(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    /// Remove the selection, then insert it as a block in front of the
    /// first unselected row at or after `destination`.
    fn naive_reorder(items: &[usize], selected: &BTreeSet<usize>, destination: usize) -> Vec<usize> {
        let block: Vec<usize> = selected.iter().map(|&r| items[r]).collect();
        let mut rest: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(row, _)| !selected.contains(row))
            .map(|(_, &item)| item)
            .collect();
        let insert_at = (0..destination).filter(|r| !selected.contains(r)).count();
        for (offset, item) in block.into_iter().enumerate() {
            rest.insert(insert_at + offset, item);
        }
        rest
    }

    #[test]
    fn test_two_rows_moved_down() {
        let plan = compute_reorder([1, 3], Some(4), 5);
        let mut items = identity(5);
        plan.apply(&mut items);

        assert_eq!(items, vec![0, 2, 1, 3, 4]);
        assert_eq!(plan.selection(), 2..4);
        assert_eq!(&items[plan.selection()], &[1, 3]);
    }

    #[test]
    fn test_single_row_moved_up() {
        let plan = compute_reorder([3], Some(1), 5);
        let mut items = identity(5);
        plan.apply(&mut items);

        assert_eq!(items, vec![0, 3, 1, 2, 4]);
        assert_eq!(plan.selection(), 1..2);
        assert_eq!(plan.moves(), &[RowMove { from: 3, to: 1 }]);
    }

    #[test]
    fn test_drop_inside_selection_is_noop() {
        let plan = compute_reorder([1, 2], Some(2), 5);
        assert!(plan.is_empty());
        assert!(plan.moves().is_empty());

        let plan = compute_reorder([1, 3], Some(1), 5);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_empty_selection() {
        let plan = compute_reorder(Vec::new(), Some(2), 5);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_invalid_destination_appends() {
        let plan = compute_reorder([0, 2], None, 5);
        assert_eq!(plan.destination(), 5);
        let mut items = identity(5);
        plan.apply(&mut items);
        assert_eq!(items, vec![1, 3, 4, 0, 2]);
        assert_eq!(plan.selection(), 3..5);

        let clamped = compute_reorder([0, 2], Some(42), 5);
        assert_eq!(clamped, plan);
    }

    #[test]
    fn test_noop_moves_dropped() {
        // Dropping a row in front of its successor leaves it where it is
        let plan = compute_reorder([3], Some(4), 5);
        assert!(plan.moves().is_empty());
        assert_eq!(plan.selection(), 3..4);
    }

    #[test]
    fn test_out_of_range_rows_ignored() {
        let plan = compute_reorder([1, 9], Some(0), 3);
        let mut items = identity(3);
        plan.apply(&mut items);
        assert_eq!(items, vec![1, 0, 2]);
        assert_eq!(plan.selection(), 0..1);
    }

    #[test]
    fn test_matches_naive_reference_exhaustively() {
        let n = 6;
        for mask in 1u32..(1 << n) {
            let selected: BTreeSet<usize> = (0..n).filter(|r| mask & (1 << r) != 0).collect();
            let min = *selected.first().unwrap();
            let max = *selected.last().unwrap();

            for destination in 0..=n {
                let plan = compute_reorder(selected.iter().copied(), Some(destination), n);

                if (min..=max).contains(&destination) {
                    assert!(plan.is_empty(), "mask {mask:b} dest {destination}");
                    continue;
                }

                let mut items = identity(n);
                plan.apply(&mut items);
                let expected = naive_reorder(&identity(n), &selected, destination);
                assert_eq!(items, expected, "mask {mask:b} dest {destination}");

                let moved: Vec<usize> = items[plan.selection()].to_vec();
                let original: Vec<usize> = selected.iter().copied().collect();
                assert_eq!(moved, original, "mask {mask:b} dest {destination}");

                assert!(plan.moves().iter().all(|m| m.from != m.to));

                let mut sorted = items.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, identity(n));
            }
        }
    }

    #[test]
    fn test_drop_row_at_seam() {
        // Row height 28: dropping just above the seam between rows 1 and 2
        assert_eq!(drop_row_at(50.0, 28.0, 5), Some(2));
        assert_eq!(drop_row_at(5.0, 28.0, 5), Some(0));
        assert_eq!(drop_row_at(-10.0, 28.0, 5), Some(0));
        assert_eq!(drop_row_at(200.0, 28.0, 5), None);
        assert_eq!(drop_row_at(10.0, 28.0, 0), None);
    }
}
