//! Track table columns and sort order

use serde::{Deserialize, Serialize};

/// Column types for the track table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackColumn {
    /// Position in playlist/queue (#)
    Position,
    /// Artist name
    Artist,
    /// Track title
    Title,
    /// Album name
    Album,
    /// BPM (beats per minute)
    Bpm,
    /// Musical key
    Key,
    /// Track duration
    Duration,
    /// Date the track was added to the library
    DateAdded,
}

impl TrackColumn {
    /// Get the display label for this column
    pub fn label(&self) -> &'static str {
        match self {
            Self::Position => "#",
            Self::Artist => "Artist",
            Self::Title => "Title",
            Self::Album => "Album",
            Self::Bpm => "BPM",
            Self::Key => "Key",
            Self::Duration => "Duration",
            Self::DateAdded => "Added",
        }
    }

    /// Get all columns in display order
    pub fn all() -> &'static [TrackColumn] {
        &[
            TrackColumn::Position,
            TrackColumn::Artist,
            TrackColumn::Title,
            TrackColumn::Album,
            TrackColumn::Bpm,
            TrackColumn::Key,
            TrackColumn::Duration,
            TrackColumn::DateAdded,
        ]
    }

    /// Column index of this column in [`TrackColumn::all`]
    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|c| c == self)
            .unwrap_or_default()
    }

    /// Column at the given index, if any
    pub fn from_index(index: usize) -> Option<TrackColumn> {
        Self::all().get(index).copied()
    }

    /// Number of columns
    pub fn count() -> usize {
        Self::all().len()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison result
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Hidden/visible state of the table columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: Vec<TrackColumn>,
}

impl ColumnVisibility {
    /// All columns visible
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given columns hidden
    pub fn with_hidden(hidden: impl IntoIterator<Item = TrackColumn>) -> Self {
        let mut visibility = Self::new();
        for column in hidden {
            visibility.hide(column);
        }
        visibility
    }

    /// Hide a column
    pub fn hide(&mut self, column: TrackColumn) {
        if !self.hidden.contains(&column) {
            self.hidden.push(column);
        }
    }

    /// Show a column
    pub fn show(&mut self, column: TrackColumn) {
        self.hidden.retain(|c| *c != column);
    }

    /// Check whether the column at `index` is hidden
    ///
    /// Indices outside the column range count as hidden.
    pub fn is_hidden(&self, index: usize) -> bool {
        match TrackColumn::from_index(index) {
            Some(column) => self.hidden.contains(&column),
            None => true,
        }
    }

    /// Leftmost visible column index (0 when every column is hidden)
    pub fn leftmost_visible(&self) -> usize {
        (0..TrackColumn::count())
            .find(|&index| !self.is_hidden(index))
            .unwrap_or(0)
    }

    /// Visible columns in display order
    pub fn visible(&self) -> impl Iterator<Item = TrackColumn> + '_ {
        TrackColumn::all()
            .iter()
            .copied()
            .filter(|c| !self.hidden.contains(c))
    }

    /// Hidden columns
    pub fn hidden(&self) -> &[TrackColumn] {
        &self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_roundtrip() {
        for (i, column) in TrackColumn::all().iter().enumerate() {
            assert_eq!(column.index(), i);
            assert_eq!(TrackColumn::from_index(i), Some(*column));
        }
        assert_eq!(TrackColumn::from_index(TrackColumn::count()), None);
    }

    #[test]
    fn test_leftmost_visible() {
        let mut visibility = ColumnVisibility::new();
        assert_eq!(visibility.leftmost_visible(), 0);

        visibility.hide(TrackColumn::Position);
        visibility.hide(TrackColumn::Artist);
        assert_eq!(visibility.leftmost_visible(), TrackColumn::Title.index());
        assert!(visibility.is_hidden(TrackColumn::Artist.index()));

        visibility.show(TrackColumn::Artist);
        assert_eq!(visibility.leftmost_visible(), TrackColumn::Artist.index());
    }

    #[test]
    fn test_sort_order_apply() {
        use std::cmp::Ordering;
        assert_eq!(SortOrder::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Ascending.reversed(), SortOrder::Descending);
    }
}
