//! Backing track model abstraction
//!
//! The table never owns track data. It talks to a [`TrackModel`]: an ordered
//! result set (library query, playlist, crate, AutoDJ queue...) that can be
//! searched, sorted and, depending on its [`Capabilities`], edited.

use std::fmt::Debug;
use std::hash::Hash;

use crate::capabilities::{Capabilities, Capability};
use crate::color::RgbColor;
use crate::column::{SortOrder, TrackColumn};
use crate::error::{ModelError, ModelResult};

/// Abstract ordered list of tracks displayed by the table.
///
/// Rows are ephemeral positions in the current result set. Every search,
/// sort, move, insert or removal may invalidate them; [`TrackModel::Id`] is
/// the identifier that survives those operations.
pub trait TrackModel {
    /// Stable identifier of a track entry
    type Id: Clone + Eq + Hash + Debug;

    /// Operations this model supports
    fn capabilities(&self) -> Capabilities;

    /// Whether edits are currently rejected (e.g. a locked playlist)
    fn is_locked(&self) -> bool {
        false
    }

    /// Number of rows in the current result set
    fn row_count(&self) -> usize;

    /// Stable identifier of the track at `row`
    ///
    /// `None` for rows without a library entry (e.g. in a file browser).
    fn track_id(&self, row: usize) -> Option<Self::Id>;

    /// All rows currently showing the track `id`
    ///
    /// Empty if the track is not part of the result set. A playlist may
    /// contain the same track more than once.
    fn track_rows(&self, id: &Self::Id) -> Vec<usize>;

    /// File location of the track at `row`
    fn track_location(&self, row: usize) -> Option<String>;

    /// Display text of a cell
    fn cell_text(&self, row: usize, column: TrackColumn) -> String;

    /// Color of the track at `row`, if it has one
    fn track_color(&self, row: usize) -> Option<RgbColor> {
        let _ = row;
        None
    }

    /// Set or clear the color of the track at `row`
    fn set_track_color(&mut self, row: usize, color: Option<RgbColor>) -> ModelResult<()> {
        let _ = (row, color);
        Err(ModelError::Unsupported(Capability::EditMetadata))
    }

    /// Move the row at `from` so that it ends up at index `to`
    ///
    /// Same semantics as `Vec::remove(from)` followed by `Vec::insert(to, _)`.
    fn move_track(&mut self, from: usize, to: usize) -> ModelResult<()>;

    /// Insert tracks by location before `row` (`row == row_count` appends)
    ///
    /// Returns the rows now showing the inserted tracks. Tracks filtered out
    /// by the active search are inserted but have no row.
    fn add_tracks(&mut self, row: usize, locations: &[String]) -> ModelResult<Vec<usize>>;

    /// Hide tracks from the library
    fn hide_tracks(&mut self, rows: &[usize]) -> ModelResult<()>;

    /// Restore hidden tracks
    fn unhide_tracks(&mut self, rows: &[usize]) -> ModelResult<()>;

    /// Remove tracks from this view (playlist, crate or queue)
    fn remove_tracks(&mut self, rows: &[usize]) -> ModelResult<()>;

    /// Purge tracks from the library
    fn purge_tracks(&mut self, rows: &[usize]) -> ModelResult<()>;

    /// The query currently applied
    fn current_search(&self) -> &str;

    /// Replace the active query and rebuild the result set
    fn search(&mut self, query: &str);

    /// Sort the result set
    fn sort(&mut self, column: TrackColumn, order: SortOrder);

    /// Whether the model can sort by `column`
    fn is_sortable(&self, column: TrackColumn) -> bool {
        let _ = column;
        true
    }

    /// Sort applied when no sort has been persisted
    fn default_sort(&self) -> (TrackColumn, SortOrder) {
        (TrackColumn::Artist, SortOrder::Ascending)
    }

    /// Whether `column` starts hidden when no header state was persisted
    fn is_column_hidden_by_default(&self, column: TrackColumn) -> bool {
        let _ = column;
        false
    }

    /// Key identifying this model and, unless `no_search`, its active query
    fn model_key(&self, no_search: bool) -> String;
}
