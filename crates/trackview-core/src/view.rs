//! Track table controller
//!
//! [`TrackTableView`] is the toolkit-independent half of the track table. It
//! owns the backing [`TrackModel`], the row selection, column visibility and
//! sort state, and turns user input (clicks, drops, header clicks, search
//! edits, scrolling, GUI ticks) into model operations and [`TableEvent`]s.
//!
//! The GUI layer forwards input here, renders from the accessors, and drains
//! [`TrackTableView::take_events`] and [`TrackTableView::take_scroll_request`]
//! after each update.
//!
//! Every operation degrades silently: without a model, without a selection,
//! or when the model rejects an edit, the call does nothing (and logs).

use std::collections::BTreeSet;

use crate::capabilities::{Capabilities, Capability};
use crate::color::{RgbColor, TrackColorPalette};
use crate::column::{ColumnVisibility, SortOrder, TrackColumn};
use crate::config::{LibraryViewConfig, TrackDoubleClickAction};
use crate::cover_art::{Clock, CoverArtEvent, CoverArtThrottle, CoverLoadState, MonotonicClock};
use crate::model::TrackModel;
use crate::reorder::compute_reorder;
use crate::search::query_is_less_specific;
use crate::selection::{CellIndex, SelectModifiers, SelectionSnapshot, TableSelection};
use crate::view_state::{MemoryViewStateStore, ViewState, ViewStateStore};

/// Player group that may always be loaded, even while playing
pub const PREVIEW_DECK_GROUP: &str = "[PreviewDeck1]";

/// Where tracks are inserted into the AutoDJ queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDjPosition {
    Bottom,
    Top,
    Replace,
}

/// Notification for the rest of the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent<Id> {
    /// The single selected track after the user stopped moving, or `None`
    TrackFocused(Option<Id>),
    /// Cover art should only be served from cache (`true`) or may load (`false`)
    OnlyCachedCoverArt(bool),
    /// Load a track into the next free deck
    LoadTrack(Id),
    /// Load a track into a specific player group
    LoadTrackToPlayer { id: Id, group: String, play: bool },
    /// Send tracks to the AutoDJ queue
    AddToAutoDj { ids: Vec<Id>, position: AutoDjPosition },
    /// Open the properties dialog of a track
    ShowTrackProperties(Id),
    /// Ask the user whether to delete the track files.
    ///
    /// The current index was saved; call
    /// [`TrackTableView::restore_current_index`] once the request is settled.
    DeleteFromDisk(Vec<Id>),
}

impl<Id> From<CoverArtEvent<Id>> for TableEvent<Id> {
    fn from(event: CoverArtEvent<Id>) -> Self {
        match event {
            CoverArtEvent::OnlyCachedCoverArt(cached) => TableEvent::OnlyCachedCoverArt(cached),
            CoverArtEvent::TrackFocused(id) => TableEvent::TrackFocused(id),
        }
    }
}

/// Origin of dropped tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropSource {
    /// Rows dragged within this table
    Internal,
    /// Track locations dragged in from elsewhere
    External(Vec<String>),
}

/// Scroll the GUI layer should perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    /// Make a row visible
    Row(usize),
    /// Jump to a pixel offset
    Offset(f32),
}

/// What "delete" does for the current model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    /// Hide tracks from the library
    Hide,
    /// Remove tracks from the AutoDJ queue
    RemoveFromAutoDj,
    /// Remove tracks from a crate
    RemoveFromCrate,
    /// Remove tracks from a playlist
    RemoveFromPlaylist,
}

impl RemovalKind {
    /// Pick the action from a capability set; hiding wins
    pub fn for_capabilities(caps: Capabilities) -> Option<Self> {
        if caps.contains(Capability::Hide) {
            Some(Self::Hide)
        } else if caps.contains(Capability::Remove) {
            Some(Self::RemoveFromAutoDj)
        } else if caps.contains(Capability::RemoveCrate) {
            Some(Self::RemoveFromCrate)
        } else if caps.contains(Capability::RemovePlaylist) {
            Some(Self::RemoveFromPlaylist)
        } else {
            None
        }
    }

    /// Confirmation dialog title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Hide => "Confirm track hide",
            _ => "Confirm track removal",
        }
    }

    /// Confirmation dialog question
    pub fn message(&self) -> &'static str {
        match self {
            Self::Hide => "Are you sure you want to hide the selected tracks?",
            Self::RemoveFromAutoDj => {
                "Are you sure you want to remove the selected tracks from AutoDJ queue?"
            }
            Self::RemoveFromCrate => "Are you sure you want to remove the selected tracks from this crate?",
            Self::RemoveFromPlaylist => {
                "Are you sure you want to remove the selected tracks from this playlist?"
            }
        }
    }
}

/// Pending hide/remove awaiting user confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPrompt {
    pub kind: RemovalKind,
    pub rows: Vec<usize>,
}

/// Controller for a track table
pub struct TrackTableView<M, S = MemoryViewStateStore<<M as TrackModel>::Id>, C = MonotonicClock>
where
    M: TrackModel,
{
    model: Option<M>,
    selection: TableSelection,
    columns: ColumnVisibility,
    config: LibraryViewConfig,
    sort: Option<(TrackColumn, SortOrder)>,
    scroll_position: f32,
    saved_index: Option<CellIndex>,
    view_states: S,
    throttle: CoverArtThrottle<C>,
    scroll_request: Option<ScrollRequest>,
    events: Vec<TableEvent<M::Id>>,
}

impl<M: TrackModel> TrackTableView<M> {
    /// Controller with an in-memory view state store and the system clock
    pub fn with_config(config: LibraryViewConfig) -> Self {
        Self::new(config, MemoryViewStateStore::new(), MonotonicClock::new())
    }
}

impl<M, S, C> TrackTableView<M, S, C>
where
    M: TrackModel,
    S: ViewStateStore<M::Id>,
    C: Clock,
{
    pub fn new(config: LibraryViewConfig, view_states: S, clock: C) -> Self {
        let scroll_position = config.v_scroll_bar_pos;
        Self {
            model: None,
            selection: TableSelection::new(),
            columns: ColumnVisibility::with_hidden(config.header.hidden_columns.iter().copied()),
            config,
            sort: None,
            scroll_position,
            saved_index: None,
            view_states,
            throttle: CoverArtThrottle::new(clock),
            scroll_request: None,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn selection(&self) -> &TableSelection {
        &self.selection
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn config(&self) -> &LibraryViewConfig {
        &self.config
    }

    pub fn sort(&self) -> Option<(TrackColumn, SortOrder)> {
        self.sort
    }

    pub fn scroll_position(&self) -> f32 {
        self.scroll_position
    }

    pub fn cover_load_state(&self) -> CoverLoadState {
        self.throttle.state()
    }

    pub fn view_states(&self) -> &S {
        &self.view_states
    }

    /// Capabilities of the current model (empty without a model)
    pub fn capabilities(&self) -> Capabilities {
        self.model
            .as_ref()
            .map(|m| m.capabilities())
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.model.as_ref().map(|m| m.row_count()).unwrap_or(0)
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        self.selection.is_selected(row)
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<TableEvent<M::Id>> {
        std::mem::take(&mut self.events)
    }

    /// Take the pending scroll request, if any
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll_request.take()
    }

    /// Config with the current header layout and scroll position, for saving
    pub fn persisted_config(&self) -> LibraryViewConfig {
        let mut config = self.config.clone();
        config.header.hidden_columns = self.columns.hidden().to_vec();
        config.v_scroll_bar_pos = self.scroll_position;
        config
    }

    // ------------------------------------------------------------------
    // Model lifecycle
    // ------------------------------------------------------------------

    /// Show a different model, returning the previous one.
    ///
    /// The previous model's view state is saved under its key. With
    /// `restore_state` the new model's saved view state is restored.
    pub fn set_model(&mut self, model: M, restore_state: bool) -> Option<M> {
        log::info!("set_model: {}", model.model_key(true));
        self.save_current_view_state();
        let previous = self.model.replace(model);

        self.selection.clear();
        self.saved_index = None;
        self.init_columns();
        self.init_sort();

        if restore_state {
            self.restore_current_view_state();
        }
        previous
    }

    /// Detach the model, saving its view state first
    pub fn take_model(&mut self) -> Option<M> {
        self.save_current_view_state();
        self.selection.clear();
        self.saved_index = None;
        self.model.take()
    }

    /// Re-apply the current sort to the same model (refreshing stale rows)
    pub fn reload(&mut self, restore_state: bool) {
        if let Some((column, order)) = self.sort {
            self.sort_by_column(column, order);
        }
        if restore_state {
            self.restore_current_view_state();
        }
    }

    fn init_columns(&mut self) {
        let Some(model) = self.model.as_ref() else {
            return;
        };
        if self.config.header.persisted {
            self.columns = ColumnVisibility::with_hidden(self.config.header.hidden_columns.iter().copied());
        } else {
            self.columns = ColumnVisibility::with_hidden(
                TrackColumn::all()
                    .iter()
                    .copied()
                    .filter(|&c| model.is_column_hidden_by_default(c)),
            );
        }
    }

    fn init_sort(&mut self) {
        if !self.config.sorting_enabled {
            return;
        }
        let Some(model) = self.model.as_ref() else {
            return;
        };

        let persisted = self
            .config
            .header
            .sort_column
            .filter(|&c| model.is_sortable(c))
            .map(|c| (c, self.config.header.sort_order));
        let sort = persisted.or_else(|| {
            let (column, order) = model.default_sort();
            if model.is_sortable(column) {
                Some((column, order))
            } else {
                TrackColumn::all()
                    .iter()
                    .copied()
                    .find(|&c| model.is_sortable(c))
                    .map(|c| (c, SortOrder::Ascending))
            }
        });

        match sort {
            Some((column, order)) => {
                self.config.header.sort_column = Some(column);
                self.config.header.sort_order = order;
                self.sort_by_column(column, order);
            }
            None => log::warn!("init_sort: model has no sortable column"),
        }
    }

    // ------------------------------------------------------------------
    // Column visibility
    // ------------------------------------------------------------------

    pub fn hide_column(&mut self, column: TrackColumn) {
        self.columns.hide(column);
        self.config.header.persisted = true;
        if let Some(cell) = self.selection.current().filter(|c| c.column == column.index()) {
            self.selection
                .set_current(CellIndex::new(cell.row, self.columns.leftmost_visible()));
        }
    }

    pub fn show_column(&mut self, column: TrackColumn) {
        self.columns.show(column);
        self.config.header.persisted = true;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    fn selection_changed(&mut self) {
        if let Some(event) = self.throttle.on_user_activity() {
            self.events.push(event.into());
        }
    }

    /// Handle a click on a row
    pub fn click_row(&mut self, row: usize, column: usize, modifiers: SelectModifiers) {
        if row >= self.row_count() {
            return;
        }
        self.selection.click(row, column, modifiers);
        self.selection_changed();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() && self.selection.current().is_none() {
            return;
        }
        self.selection.clear();
        self.selection_changed();
    }

    /// Move the focus `delta` rows up (negative) or down, selecting only
    /// the newly focused row
    pub fn move_selection(&mut self, delta: isize) {
        let row_count = self.row_count();
        if row_count == 0 {
            return;
        }
        let target = match self.selection.current().map(|c| c.row).or(self.selection.first()) {
            Some(row) => row.saturating_add_signed(delta).min(row_count - 1),
            // Nothing focused yet: the first step lands on the first row
            None => 0,
        };
        let column = self
            .selection
            .current()
            .map(|c| c.column)
            .unwrap_or_else(|| self.columns.leftmost_visible());
        self.selection.select_only(target, column);
        self.scroll_request = Some(ScrollRequest::Row(target));
        self.selection_changed();
    }

    /// Identifiers of the selected rows (rows without an id are skipped)
    pub fn selected_track_ids(&self) -> Vec<M::Id> {
        self.snapshot().selected
    }

    /// Identifier of the focused row
    pub fn current_track_id(&self) -> Option<M::Id> {
        let model = self.model.as_ref()?;
        let cell = self.selection.current()?;
        model.track_id(cell.row)
    }

    /// Whether `id` is part of the current result set
    pub fn is_track_in_current_view(&self, id: &M::Id) -> bool {
        self.model
            .as_ref()
            .is_some_and(|model| !model.track_rows(id).is_empty())
    }

    /// Focus the first row showing `id` at `column` and select that row.
    ///
    /// Falls back to the leftmost visible column if `column` is hidden.
    /// Returns `false` if the track is not in the current view.
    pub fn set_current_track_id(&mut self, id: &M::Id, column: usize, scroll_to_track: bool) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        let Some(row) = model.track_rows(id).into_iter().min() else {
            log::debug!("set_current_track_id: track {:?} is not in current view", id);
            return false;
        };
        let column = if self.columns.is_hidden(column) {
            self.columns.leftmost_visible()
        } else {
            column
        };
        self.selection.select_only(row, column);
        if scroll_to_track {
            self.scroll_request = Some(ScrollRequest::Row(row));
        }
        self.selection_changed();
        true
    }

    /// Add all rows showing any of `ids` to the selection
    pub fn set_selected_tracks(&mut self, ids: &[M::Id]) {
        let Some(model) = self.model.as_ref() else {
            return;
        };
        self.selection.select_ids(ids, |id| model.track_rows(id));
        self.selection_changed();
    }

    /// Focus and select a single track, scrolling to it
    pub fn select_track(&mut self, id: &M::Id) {
        if self.set_current_track_id(id, 0, true) {
            self.set_selected_tracks(std::slice::from_ref(id));
        }
    }

    // ------------------------------------------------------------------
    // Selection preservation
    // ------------------------------------------------------------------

    /// Capture the selection by track identifier
    pub fn snapshot(&self) -> SelectionSnapshot<M::Id> {
        match self.model.as_ref() {
            Some(model) => SelectionSnapshot::capture(&self.selection, |row| model.track_id(row)),
            None => SelectionSnapshot::default(),
        }
    }

    /// Re-select a snapshot in the current rows; `true` if focus was restored
    pub fn restore(&mut self, snapshot: &SelectionSnapshot<M::Id>) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        let focused = self
            .selection
            .restore(snapshot, |id| model.track_rows(id), &self.columns);
        if let Some(first) = self.selection.current().map(|c| c.row).or(self.selection.first()) {
            self.scroll_request = Some(ScrollRequest::Row(first));
        }
        self.selection_changed();
        focused
    }

    /// Remember the focused cell for [`Self::restore_current_index`]
    pub fn save_current_index(&mut self) {
        self.saved_index = self.selection.current();
    }

    /// Focus the remembered row (clamped to the last row), or the first
    /// row if nothing was remembered
    pub fn restore_current_index(&mut self) {
        let row_count = self.row_count();
        if row_count == 0 {
            self.selection.clear();
            return;
        }
        let saved = self.saved_index.take();
        let row = saved.map(|cell| cell.row).unwrap_or(0).min(row_count - 1);
        let column = saved
            .map(|cell| cell.column)
            .filter(|&column| !self.columns.is_hidden(column))
            .unwrap_or_else(|| self.columns.leftmost_visible());
        self.selection.select_only(row, column);
        self.scroll_request = Some(ScrollRequest::Row(row));
        self.selection_changed();
    }

    /// View state key of the current model and query
    pub fn model_state_key(&self) -> Option<String> {
        self.model
            .as_ref()
            .map(|model| model.model_key(model.current_search().trim().is_empty()))
    }

    /// Store scroll position and selection under the current model key
    pub fn save_current_view_state(&mut self) {
        let Some(key) = self.model_state_key() else {
            return;
        };
        let state = ViewState {
            scroll_position: self.scroll_position,
            selection: self.snapshot(),
        };
        log::debug!("save_current_view_state: {}", key);
        self.view_states.insert(key, state);
    }

    /// Restore the view state saved for the current model key
    ///
    /// Returns `false` when none was saved.
    pub fn restore_current_view_state(&mut self) -> bool {
        let Some(key) = self.model_state_key() else {
            return false;
        };
        let Some(state) = self.view_states.get(&key).cloned() else {
            return false;
        };
        log::debug!("restore_current_view_state: {}", key);
        self.restore(&state.selection);
        self.scroll_position = state.scroll_position;
        self.scroll_request = Some(ScrollRequest::Offset(state.scroll_position));
        true
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Replace the active query, keeping a sensible selection.
    ///
    /// Relaxing the query keeps the old selection, which is still in the
    /// result set. Narrowing it first tries the view state saved for the
    /// new query, then the old selection, then the old row index.
    pub fn search(&mut self, query: &str) {
        let Some(model) = self.model.as_ref() else {
            return;
        };
        let less_specific = query_is_less_specific(model.current_search(), query);

        self.save_current_view_state();
        let snapshot = self.snapshot();
        self.save_current_index();

        if let Some(model) = self.model.as_mut() {
            model.search(query);
        }
        self.selection.clear();
        log::debug!("search: {:?} (less specific: {})", query, less_specific);

        if less_specific {
            self.restore(&snapshot);
        } else if !self.restore_current_view_state() && !self.restore(&snapshot) {
            // The focused track is gone: focus by index and keep whatever
            // else of the old selection survived
            self.restore_current_index();
            self.set_selected_tracks(&snapshot.selected);
        }
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Sort the model, keeping the selection and the focused column
    pub fn sort_by_column(&mut self, column: TrackColumn, order: SortOrder) {
        if !self.config.sorting_enabled || self.model.is_none() {
            return;
        }
        let selected = self.selected_track_ids();
        // The focused cell's column is kept even if its row was deselected
        let prev_column = self.selection.current().map(|c| c.column).unwrap_or(0);

        let Some(model) = self.model.as_mut() else {
            return;
        };
        model.sort(column, order);
        self.sort = Some((column, order));
        self.selection.clear();

        let rows: BTreeSet<usize> = selected.iter().flat_map(|id| model.track_rows(id)).collect();
        if let Some(&first) = rows.first() {
            let column = if self.columns.is_hidden(prev_column) {
                self.columns.leftmost_visible()
            } else {
                prev_column
            };
            self.selection.select_only(first, column);
            self.scroll_request = Some(ScrollRequest::Row(first));
        }
        for row in rows {
            self.selection.select(row);
        }
        log::debug!("sort_by_column: {:?} {:?}", column, order);
        self.selection_changed();
    }

    /// Sort by `column`/`order` if that differs from the current sort
    pub fn set_sort(&mut self, column: TrackColumn, order: SortOrder) {
        let sortable = self.model.as_ref().is_some_and(|m| m.is_sortable(column));
        if !sortable || self.sort == Some((column, order)) {
            return;
        }
        self.config.header.sort_column = Some(column);
        self.config.header.sort_order = order;
        self.sort_by_column(column, order);
    }

    /// Header click: same column flips the order, a new column sorts ascending
    pub fn toggle_sort(&mut self, column: TrackColumn) {
        let order = match self.sort {
            Some((current, order)) if current == column => order.reversed(),
            _ => SortOrder::Ascending,
        };
        self.set_sort(column, order);
    }

    // ------------------------------------------------------------------
    // Scrolling and GUI ticks
    // ------------------------------------------------------------------

    /// The table was scrolled to `position`
    pub fn on_scroll(&mut self, position: f32) {
        self.scroll_position = position;
        if let Some(event) = self.throttle.on_user_activity() {
            self.events.push(event.into());
        }
    }

    /// Periodic GUI tick (every [`crate::cover_art::GUI_TICK_INTERVAL`])
    pub fn on_gui_tick(&mut self) {
        let model = self.model.as_ref();
        let first = self.selection.first();
        let events = self.throttle.on_tick(self.selection.len(), || {
            first.and_then(|row| model.and_then(|m| m.track_id(row)))
        });
        self.events.extend(events.into_iter().map(TableEvent::from));
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Locations of the selected tracks, for an outgoing drag
    pub fn track_locations_for_drag(&self) -> Vec<String> {
        let Some(model) = self.model.as_ref() else {
            return Vec::new();
        };
        self.selection
            .rows()
            .filter_map(|row| model.track_location(row))
            .collect()
    }

    /// Whether a drop from `source` would be accepted
    pub fn accepts_drop(&self, source: &DropSource) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        let caps = model.capabilities();
        match source {
            DropSource::Internal => caps.contains(Capability::Reorder),
            DropSource::External(locations) => {
                !locations.is_empty() && caps.contains(Capability::ReceiveDrops)
            }
        }
    }

    /// Drop tracks in front of `destination` (`None` = after the last row).
    ///
    /// Internal drops move the selected rows; external drops insert the
    /// dragged locations. Returns `true` if the drop was handled. The scroll
    /// position is kept.
    pub fn drop_tracks(&mut self, source: DropSource, destination: Option<usize>) -> bool {
        if !self.accepts_drop(&source) {
            return false;
        }
        let before_drop = self.snapshot();
        let Some(model) = self.model.as_mut() else {
            return false;
        };
        if model.is_locked() {
            log::debug!("drop_tracks: model is locked");
            return false;
        }
        let scroll_position = self.scroll_position;

        match source {
            DropSource::Internal => {
                let plan = compute_reorder(self.selection.rows(), destination, model.row_count());
                if plan.is_empty() {
                    return false;
                }
                let failed = plan
                    .moves()
                    .iter()
                    .find_map(|mv| model.move_track(mv.from, mv.to).err().map(|e| (mv, e)));
                if let Some((mv, e)) = failed {
                    log::warn!("drop_tracks: failed to move row {} to {}: {}", mv.from, mv.to, e);
                    // Rows may be partly permuted; follow the dragged tracks
                    self.restore(&before_drop);
                    self.scroll_position = scroll_position;
                    self.scroll_request = Some(ScrollRequest::Offset(scroll_position));
                    return false;
                }
                self.selection.clear();
                self.selection.select_range(plan.selection());
            }
            DropSource::External(locations) => {
                self.selection.clear();
                let row_count = model.row_count();
                let start = destination.filter(|&row| row < row_count).unwrap_or(row_count);
                let added = match model.add_tracks(start, &locations) {
                    Ok(rows) => rows,
                    Err(e) => {
                        log::warn!("drop_tracks: failed to add {} tracks: {}", locations.len(), e);
                        Vec::new()
                    }
                };
                // Unordered models (crates) have no meaningful insert position
                if model.capabilities().contains(Capability::Reorder) {
                    for row in added {
                        self.selection.select(row);
                    }
                }
            }
        }

        self.scroll_position = scroll_position;
        self.scroll_request = Some(ScrollRequest::Offset(scroll_position));
        self.selection_changed();
        true
    }

    // ------------------------------------------------------------------
    // Hide / remove / purge
    // ------------------------------------------------------------------

    /// Prepare hiding or removing the selected tracks.
    ///
    /// Returns the prompt to confirm with the user, or `None` if nothing is
    /// selected or the model supports neither hiding nor removing.
    pub fn removal_prompt(&mut self) -> Option<RemovalPrompt> {
        if self.selection.is_empty() {
            return None;
        }
        let kind = RemovalKind::for_capabilities(self.model.as_ref()?.capabilities())?;
        self.save_current_index();
        Some(RemovalPrompt {
            kind,
            rows: self.selection.rows_vec(),
        })
    }

    /// Carry out (or drop) a confirmed [`RemovalPrompt`]
    pub fn confirm_removal(&mut self, prompt: RemovalPrompt, accepted: bool) {
        if !accepted {
            return;
        }
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let result = match prompt.kind {
            RemovalKind::Hide => model.hide_tracks(&prompt.rows),
            _ => model.remove_tracks(&prompt.rows),
        };
        if let Err(e) = result {
            log::warn!("confirm_removal: {:?} failed: {}", prompt.kind, e);
        }
        self.selection.clear();
        self.restore_current_index();
    }

    /// Purge the selected tracks from the library
    pub fn purge_selected(&mut self) {
        self.edit_selected("purge", |model, rows| model.purge_tracks(rows));
    }

    /// Unhide the selected tracks
    pub fn unhide_selected(&mut self) {
        self.edit_selected("unhide", |model, rows| model.unhide_tracks(rows));
    }

    fn edit_selected<F>(&mut self, what: &str, edit: F)
    where
        F: FnOnce(&mut M, &[usize]) -> crate::error::ModelResult<()>,
    {
        if self.selection.is_empty() {
            return;
        }
        let rows = self.selection.rows_vec();
        self.save_current_index();
        let Some(model) = self.model.as_mut() else {
            return;
        };
        if let Err(e) = edit(model, &rows) {
            log::warn!("{}: failed on {} rows: {}", what, rows.len(), e);
        }
        self.selection.clear();
        self.restore_current_index();
    }

    // ------------------------------------------------------------------
    // Activation and loading
    // ------------------------------------------------------------------

    /// Double click on `row`: run the configured action
    pub fn activate_row(&mut self, row: usize) {
        let caps = self.capabilities();
        match self.config.track_double_click_action {
            TrackDoubleClickAction::Ignore => {}
            TrackDoubleClickAction::LoadToDeck => {
                if !caps.contains(Capability::LoadToDeck) {
                    return;
                }
                if let Some(id) = self.model.as_ref().and_then(|m| m.track_id(row)) {
                    self.events.push(TableEvent::LoadTrack(id));
                }
            }
            TrackDoubleClickAction::AddToAutoDjBottom => {
                self.add_selected_to_auto_dj(AutoDjPosition::Bottom);
            }
            TrackDoubleClickAction::AddToAutoDjTop => {
                self.add_selected_to_auto_dj(AutoDjPosition::Top);
            }
        }
    }

    /// Run the double-click action on the first selected row
    pub fn activate_selected_track(&mut self) {
        if let Some(row) = self.selection.first() {
            self.activate_row(row);
        }
    }

    /// Send the selected tracks to the AutoDJ queue
    pub fn add_selected_to_auto_dj(&mut self, position: AutoDjPosition) {
        if !self.capabilities().contains(Capability::AddToAutoDj) {
            return;
        }
        let ids = self.selected_track_ids();
        if ids.is_empty() {
            log::warn!("add_selected_to_auto_dj: no tracks selected");
            return;
        }
        self.events.push(TableEvent::AddToAutoDj { ids, position });
    }

    /// Load the first selected track into player `group`.
    ///
    /// Refused when `deck_playing` and the preferences forbid loading into
    /// a playing deck, unless `group` is the preview deck.
    pub fn load_selected_track_to_group(&mut self, group: &str, play: bool, deck_playing: bool) {
        let Some(row) = self.selection.first() else {
            return;
        };
        if !self.config.allow_load_into_playing_deck() && group != PREVIEW_DECK_GROUP && deck_playing {
            log::debug!("load_selected_track_to_group: {} is playing", group);
            return;
        }
        if let Some(id) = self.model.as_ref().and_then(|m| m.track_id(row)) {
            self.events.push(TableEvent::LoadTrackToPlayer {
                id,
                group: group.to_string(),
                play,
            });
        }
    }

    /// Open the properties of the selected track; needs exactly one selected row
    pub fn show_selected_track_properties(&mut self) {
        if self.selection.len() != 1 {
            return;
        }
        let id = self
            .selection
            .first()
            .and_then(|row| self.model.as_ref()?.track_id(row));
        if let Some(id) = id {
            self.events.push(TableEvent::ShowTrackProperties(id));
        }
    }

    /// Request deleting the selected track files from disk
    pub fn delete_selected_from_disk(&mut self) {
        if !self.capabilities().contains(Capability::RemoveFromDisk) {
            return;
        }
        let ids = self.selected_track_ids();
        if ids.is_empty() {
            return;
        }
        self.save_current_index();
        self.events.push(TableEvent::DeleteFromDisk(ids));
    }

    /// Purge tracks whose files were deleted and focus the row saved by
    /// [`Self::delete_selected_from_disk`]
    pub fn purge_deleted_tracks(&mut self, ids: &[M::Id]) {
        if let Some(model) = self.model.as_mut() {
            let rows: Vec<usize> = ids.iter().flat_map(|id| model.track_rows(id)).collect();
            if !rows.is_empty() {
                if let Err(e) = model.purge_tracks(&rows) {
                    log::warn!("purge_deleted_tracks: {}", e);
                }
            }
        }
        self.selection.clear();
        self.restore_current_index();
    }

    // ------------------------------------------------------------------
    // Track color
    // ------------------------------------------------------------------

    /// Give the first selected track the next palette color
    pub fn assign_next_color(&mut self) {
        self.step_track_color(TrackColorPalette::next_color);
    }

    /// Give the first selected track the previous palette color
    pub fn assign_previous_color(&mut self) {
        self.step_track_color(TrackColorPalette::previous_color);
    }

    fn step_track_color<F>(&mut self, step: F)
    where
        F: Fn(&TrackColorPalette, Option<RgbColor>) -> Option<RgbColor>,
    {
        let Some(row) = self.selection.first() else {
            return;
        };
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let color = step(&self.config.track_color_palette, model.track_color(row));
        if let Err(e) = model.set_track_color(row, color) {
            log::warn!("step_track_color: row {}: {}", row, e);
        }
    }

    /// Color of the track at `row`
    pub fn track_color(&self, row: usize) -> Option<RgbColor> {
        self.model.as_ref().and_then(|m| m.track_color(row))
    }

    /// Display text of a cell
    pub fn cell_text(&self, row: usize, column: TrackColumn) -> String {
        self.model
            .as_ref()
            .map(|m| m.cell_text(row, column))
            .unwrap_or_default()
    }
}
