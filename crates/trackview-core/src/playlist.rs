//! In-memory track model
//!
//! [`PlaylistModel`] keeps an ordered list of track entries and exposes a
//! filtered, sorted view of it through [`TrackModel`]. It backs the browser
//! application and is the reference model for the controller tests.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use crate::capabilities::{Capabilities, Capability};
use crate::color::RgbColor;
use crate::column::{SortOrder, TrackColumn};
use crate::error::{ModelError, ModelResult};
use crate::model::TrackModel;
use crate::search::{matches_terms, split_query};

/// File extensions accepted by [`PlaylistModel::add_tracks`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "flac", "m4a", "mp3", "ogg", "opus", "wav"];

/// Library identifier of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check whether `location` has a supported audio file extension
pub fn is_supported_location(location: &str) -> bool {
    Path::new(location)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// A track in the model
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    /// Library identifier (shared by duplicate playlist entries)
    pub id: TrackId,
    /// File location
    pub location: String,
    /// Track title (usually the file name without extension)
    pub title: String,
    /// Artist name if known
    pub artist: Option<String>,
    /// Album name if known
    pub album: Option<String>,
    /// BPM if known
    pub bpm: Option<f64>,
    /// Musical key if known
    pub key: Option<String>,
    /// Duration in seconds if known
    pub duration: Option<f64>,
    /// Date added (ISO 8601) if known
    pub date_added: Option<String>,
    /// Track color if one was assigned
    pub color: Option<RgbColor>,
    /// Hidden from the library
    pub hidden: bool,
}

impl TrackEntry {
    /// Create a new entry
    pub fn new(id: TrackId, location: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            location: location.into(),
            title: title.into(),
            artist: None,
            album: None,
            bpm: None,
            key: None,
            duration: None,
            date_added: None,
            color: None,
            hidden: false,
        }
    }

    /// Create an entry from a file location, titled after the file stem
    pub fn from_location(id: TrackId, location: impl Into<String>) -> Self {
        let location = location.into();
        let title = Path::new(&location)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| location.clone());
        Self::new(id, location, title)
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = Some(bpm);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_date_added(mut self, date: impl Into<String>) -> Self {
        self.date_added = Some(date.into());
        self
    }

    pub fn with_color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Format duration as MM:SS
    pub fn format_duration(&self) -> String {
        self.duration
            .map(|d| {
                let mins = (d / 60.0) as u32;
                let secs = (d % 60.0) as u32;
                format!("{}:{:02}", mins, secs)
            })
            .unwrap_or_else(|| "--:--".to_string())
    }

    /// Format BPM with one decimal
    pub fn format_bpm(&self) -> String {
        self.bpm
            .map(|b| format!("{:.1}", b))
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Compare two optional values, sorting `None` to the end
fn compare_options<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    compare_options(a.map(str::to_lowercase), b.map(str::to_lowercase))
}

/// Which entries the model shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFilter {
    /// Entries that are not hidden
    Visible,
    /// Hidden entries only (the "hidden tracks" view)
    HiddenOnly,
}

/// Ordered list of tracks with search and sort
#[derive(Debug, Clone)]
pub struct PlaylistModel {
    name: String,
    entries: Vec<TrackEntry>,
    /// Entry index for each displayed row
    rows: Vec<usize>,
    capabilities: Capabilities,
    filter: EntryFilter,
    locked: bool,
    query: String,
    sort: (TrackColumn, SortOrder),
    next_id: u64,
}

impl PlaylistModel {
    /// Create a model named `name` (used in the model key)
    pub fn new(name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            rows: Vec::new(),
            capabilities,
            filter: EntryFilter::Visible,
            locked: false,
            query: String::new(),
            sort: (TrackColumn::Position, SortOrder::Ascending),
            next_id: 1,
        }
    }

    /// Build a model from entries in playlist order
    pub fn with_entries(mut self, entries: Vec<TrackEntry>) -> Self {
        self.next_id = entries.iter().map(|e| e.id.0 + 1).max().unwrap_or(1);
        self.entries = entries;
        self.refresh();
        self
    }

    /// Show hidden or visible entries
    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self.refresh();
        self
    }

    /// Lock or unlock the model against edits
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in playlist order, hidden ones included
    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    /// Entry displayed at `row`
    pub fn entry(&self, row: usize) -> Option<&TrackEntry> {
        self.rows.get(row).and_then(|&index| self.entries.get(index))
    }

    /// First entry with identifier `id`
    pub fn entry_by_id(&self, id: TrackId) -> Option<&TrackEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Active sort
    pub fn current_sort(&self) -> (TrackColumn, SortOrder) {
        self.sort
    }

    /// Insert entries at playlist `position` (clamped to the end), keeping
    /// their identifiers. Returns the number inserted.
    pub fn insert_entries(
        &mut self,
        position: usize,
        entries: impl IntoIterator<Item = TrackEntry>,
    ) -> ModelResult<usize> {
        self.check_editable()?;
        let mut at = position.min(self.entries.len());
        let start = at;
        for entry in entries {
            self.next_id = self.next_id.max(entry.id.0 + 1);
            self.entries.insert(at, entry);
            at += 1;
        }
        self.refresh();
        Ok(at - start)
    }

    /// Remove every entry
    pub fn clear(&mut self) -> ModelResult<()> {
        self.check_editable()?;
        self.entries.clear();
        self.refresh();
        Ok(())
    }

    /// Whether the rows are shown in playlist order
    fn in_playlist_order(&self) -> bool {
        self.sort == (TrackColumn::Position, SortOrder::Ascending)
    }

    fn check_editable(&self) -> ModelResult<()> {
        if self.locked {
            return Err(ModelError::Locked);
        }
        Ok(())
    }

    fn require(&self, cap: Capability) -> ModelResult<()> {
        if !self.capabilities().contains(cap) {
            return Err(ModelError::Unsupported(cap));
        }
        Ok(())
    }

    fn check_row(&self, row: usize) -> ModelResult<usize> {
        self.rows.get(row).copied().ok_or(ModelError::RowOutOfRange {
            row,
            row_count: self.rows.len(),
        })
    }

    fn entry_indices(&self, rows: &[usize]) -> ModelResult<Vec<usize>> {
        rows.iter().map(|&row| self.check_row(row)).collect()
    }

    /// Rebuild the displayed rows from filter, query and sort
    fn refresh(&mut self) {
        let terms = split_query(&self.query);
        let filter = self.filter;
        let mut rows: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| match filter {
                EntryFilter::Visible => !entry.hidden,
                EntryFilter::HiddenOnly => entry.hidden,
            })
            .filter(|(_, entry)| {
                matches_terms(
                    &terms,
                    [
                        entry.title.as_str(),
                        entry.artist.as_deref().unwrap_or(""),
                        entry.album.as_deref().unwrap_or(""),
                    ],
                )
            })
            .map(|(index, _)| index)
            .collect();

        let (column, order) = self.sort;
        let entries = &self.entries;
        rows.sort_by(|&a, &b| {
            let cmp = compare_entries(entries, a, b, column);
            order.apply(cmp)
        });
        self.rows = rows;
    }

    /// Remove the entries at the given indices
    fn remove_entries(&mut self, mut indices: Vec<usize>) {
        indices.sort_unstable();
        indices.dedup();
        for index in indices.into_iter().rev() {
            self.entries.remove(index);
        }
        self.refresh();
    }
}

/// Compare entries `a` and `b` (indices into `entries`) by `column`
fn compare_entries(entries: &[TrackEntry], a: usize, b: usize, column: TrackColumn) -> Ordering {
    let (ea, eb) = (&entries[a], &entries[b]);
    match column {
        TrackColumn::Position => a.cmp(&b),
        TrackColumn::Artist => compare_text(ea.artist.as_deref(), eb.artist.as_deref()),
        TrackColumn::Title => ea.title.to_lowercase().cmp(&eb.title.to_lowercase()),
        TrackColumn::Album => compare_text(ea.album.as_deref(), eb.album.as_deref()),
        TrackColumn::Bpm => compare_options(ea.bpm, eb.bpm),
        TrackColumn::Key => compare_options(ea.key.as_deref(), eb.key.as_deref()),
        TrackColumn::Duration => compare_options(ea.duration, eb.duration),
        TrackColumn::DateAdded => compare_options(ea.date_added.as_deref(), eb.date_added.as_deref()),
    }
}

impl TrackModel for PlaylistModel {
    type Id = TrackId;

    fn capabilities(&self) -> Capabilities {
        // Reordering only makes sense while rows are in playlist order
        if self.in_playlist_order() {
            self.capabilities
        } else {
            self.capabilities.without(Capability::Reorder)
        }
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn track_id(&self, row: usize) -> Option<TrackId> {
        self.entry(row).map(|entry| entry.id)
    }

    fn track_rows(&self, id: &TrackId) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|&(_, &index)| self.entries[index].id == *id)
            .map(|(row, _)| row)
            .collect()
    }

    fn track_location(&self, row: usize) -> Option<String> {
        self.entry(row).map(|entry| entry.location.clone())
    }

    fn cell_text(&self, row: usize, column: TrackColumn) -> String {
        let Some(&index) = self.rows.get(row) else {
            return String::new();
        };
        let entry = &self.entries[index];
        match column {
            TrackColumn::Position => (index + 1).to_string(),
            TrackColumn::Artist => entry.artist.clone().unwrap_or_default(),
            TrackColumn::Title => entry.title.clone(),
            TrackColumn::Album => entry.album.clone().unwrap_or_default(),
            TrackColumn::Bpm => entry.format_bpm(),
            TrackColumn::Key => entry.key.clone().unwrap_or_else(|| "-".to_string()),
            TrackColumn::Duration => entry.format_duration(),
            TrackColumn::DateAdded => entry.date_added.clone().unwrap_or_default(),
        }
    }

    fn track_color(&self, row: usize) -> Option<RgbColor> {
        self.entry(row).and_then(|entry| entry.color)
    }

    fn set_track_color(&mut self, row: usize, color: Option<RgbColor>) -> ModelResult<()> {
        self.require(Capability::EditMetadata)?;
        let id = self.entries[self.check_row(row)?].id;
        // The color belongs to the track, so duplicates change with it
        for entry in self.entries.iter_mut().filter(|entry| entry.id == id) {
            entry.color = color;
        }
        Ok(())
    }

    fn move_track(&mut self, from: usize, to: usize) -> ModelResult<()> {
        self.check_editable()?;
        self.require(Capability::Reorder)?;
        self.check_row(from)?;
        self.check_row(to)?;

        // Displayed entries keep their slots in the playlist; only the
        // order in which they fill those slots changes.
        let slots = self.rows.clone();
        let mut order = self.rows.clone();
        let moved = order.remove(from);
        order.insert(to, moved);

        let previous = self.entries.clone();
        for (slot, source) in slots.iter().zip(order.iter()) {
            self.entries[*slot] = previous[*source].clone();
        }
        self.refresh();
        Ok(())
    }

    fn add_tracks(&mut self, row: usize, locations: &[String]) -> ModelResult<Vec<usize>> {
        self.check_editable()?;
        self.require(Capability::ReceiveDrops)?;

        let first = self
            .rows
            .get(row)
            .copied()
            .unwrap_or(self.entries.len());
        let mut insert_at = first;
        for location in locations {
            if !is_supported_location(location) {
                log::debug!("add_tracks: skipping unsupported file {}", location);
                continue;
            }
            let entry = match self.entries.iter().find(|e| &e.location == location) {
                Some(existing) => existing.clone(),
                None => {
                    let id = TrackId(self.next_id);
                    self.next_id += 1;
                    TrackEntry::from_location(id, location.clone())
                }
            };
            self.entries.insert(insert_at, entry);
            insert_at += 1;
        }
        self.refresh();

        let inserted = first..insert_at;
        Ok(self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, index)| inserted.contains(index))
            .map(|(row, _)| row)
            .collect())
    }

    fn hide_tracks(&mut self, rows: &[usize]) -> ModelResult<()> {
        self.require(Capability::Hide)?;
        for index in self.entry_indices(rows)? {
            self.entries[index].hidden = true;
        }
        self.refresh();
        Ok(())
    }

    fn unhide_tracks(&mut self, rows: &[usize]) -> ModelResult<()> {
        self.require(Capability::Unhide)?;
        for index in self.entry_indices(rows)? {
            self.entries[index].hidden = false;
        }
        self.refresh();
        Ok(())
    }

    fn remove_tracks(&mut self, rows: &[usize]) -> ModelResult<()> {
        self.check_editable()?;
        let caps = self.capabilities();
        if ![Capability::Remove, Capability::RemoveCrate, Capability::RemovePlaylist]
            .iter()
            .any(|&cap| caps.contains(cap))
        {
            return Err(ModelError::Unsupported(Capability::RemovePlaylist));
        }
        let indices = self.entry_indices(rows)?;
        self.remove_entries(indices);
        Ok(())
    }

    fn purge_tracks(&mut self, rows: &[usize]) -> ModelResult<()> {
        self.require(Capability::Purge)?;
        let ids: Vec<TrackId> = self
            .entry_indices(rows)?
            .into_iter()
            .map(|index| self.entries[index].id)
            .collect();
        // Purging removes the track everywhere, duplicates included
        let indices = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| ids.contains(&entry.id))
            .map(|(index, _)| index)
            .collect();
        self.remove_entries(indices);
        Ok(())
    }

    fn current_search(&self) -> &str {
        &self.query
    }

    fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    fn sort(&mut self, column: TrackColumn, order: SortOrder) {
        self.sort = (column, order);
        self.refresh();
    }

    fn default_sort(&self) -> (TrackColumn, SortOrder) {
        (TrackColumn::Position, SortOrder::Ascending)
    }

    fn is_column_hidden_by_default(&self, column: TrackColumn) -> bool {
        matches!(column, TrackColumn::Album | TrackColumn::DateAdded)
    }

    fn model_key(&self, no_search: bool) -> String {
        if no_search {
            self.name.clone()
        } else {
            format!("{}#{}", self.name, self.query)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_model() -> PlaylistModel {
        PlaylistModel::new("playlist:1", Capabilities::playlist()).with_entries(vec![
            TrackEntry::new(TrackId(1), "/music/a.flac", "Around the World")
                .with_artist("Daft Punk")
                .with_bpm(121.0),
            TrackEntry::new(TrackId(2), "/music/b.flac", "Blue Monday")
                .with_artist("New Order")
                .with_bpm(130.0),
            TrackEntry::new(TrackId(3), "/music/c.flac", "Windowlicker")
                .with_artist("Aphex Twin"),
            TrackEntry::new(TrackId(4), "/music/d.flac", "Da Funk")
                .with_artist("Daft Punk")
                .with_bpm(111.0),
            TrackEntry::new(TrackId(5), "/music/e.flac", "Energy Flash")
                .with_artist("Joey Beltram")
                .with_bpm(136.0),
        ])
    }

    pub(crate) fn ids(model: &PlaylistModel) -> Vec<u64> {
        (0..model.row_count())
            .filter_map(|row| model.track_id(row))
            .map(|id| id.0)
            .collect()
    }

    #[test]
    fn test_search_and_sort() {
        let mut model = sample_model();
        model.search("daft");
        assert_eq!(ids(&model), vec![1, 4]);

        model.sort(TrackColumn::Bpm, SortOrder::Ascending);
        assert_eq!(ids(&model), vec![4, 1]);

        model.search("");
        // Missing BPM sorts last
        assert_eq!(ids(&model), vec![4, 1, 2, 5, 3]);

        model.sort(TrackColumn::Bpm, SortOrder::Descending);
        assert_eq!(ids(&model), vec![3, 5, 2, 1, 4]);
    }

    #[test]
    fn test_move_track_in_playlist_order() {
        let mut model = sample_model();
        model.move_track(0, 3).unwrap();
        assert_eq!(ids(&model), vec![2, 3, 4, 1, 5]);
        assert_eq!(model.cell_text(3, TrackColumn::Position), "4");
    }

    #[test]
    fn test_move_track_with_filter_keeps_other_slots() {
        let mut model = sample_model();
        model.search("daft");
        model.move_track(1, 0).unwrap();
        assert_eq!(ids(&model), vec![4, 1]);

        model.search("");
        assert_eq!(ids(&model), vec![4, 2, 3, 1, 5]);
    }

    #[test]
    fn test_reorder_requires_playlist_order() {
        let mut model = sample_model();
        model.sort(TrackColumn::Title, SortOrder::Ascending);
        assert!(!model.capabilities().contains(Capability::Reorder));
        assert_eq!(
            model.move_track(0, 1),
            Err(ModelError::Unsupported(Capability::Reorder))
        );
    }

    #[test]
    fn test_locked_model_rejects_edits() {
        let mut model = sample_model();
        model.set_locked(true);
        assert_eq!(model.move_track(0, 1), Err(ModelError::Locked));
        assert_eq!(
            model.add_tracks(0, &["/x.mp3".to_string()]),
            Err(ModelError::Locked)
        );
    }

    #[test]
    fn test_add_tracks_filters_unsupported_and_reuses_ids() {
        let mut model = sample_model();
        let added = model
            .add_tracks(
                1,
                &[
                    "/music/new.mp3".to_string(),
                    "/music/cover.jpg".to_string(),
                    "/music/a.flac".to_string(),
                ],
            )
            .unwrap();
        assert_eq!(added, vec![1, 2]);
        assert_eq!(ids(&model), vec![1, 6, 1, 2, 3, 4, 5]);
        assert_eq!(model.track_rows(&TrackId(1)), vec![0, 2]);
        assert_eq!(model.cell_text(1, TrackColumn::Title), "new");
    }

    #[test]
    fn test_add_tracks_reports_only_shown_rows() {
        let mut model = sample_model();
        model.search("daft");
        let added = model
            .add_tracks(
                1,
                &["/in/x.mp3".to_string(), "/in/Daft Punk - Burnin.mp3".to_string()],
            )
            .unwrap();
        // "x" does not match the query, the second title does
        assert_eq!(added, vec![1]);
        assert_eq!(ids(&model), vec![1, 7, 4]);

        model.search("");
        assert_eq!(ids(&model), vec![1, 2, 3, 6, 7, 4, 5]);
    }

    #[test]
    fn test_hide_unhide_views() {
        let mut library = PlaylistModel::new(
            "library",
            Capabilities::library().with(Capability::Unhide),
        )
        .with_entries(sample_model().entries().to_vec());
        library.hide_tracks(&[0, 2]).unwrap();
        assert_eq!(ids(&library), vec![2, 4, 5]);

        let mut hidden = PlaylistModel::new("hidden", Capabilities::from_slice(&[Capability::Unhide]))
            .with_entries(library.entries().to_vec())
            .with_filter(EntryFilter::HiddenOnly);
        assert_eq!(ids(&hidden), vec![1, 3]);
        hidden.unhide_tracks(&[1]).unwrap();
        assert_eq!(ids(&hidden), vec![1]);
    }

    #[test]
    fn test_purge_removes_duplicates() {
        let mut model = PlaylistModel::new("library", Capabilities::library())
            .with_entries(sample_model().entries().to_vec());
        model.add_tracks(5, &["/music/b.flac".to_string()]).unwrap();
        assert_eq!(ids(&model), vec![1, 2, 3, 4, 5, 2]);

        model.purge_tracks(&[1]).unwrap();
        assert_eq!(ids(&model), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_track_color_is_shared_by_duplicates() {
        let mut model = sample_model();
        model.add_tracks(5, &["/music/b.flac".to_string()]).unwrap();
        model.set_track_color(1, Some(RgbColor(0xFF_0000))).unwrap();
        assert_eq!(model.track_color(1), Some(RgbColor(0xFF_0000)));
        assert_eq!(model.track_color(5), Some(RgbColor(0xFF_0000)));
        assert_eq!(model.track_color(0), None);

        model.set_track_color(5, None).unwrap();
        assert_eq!(model.track_color(1), None);
    }

    #[test]
    fn test_track_color_requires_edit_capability() {
        let mut model = PlaylistModel::new("readonly", Capabilities::from_slice(&[Capability::LoadToDeck]))
            .with_entries(sample_model().entries().to_vec());
        assert_eq!(
            model.set_track_color(0, Some(RgbColor(1))),
            Err(ModelError::Unsupported(Capability::EditMetadata))
        );
    }

    #[test]
    fn test_out_of_range_rows() {
        let mut model = sample_model();
        assert_eq!(
            model.remove_tracks(&[9]),
            Err(ModelError::RowOutOfRange { row: 9, row_count: 5 })
        );
    }

    #[test]
    fn test_model_key() {
        let mut model = sample_model();
        model.search("daft");
        assert_eq!(model.model_key(true), "playlist:1");
        assert_eq!(model.model_key(false), "playlist:1#daft");
    }

    #[test]
    fn test_supported_location() {
        assert!(is_supported_location("/a/b/track.FLAC"));
        assert!(!is_supported_location("/a/b/cover.png"));
        assert!(!is_supported_location("/a/b/noext"));
    }

    #[test]
    fn test_insert_entries_keeps_ids() {
        let library = sample_model();
        let mut queue = PlaylistModel::new("autodj", Capabilities::auto_dj());
        let picked: Vec<TrackEntry> = [TrackId(4), TrackId(2)]
            .iter()
            .filter_map(|&id| library.entry_by_id(id).cloned())
            .collect();
        assert_eq!(queue.insert_entries(0, picked).unwrap(), 2);
        assert_eq!(ids(&queue), vec![4, 2]);

        let top = library.entry_by_id(TrackId(5)).cloned();
        queue.insert_entries(0, top).unwrap();
        assert_eq!(ids(&queue), vec![5, 4, 2]);

        // New locations get fresh ids above the inserted ones
        queue.add_tracks(3, &["/incoming/z.mp3".to_string()]).unwrap();
        assert_eq!(ids(&queue), vec![5, 4, 2, 6]);

        queue.clear().unwrap();
        assert_eq!(queue.row_count(), 0);
    }
}
