//! Library view configuration
//!
//! Preferences that shape how the track table behaves (double-click action,
//! loading into playing decks, sorting) plus the persisted header and scroll
//! state. Stored as YAML:
//!
//! ```ignore
//! use trackview_core::config::{load_config, save_config, default_config_path, LibraryViewConfig};
//!
//! let path = default_config_path(LIBRARY_VIEW_CONFIG_FILE);
//! let config: LibraryViewConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod io;
mod paths;

pub use io::{load_config, save_config};
pub use paths::{default_collection_path, default_config_path};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::TrackColorPalette;
use crate::column::{SortOrder, TrackColumn};

/// File name of the library view config
pub const LIBRARY_VIEW_CONFIG_FILE: &str = "library-view.yaml";

/// What a double click on a track row does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackDoubleClickAction {
    #[default]
    LoadToDeck,
    AddToAutoDjBottom,
    AddToAutoDjTop,
    Ignore,
}

/// Whether a track may be loaded into a deck that is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadWhenDeckPlaying {
    Reject,
    Allow,
    AllowButStopDeck,
}

/// Persisted header state of the table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderState {
    /// Set once the user's column layout has been saved
    pub persisted: bool,
    /// Columns the user hid
    pub hidden_columns: Vec<TrackColumn>,
    /// Sort column, `None` until the user sorts
    pub sort_column: Option<TrackColumn>,
    /// Sort direction
    pub sort_order: SortOrder,
}

/// Track table preferences and persisted view state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryViewConfig {
    /// Root of the music collection shown by the browser
    pub collection_path: PathBuf,
    /// Action for a double click on a track
    pub track_double_click_action: TrackDoubleClickAction,
    /// Loading into a playing deck; `None` falls back to the legacy flag
    pub load_when_deck_playing: Option<LoadWhenDeckPlaying>,
    /// Legacy flag predating `load_when_deck_playing`
    pub allow_track_load_to_playing_deck: bool,
    /// Whether clicking headers sorts the table
    pub sorting_enabled: bool,
    /// Column layout and sort
    pub header: HeaderState,
    /// Vertical scroll position of the table
    pub v_scroll_bar_pos: f32,
    /// Colors stepped through by the next/previous color actions
    pub track_color_palette: TrackColorPalette,
}

impl Default for LibraryViewConfig {
    fn default() -> Self {
        Self {
            collection_path: default_collection_path(),
            track_double_click_action: TrackDoubleClickAction::default(),
            load_when_deck_playing: None,
            allow_track_load_to_playing_deck: false,
            sorting_enabled: true,
            header: HeaderState::default(),
            v_scroll_bar_pos: 0.0,
            track_color_palette: TrackColorPalette::default(),
        }
    }
}

impl LibraryViewConfig {
    /// Whether loading into a playing deck is allowed
    pub fn allow_load_into_playing_deck(&self) -> bool {
        match self.load_when_deck_playing {
            Some(LoadWhenDeckPlaying::Allow | LoadWhenDeckPlaying::AllowButStopDeck) => true,
            Some(LoadWhenDeckPlaying::Reject) => false,
            None => self.allow_track_load_to_playing_deck,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_when_playing_fallback() {
        let mut config = LibraryViewConfig::default();
        assert!(!config.allow_load_into_playing_deck());

        config.allow_track_load_to_playing_deck = true;
        assert!(config.allow_load_into_playing_deck());

        config.load_when_deck_playing = Some(LoadWhenDeckPlaying::Reject);
        assert!(!config.allow_load_into_playing_deck());

        config.load_when_deck_playing = Some(LoadWhenDeckPlaying::AllowButStopDeck);
        assert!(config.allow_load_into_playing_deck());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: LibraryViewConfig = serde_yaml::from_str(
            "track_double_click_action: add_to_auto_dj_top\nheader:\n  hidden_columns: [key]\n",
        )
        .unwrap();
        assert_eq!(
            config.track_double_click_action,
            TrackDoubleClickAction::AddToAutoDjTop
        );
        assert_eq!(config.header.hidden_columns, vec![TrackColumn::Key]);
        assert!(config.sorting_enabled);
        assert_eq!(config.header.sort_column, None);
        assert_eq!(config.track_color_palette, TrackColorPalette::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LIBRARY_VIEW_CONFIG_FILE);

        let mut config = LibraryViewConfig::default();
        config.header.sort_column = Some(TrackColumn::Bpm);
        config.header.sort_order = SortOrder::Descending;
        config.v_scroll_bar_pos = 280.0;
        save_config(&config, &path).unwrap();

        let loaded: LibraryViewConfig = load_config(&path);
        assert_eq!(loaded, config);
    }
}
