//! Trackview Core - selection, reorder and refresh engines for track tables
//!
//! Everything here is independent of the GUI toolkit:
//!
//! - [`model`]: the [`TrackModel`] contract a track source implements
//! - [`reorder`]: planning the row moves of a drag-and-drop reorder
//! - [`selection`]: row selection and identifier-based snapshots
//! - [`search`]: query specificity for selection restore
//! - [`cover_art`]: debounce of cover-art disk loading
//! - [`color`]: track color palette stepping
//! - [`view`]: the [`TrackTableView`] controller tying them together
//! - [`playlist`]: an in-memory [`TrackModel`] over a list of files
//! - [`config`]: persisted library view preferences

pub mod capabilities;
pub mod color;
pub mod column;
pub mod config;
pub mod cover_art;
pub mod error;
pub mod model;
pub mod playlist;
pub mod reorder;
pub mod search;
pub mod selection;
pub mod view;
pub mod view_state;

pub use capabilities::{Capabilities, Capability};
pub use color::{RgbColor, TrackColorPalette};
pub use column::{ColumnVisibility, SortOrder, TrackColumn};
pub use cover_art::{Clock, CoverArtThrottle, CoverLoadState, ManualClock, MonotonicClock};
pub use error::{ModelError, ModelResult};
pub use model::TrackModel;
pub use playlist::{PlaylistModel, TrackEntry, TrackId};
pub use reorder::{compute_reorder, drop_row_at, ReorderPlan, RowMove};
pub use selection::{CellIndex, SelectModifiers, SelectionSnapshot, TableSelection};
pub use view::{
    AutoDjPosition, DropSource, RemovalKind, RemovalPrompt, ScrollRequest, TableEvent,
    TrackTableView,
};
pub use view_state::{MemoryViewStateStore, ViewState, ViewStateStore};
