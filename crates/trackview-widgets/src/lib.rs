//! iced widgets for trackview track tables
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State**: the toolkit-independent `TrackTableView` controller from
//!   `trackview-core` plus a small [`DragState`] for mouse gestures
//! - **View function**: [`track_table`] takes state + callback, returns `Element<Message>`
//! - **Update**: [`handle_message`] / [`handle_key`] route input into the controller
//!   and return [`TableAction`]s the application performs
//! - **Subscriptions**: [`gui_tick`] for the cover-art throttle, [`table_input`]
//!   for modifier keys and navigation

pub mod subscription;
pub mod track_table;

pub use subscription::{gui_tick, select_modifiers, table_input, table_key, TableInput};
pub use track_table::{
    column_width, handle_key, handle_message, scroll_offset, scroll_table_to, take_scroll_action,
    track_table, DragState, TableAction, TableKey, TrackTableMessage, PAGE_ROWS,
    TRACK_ROW_HEIGHT, TRACK_TABLE_SCROLLABLE_ID,
};
