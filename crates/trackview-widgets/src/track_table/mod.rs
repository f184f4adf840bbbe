//! Track table widget
//!
//! Renders a [`TrackTableView`] as a search box, sortable column headers and
//! selectable rows, and routes the resulting messages back into the
//! controller. Follows iced 0.14 patterns: the controller and a small
//! [`DragState`] are the state, [`track_table`] is the view function and
//! [`handle_message`] is the update.
//!
//! ## Usage
//!
//! ```ignore
//! // view
//! let table = track_table(&self.table, &self.drag, Message::Table);
//!
//! // update
//! Message::Table(msg) => {
//!     if let Some(action) = handle_message(&mut self.table, &mut self.drag, msg, self.modifiers) {
//!         return self.handle_table_action(action);
//!     }
//! }
//! ```

use iced::advanced::widget::operation::scrollable::scroll_to;
use iced::widget::scrollable::AbsoluteOffset;
use iced::widget::{
    button, column, container, mouse_area, row, scrollable, text, text_input, Id, Space,
};
use iced::{Background, Border, Color, Element, Length, Padding, Point, Task, Theme};
use std::sync::LazyLock;

use trackview_core::cover_art::Clock;
use trackview_core::reorder::drop_row_at;
use trackview_core::view::{DropSource, RemovalPrompt, ScrollRequest, TrackTableView};
use trackview_core::{CellIndex, SelectModifiers, SortOrder, TrackColumn, TrackModel, ViewStateStore};

/// Row height for track table rows (used for scroll and drop calculations)
pub const TRACK_ROW_HEIGHT: f32 = 28.0;

/// Rows assumed visible when centering a row after a programmatic scroll
const VISIBLE_ROWS: f32 = 10.0;

/// Rows moved by Page Up / Page Down
pub const PAGE_ROWS: isize = 10;

/// Scrollable ID for the track table (used for programmatic scrolling)
pub static TRACK_TABLE_SCROLLABLE_ID: LazyLock<Id> = LazyLock::new(Id::unique);

/// Width of a column
pub fn column_width(column: TrackColumn) -> Length {
    match column {
        TrackColumn::Position => Length::Fixed(35.0),
        TrackColumn::Artist => Length::Fixed(140.0),
        TrackColumn::Title => Length::Fill,
        TrackColumn::Album => Length::Fixed(140.0),
        TrackColumn::Bpm => Length::Fixed(60.0),
        TrackColumn::Key => Length::Fixed(50.0),
        TrackColumn::Duration => Length::Fixed(70.0),
        TrackColumn::DateAdded => Length::Fixed(95.0),
    }
}

/// Messages emitted by the track table widget
#[derive(Debug, Clone)]
pub enum TrackTableMessage {
    /// Search query changed
    SearchChanged(String),
    /// Mouse pressed on a cell
    /// Note: Modifier handling (Shift/Ctrl) is done in [`handle_message`]
    /// with the modifiers the app tracked, NOT in the view.
    RowPressed { row: usize, column: usize },
    /// Mouse released over a row (click end or drop)
    RowReleased(usize),
    /// Mouse released in the empty space below the last row
    ReleasedBelowRows,
    /// Row activated (double click)
    Activate(usize),
    /// Column header clicked
    SortBy(TrackColumn),
    /// Table scrolled to a vertical offset
    Scrolled(f32),
    /// Right-click on a row (for context menu)
    RightClick(usize),
    /// Mouse moved over a row, position relative to the row
    MouseMoved(usize, Point),
}

/// Follow-up the application has to perform after [`handle_message`]
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    /// Scroll the table (see [`scroll_table_to`])
    ScrollTo(AbsoluteOffset),
    /// Open the context menu for the selection
    ContextMenu { row: usize, position: Point },
    /// Ask the user to confirm hiding/removing tracks
    ConfirmRemoval(RemovalPrompt),
}

/// Mouse gesture in progress on the table
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Cell the mouse was pressed on
    pressed: Option<CellIndex>,
    /// The press hit an already selected row without modifiers; the
    /// selection collapses on release unless the press became a drag
    deferred_click: bool,
    /// The mouse left the pressed row while held
    dragging: bool,
    /// Row under the mouse and the vertical position inside it
    hover: Option<(usize, f32)>,
    /// Last known mouse position (for context menu placement)
    last_mouse_position: Point,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether rows are being dragged
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Row the dragged rows would be dropped in front of, if dropped now
    pub fn drop_target(&self, row_count: usize) -> Option<usize> {
        if !self.dragging {
            return None;
        }
        let (row, y) = self.hover?;
        drop_row_at(row as f32 * TRACK_ROW_HEIGHT + y, TRACK_ROW_HEIGHT, row_count)
    }

    fn reset(&mut self) {
        self.pressed = None;
        self.deferred_click = false;
        self.dragging = false;
    }
}

/// Keys the table reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKey {
    Up,
    Down,
    PageUp,
    PageDown,
    Enter,
    Delete,
    /// Ctrl+Enter
    Properties,
    /// Shift+Delete
    DeleteFromDisk,
    NextColor,
    PreviousColor,
}

/// Route a table message into the controller
///
/// `modifiers` are the keyboard modifiers currently held.
pub fn handle_message<M, S, C>(
    view: &mut TrackTableView<M, S, C>,
    drag: &mut DragState,
    message: TrackTableMessage,
    modifiers: SelectModifiers,
) -> Option<TableAction>
where
    M: TrackModel,
    S: ViewStateStore<M::Id>,
    C: Clock,
{
    match message {
        TrackTableMessage::SearchChanged(query) => view.search(&query),
        TrackTableMessage::RowPressed { row, column } => {
            let plain = !modifiers.shift && !modifiers.ctrl;
            drag.reset();
            if plain && view.is_row_selected(row) {
                drag.deferred_click = true;
            } else {
                view.click_row(row, column, modifiers);
            }
            drag.pressed = Some(CellIndex::new(row, column));
            drag.hover = Some((row, TRACK_ROW_HEIGHT / 2.0));
        }
        TrackTableMessage::MouseMoved(row, position) => {
            drag.last_mouse_position = position;
            drag.hover = Some((row, position.y));
            if drag.pressed.is_some_and(|cell| cell.row != row) {
                drag.dragging = true;
            }
        }
        TrackTableMessage::RowReleased(row) => {
            if drag.dragging {
                let destination = drag.drop_target(view.row_count());
                log::debug!("handle_message: drop at {:?}", destination);
                view.drop_tracks(DropSource::Internal, destination);
            } else if let Some(cell) = drag.pressed.filter(|cell| drag.deferred_click && cell.row == row) {
                view.click_row(cell.row, cell.column, SelectModifiers::default());
            }
            drag.reset();
        }
        TrackTableMessage::ReleasedBelowRows => {
            if drag.dragging {
                view.drop_tracks(DropSource::Internal, None);
            }
            drag.reset();
        }
        TrackTableMessage::Activate(row) => view.activate_row(row),
        TrackTableMessage::SortBy(column) => view.toggle_sort(column),
        TrackTableMessage::Scrolled(offset) => view.on_scroll(offset),
        TrackTableMessage::RightClick(row) => {
            if !view.is_row_selected(row) {
                let column = view.columns().leftmost_visible();
                view.click_row(row, column, SelectModifiers::default());
            }
            return Some(TableAction::ContextMenu {
                row,
                position: drag.last_mouse_position,
            });
        }
    }
    take_scroll_action(view)
}

/// Route a key press into the controller
pub fn handle_key<M, S, C>(view: &mut TrackTableView<M, S, C>, key: TableKey) -> Option<TableAction>
where
    M: TrackModel,
    S: ViewStateStore<M::Id>,
    C: Clock,
{
    match key {
        TableKey::Up => view.move_selection(-1),
        TableKey::Down => view.move_selection(1),
        TableKey::PageUp => view.move_selection(-PAGE_ROWS),
        TableKey::PageDown => view.move_selection(PAGE_ROWS),
        TableKey::Enter => view.activate_selected_track(),
        TableKey::Delete => {
            return view.removal_prompt().map(TableAction::ConfirmRemoval);
        }
        TableKey::Properties => view.show_selected_track_properties(),
        TableKey::DeleteFromDisk => view.delete_selected_from_disk(),
        TableKey::NextColor => view.assign_next_color(),
        TableKey::PreviousColor => view.assign_previous_color(),
    }
    take_scroll_action(view)
}

/// Pending controller scroll request as an action
pub fn take_scroll_action<M, S, C>(view: &mut TrackTableView<M, S, C>) -> Option<TableAction>
where
    M: TrackModel,
    S: ViewStateStore<M::Id>,
    C: Clock,
{
    view.take_scroll_request()
        .map(|request| TableAction::ScrollTo(scroll_offset(request)))
}

/// Pixel offset for a scroll request; rows are centered in the view
pub fn scroll_offset(request: ScrollRequest) -> AbsoluteOffset {
    let y = match request {
        ScrollRequest::Row(row) => {
            let center_offset = (VISIBLE_ROWS / 2.0 - 1.0) * TRACK_ROW_HEIGHT;
            (row as f32 * TRACK_ROW_HEIGHT - center_offset).max(0.0)
        }
        ScrollRequest::Offset(y) => y.max(0.0),
    };
    AbsoluteOffset { x: 0.0, y }
}

/// Task scrolling the track table to `offset`
pub fn scroll_table_to<Message: Send + 'static>(offset: AbsoluteOffset) -> Task<Message> {
    iced::advanced::widget::operate(scroll_to(
        TRACK_TABLE_SCROLLABLE_ID.clone().into(),
        offset.into(),
    ))
}

/// Build a track table view
///
/// # Arguments
///
/// * `view` - Controller holding the model, selection and sort
/// * `drag` - Mouse gesture state (for the drop indicator)
/// * `on_message` - Callback to convert table messages to your message type
pub fn track_table<'a, M, S, C, Message>(
    view: &'a TrackTableView<M, S, C>,
    drag: &'a DragState,
    on_message: impl Fn(TrackTableMessage) -> Message + 'a + Clone,
) -> Element<'a, Message>
where
    M: TrackModel,
    S: ViewStateStore<M::Id>,
    C: Clock,
    Message: Clone + 'a,
{
    let on_msg = on_message.clone();
    let query = view.model().map(|m| m.current_search()).unwrap_or("");

    let search = text_input("Search tracks...", query)
        .on_input(move |s| on_msg(TrackTableMessage::SearchChanged(s)))
        .padding(8)
        .size(13);

    let headers = build_headers(view, on_message.clone());

    let row_count = view.row_count();
    let drop_target = drag.drop_target(row_count);
    let rows: Vec<Element<'a, Message>> = (0..row_count)
        .map(|r| build_track_row(view, r, drop_target == Some(r), on_message.clone()))
        .collect();

    let track_list: Element<'a, Message> = if rows.is_empty() {
        let empty_msg = if query.is_empty() {
            "No tracks"
        } else {
            "No matching tracks"
        };
        container(
            text(empty_msg)
                .size(12)
                .style(|theme: &Theme| text::Style {
                    color: Some(theme.extended_palette().background.weak.text),
                }),
        )
        .padding(20)
        .center_x(Length::Fill)
        .into()
    } else {
        let on_msg_below = on_message.clone();
        let on_msg_scroll = on_message.clone();
        let dragging_to_end = drag.is_dragging() && drop_target.is_none();

        // Dropping below the last row appends
        let below = mouse_area(
            container(Space::new())
                .width(Length::Fill)
                .height(Length::Fixed(TRACK_ROW_HEIGHT * 2.0))
                .style(move |theme: &Theme| container::Style {
                    border: drop_border(theme, dragging_to_end),
                    ..Default::default()
                }),
        )
        .on_release(on_msg_below(TrackTableMessage::ReleasedBelowRows));

        scrollable(column(rows).push(below).spacing(1))
            .id(TRACK_TABLE_SCROLLABLE_ID.clone())
            .on_scroll(move |viewport| {
                on_msg_scroll(TrackTableMessage::Scrolled(viewport.absolute_offset().y))
            })
            .height(Length::Fill)
            .into()
    };

    column![
        search,
        container(headers).style(|theme: &Theme| {
            container::Style {
                background: Some(Background::Color(
                    theme.extended_palette().background.weak.color,
                )),
                ..Default::default()
            }
        }),
        track_list,
    ]
    .spacing(2)
    .into()
}

fn drop_border(theme: &Theme, active: bool) -> Border {
    if active {
        Border {
            color: theme.extended_palette().primary.strong.color,
            width: 1.0,
            radius: 0.0.into(),
        }
    } else {
        Border::default()
    }
}

/// Build column headers row (hidden columns are skipped)
fn build_headers<'a, M, S, C, Message>(
    view: &'a TrackTableView<M, S, C>,
    on_message: impl Fn(TrackTableMessage) -> Message + 'a + Clone,
) -> Element<'a, Message>
where
    M: TrackModel,
    S: ViewStateStore<M::Id>,
    C: Clock,
    Message: Clone + 'a,
{
    let sorting_enabled = view.config().sorting_enabled;
    let headers: Vec<Element<'a, Message>> = view
        .columns()
        .visible()
        .map(|col| {
            let sortable = sorting_enabled && view.model().is_some_and(|m| m.is_sortable(col));
            build_header_cell(col, view.sort(), sortable, on_message.clone())
        })
        .collect();

    row(headers)
        .spacing(1)
        .padding(Padding::from([6, 8]))
        .into()
}

/// Build a single column header cell
fn build_header_cell<'a, Message>(
    column: TrackColumn,
    sort: Option<(TrackColumn, SortOrder)>,
    sortable: bool,
    on_message: impl Fn(TrackTableMessage) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let arrow = match sort {
        Some((sorted, SortOrder::Ascending)) if sorted == column => " \u{25B2}", // ▲
        Some((sorted, SortOrder::Descending)) if sorted == column => " \u{25BC}", // ▼
        _ => "",
    };

    let label = format!("{}{}", column.label(), arrow);

    let header = button(text(label).size(11))
        .padding(Padding::from([2, 4]))
        .width(column_width(column))
        .style(|theme: &Theme, _status| {
            let palette = theme.extended_palette();
            button::Style {
                background: Some(Background::Color(Color::TRANSPARENT)),
                text_color: palette.background.base.text,
                border: Border::default(),
                ..Default::default()
            }
        });

    if sortable {
        header
            .on_press(on_message(TrackTableMessage::SortBy(column)))
            .into()
    } else {
        header.into()
    }
}

/// Build a single track row
fn build_track_row<'a, M, S, C, Message>(
    view: &'a TrackTableView<M, S, C>,
    track_row: usize,
    is_drop_target: bool,
    on_message: impl Fn(TrackTableMessage) -> Message + 'a + Clone,
) -> Element<'a, Message>
where
    M: TrackModel,
    S: ViewStateStore<M::Id>,
    C: Clock,
    Message: Clone + 'a,
{
    let is_selected = view.is_row_selected(track_row);

    // Cells take press and double click so the focused column is known
    let cells = view
        .columns()
        .visible()
        .map(|col| {
            let on_msg = on_message.clone();
            let on_msg_activate = on_message.clone();
            mouse_area(
                text(view.cell_text(track_row, col))
                    .size(12)
                    .width(column_width(col)),
            )
            .on_press(on_msg(TrackTableMessage::RowPressed {
                row: track_row,
                column: col.index(),
            }))
            .on_double_click(on_msg_activate(TrackTableMessage::Activate(track_row)))
            .into()
        })
        .collect::<Vec<Element<'a, Message>>>();

    let color = view.track_color(track_row);
    let stripe = container(Space::new())
        .width(Length::Fixed(4.0))
        .height(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: color
                .map(|c| Background::Color(Color::from_rgb8(c.red(), c.green(), c.blue()))),
            ..Default::default()
        });

    let row_content = row(std::iter::once(stripe.into()).chain(cells))
        .spacing(1)
        .padding(Padding::from([4, 8]))
        .height(Length::Fixed(TRACK_ROW_HEIGHT));

    // Button is used for visual styling only - no .on_press()
    let row_button = button(row_content)
        .padding(0)
        .width(Length::Fill)
        .style(move |theme: &Theme, status| {
            let palette = theme.extended_palette();
            let bg = if is_selected {
                palette.primary.weak.color
            } else {
                match status {
                    button::Status::Hovered => palette.background.weak.color,
                    _ => Color::TRANSPARENT,
                }
            };
            let text_color = if is_selected {
                palette.primary.weak.text
            } else {
                palette.background.base.text
            };

            button::Style {
                background: Some(Background::Color(bg)),
                text_color,
                border: drop_border(theme, is_drop_target),
                ..Default::default()
            }
        });

    let on_msg_release = on_message.clone();
    let on_msg_right = on_message.clone();
    let on_msg_move = on_message.clone();

    // Row-level handlers:
    // - on_release: click end or drop of dragged rows
    // - on_move: drag tracking and cursor position for the context menu
    // - on_right_press: context menu
    mouse_area(row_button)
        .on_release(on_msg_release(TrackTableMessage::RowReleased(track_row)))
        .on_move(move |point| on_msg_move(TrackTableMessage::MouseMoved(track_row, point)))
        .on_right_press(on_msg_right(TrackTableMessage::RightClick(track_row)))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackview_core::config::LibraryViewConfig;
    use trackview_core::{Capabilities, PlaylistModel, TableEvent, TrackEntry, TrackId};

    fn table() -> TrackTableView<PlaylistModel> {
        let entries = (1..=5)
            .map(|i| TrackEntry::new(TrackId(i), format!("/music/{}.flac", i), format!("Track {}", i)))
            .collect();
        let model = PlaylistModel::new("playlist:1", Capabilities::playlist()).with_entries(entries);
        let mut view = TrackTableView::with_config(LibraryViewConfig::default());
        view.set_model(model, false);
        view
    }

    fn ids(view: &TrackTableView<PlaylistModel>) -> Vec<u64> {
        (0..view.row_count())
            .filter_map(|row| view.model().and_then(|m| m.track_id(row)))
            .map(|id| id.0)
            .collect()
    }

    fn press(row: usize) -> TrackTableMessage {
        TrackTableMessage::RowPressed { row, column: 1 }
    }

    fn ctrl() -> SelectModifiers {
        SelectModifiers { shift: false, ctrl: true }
    }

    #[test]
    fn test_click_selects_on_press() {
        let mut view = table();
        let mut drag = DragState::new();
        handle_message(&mut view, &mut drag, press(2), SelectModifiers::default());
        handle_message(&mut view, &mut drag, TrackTableMessage::RowReleased(2), SelectModifiers::default());
        assert_eq!(view.selection().rows_vec(), vec![2]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_rows_into_lower_half() {
        let mut view = table();
        let mut drag = DragState::new();
        let none = SelectModifiers::default();
        handle_message(&mut view, &mut drag, press(0), none);
        handle_message(&mut view, &mut drag, press(1), ctrl());

        // Press on the selected row keeps the multi-selection for the drag
        handle_message(&mut view, &mut drag, press(1), none);
        assert_eq!(view.selection().rows_vec(), vec![0, 1]);

        handle_message(&mut view, &mut drag, TrackTableMessage::MouseMoved(3, Point::new(10.0, 20.0)), none);
        assert!(drag.is_dragging());
        assert_eq!(drag.drop_target(view.row_count()), Some(4));

        handle_message(&mut view, &mut drag, TrackTableMessage::RowReleased(3), none);
        assert_eq!(ids(&view), vec![3, 4, 1, 2, 5]);
        assert_eq!(view.selection().rows_vec(), vec![2, 3]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_release_on_pressed_selected_row_collapses_selection() {
        let mut view = table();
        let mut drag = DragState::new();
        let none = SelectModifiers::default();
        handle_message(&mut view, &mut drag, press(0), none);
        handle_message(&mut view, &mut drag, press(3), ctrl());

        handle_message(&mut view, &mut drag, press(3), none);
        handle_message(&mut view, &mut drag, TrackTableMessage::RowReleased(3), none);
        assert_eq!(view.selection().rows_vec(), vec![3]);
    }

    #[test]
    fn test_drop_below_rows_appends() {
        let mut view = table();
        let mut drag = DragState::new();
        let none = SelectModifiers::default();
        handle_message(&mut view, &mut drag, press(1), none);
        handle_message(&mut view, &mut drag, TrackTableMessage::MouseMoved(4, Point::new(0.0, 5.0)), none);
        handle_message(&mut view, &mut drag, TrackTableMessage::ReleasedBelowRows, none);
        assert_eq!(ids(&view), vec![1, 3, 4, 5, 2]);
        assert_eq!(view.selection().rows_vec(), vec![4]);
    }

    #[test]
    fn test_release_below_rows_without_drag_is_ignored() {
        let mut view = table();
        let mut drag = DragState::new();
        handle_message(&mut view, &mut drag, TrackTableMessage::ReleasedBelowRows, SelectModifiers::default());
        assert_eq!(ids(&view), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_right_click_selects_unselected_row() {
        let mut view = table();
        let mut drag = DragState::new();
        let none = SelectModifiers::default();
        handle_message(&mut view, &mut drag, TrackTableMessage::MouseMoved(2, Point::new(40.0, 12.0)), none);
        let action = handle_message(&mut view, &mut drag, TrackTableMessage::RightClick(2), none);
        assert_eq!(
            action,
            Some(TableAction::ContextMenu {
                row: 2,
                position: Point::new(40.0, 12.0),
            })
        );
        assert_eq!(view.selection().rows_vec(), vec![2]);
    }

    #[test]
    fn test_keys_move_and_scroll() {
        let mut view = table();
        let action = handle_key(&mut view, TableKey::Down);
        assert_eq!(view.selection().rows_vec(), vec![0]);
        assert_eq!(action, Some(TableAction::ScrollTo(AbsoluteOffset { x: 0.0, y: 0.0 })));

        handle_key(&mut view, TableKey::PageDown);
        assert_eq!(view.selection().rows_vec(), vec![4]);

        match handle_key(&mut view, TableKey::Delete) {
            Some(TableAction::ConfirmRemoval(prompt)) => assert_eq!(prompt.rows, vec![4]),
            other => panic!("expected removal prompt, got {:?}", other),
        }
    }

    #[test]
    fn test_modified_keys_reach_controller() {
        let mut view = table();
        handle_key(&mut view, TableKey::Down);
        view.take_events();

        handle_key(&mut view, TableKey::NextColor);
        assert!(view.track_color(0).is_some());
        handle_key(&mut view, TableKey::PreviousColor);
        assert_eq!(view.track_color(0), None);

        assert_eq!(handle_key(&mut view, TableKey::Properties), None);
        assert!(matches!(
            view.take_events().as_slice(),
            [TableEvent::ShowTrackProperties(_)]
        ));
    }

    #[test]
    fn test_scroll_offset_centers_rows() {
        assert_eq!(scroll_offset(ScrollRequest::Row(2)).y, 0.0);
        assert_eq!(
            scroll_offset(ScrollRequest::Row(20)).y,
            20.0 * TRACK_ROW_HEIGHT - 4.0 * TRACK_ROW_HEIGHT
        );
        assert_eq!(scroll_offset(ScrollRequest::Offset(-3.0)).y, 0.0);
    }

    #[test]
    fn test_search_message() {
        let mut view = table();
        let mut drag = DragState::new();
        handle_message(
            &mut view,
            &mut drag,
            TrackTableMessage::SearchChanged("track 3".to_string()),
            SelectModifiers::default(),
        );
        assert_eq!(ids(&view), vec![3]);
    }
}
