//! Main iced application for the trackview browser
//!
//! Hosts one track table over three sources (library, hidden tracks, AutoDJ
//! queue), turns table events into status messages and simulated deck
//! loads, and persists the table layout.

use std::collections::HashSet;
use std::path::PathBuf;

use iced::widget::{
    button, center, column, container, mouse_area, opaque, row, stack, text, Space,
};
use iced::{event, window, Color, Element, Event, Length, Point, Subscription, Task, Theme};

use trackview_core::config::{save_config, LibraryViewConfig};
use trackview_core::playlist::EntryFilter;
use trackview_core::view::{AutoDjPosition, DropSource, RemovalPrompt, TableEvent, PREVIEW_DECK_GROUP};
use trackview_core::{
    Capabilities, Capability, PlaylistModel, ScrollRequest, SelectModifiers, TrackEntry, TrackId,
    TrackTableView,
};
use trackview_widgets::{
    gui_tick, handle_key, handle_message, scroll_offset, scroll_table_to, table_input,
    take_scroll_action, track_table, DragState, TableAction, TableInput, TrackTableMessage,
};

use crate::library::scan_collection;

/// Player groups of the simulated decks
pub const DECK_GROUPS: [&str; 4] = ["[Channel1]", "[Channel2]", "[Channel3]", "[Channel4]"];

/// Track source shown in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Library,
    Hidden,
    AutoDj,
}

impl Source {
    fn label(&self) -> &'static str {
        match self {
            Source::Library => "Library",
            Source::Hidden => "Hidden Tracks",
            Source::AutoDj => "Auto DJ",
        }
    }
}

/// Context menu entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextAction {
    LoadToGroup(String),
    AddToAutoDj(AutoDjPosition),
    Remove,
    Unhide,
    Purge,
    Properties,
    NextColor,
    PreviousColor,
    DeleteFromDisk,
}

/// Messages that can be sent to the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Track table message
    Table(TrackTableMessage),
    /// Keyboard input for the table
    Input(TableInput),
    /// Cover-art throttle tick
    GuiTick,
    /// Collection scan finished
    CollectionScanned(Result<Vec<TrackEntry>, String>),
    /// Switch the table source
    SwitchSource(Source),
    /// Context menu entry chosen
    Context(ContextAction),
    /// Close the context menu
    CloseContextMenu,
    /// Removal confirmation answered
    ConfirmRemoval(bool),
    /// Delete-from-disk confirmation answered
    ConfirmDelete(bool),
    /// Close the track properties dialog
    CloseProperties,
    /// File dropped onto the window
    FileDropped(PathBuf),
    /// Stop all simulated decks
    StopDecks,
}

/// Application state
pub struct BrowserApp {
    table: TrackTableView<PlaylistModel>,
    drag: DragState,
    modifiers: SelectModifiers,
    source: Source,
    /// Library entries while the library is not in the table
    library: Vec<TrackEntry>,
    /// AutoDJ queue while it is not in the table
    auto_dj: Option<PlaylistModel>,
    config_path: PathBuf,
    saved_config: LibraryViewConfig,
    context_menu: Option<(usize, Point)>,
    removal: Option<RemovalPrompt>,
    /// Tracks waiting for the delete-from-disk confirmation
    pending_delete: Option<Vec<TrackId>>,
    properties: Option<TrackEntry>,
    playing: HashSet<String>,
    status: String,
}

impl BrowserApp {
    /// Create the application and start scanning `collection`
    pub fn new(config: LibraryViewConfig, config_path: PathBuf, collection: PathBuf) -> (Self, Task<Message>) {
        let mut table = TrackTableView::with_config(config.clone());
        table.set_model(library_model(Vec::new()), false);

        let app = Self {
            table,
            drag: DragState::new(),
            modifiers: SelectModifiers::default(),
            source: Source::Library,
            library: Vec::new(),
            auto_dj: None,
            config_path,
            saved_config: config,
            context_menu: None,
            removal: None,
            pending_delete: None,
            properties: None,
            playing: HashSet::new(),
            status: format!("Scanning {}...", collection.display()),
        };
        (app, scan_task(collection))
    }

    /// Application title
    pub fn title(&self) -> String {
        format!("trackview - {}", self.source.label())
    }

    /// Application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Update application state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::Table(msg) => {
                let action = handle_message(&mut self.table, &mut self.drag, msg, self.modifiers);
                self.handle_table_action(action)
            }
            Message::Input(TableInput::ModifiersChanged(modifiers)) => {
                self.modifiers = modifiers;
                Task::none()
            }
            Message::Input(TableInput::Key(key)) => {
                if self.dialog_open() {
                    return Task::none();
                }
                let action = handle_key(&mut self.table, key);
                self.handle_table_action(action)
            }
            Message::GuiTick => {
                self.table.on_gui_tick();
                self.persist_config();
                Task::none()
            }
            Message::CollectionScanned(Ok(entries)) => {
                self.status = format!("{} tracks", entries.len());
                self.library = entries;
                if matches!(self.source, Source::Library | Source::Hidden) {
                    let model = self.build_model(self.source);
                    self.table.set_model(model, true);
                }
                // Back to where the table was when the app last ran
                scroll_table_to(scroll_offset(ScrollRequest::Offset(self.table.scroll_position())))
            }
            Message::CollectionScanned(Err(e)) => {
                log::error!("Collection scan failed: {}", e);
                self.status = format!("Scan failed: {}", e);
                Task::none()
            }
            Message::SwitchSource(source) => {
                self.switch_source(source);
                self.scroll_from_table()
            }
            Message::Context(action) => {
                self.context_menu = None;
                self.handle_context_action(action)
            }
            Message::CloseContextMenu => {
                self.context_menu = None;
                Task::none()
            }
            Message::ConfirmRemoval(accepted) => {
                if let Some(prompt) = self.removal.take() {
                    self.table.confirm_removal(prompt, accepted);
                }
                self.scroll_from_table()
            }
            Message::ConfirmDelete(accepted) => {
                if let Some(ids) = self.pending_delete.take() {
                    if accepted {
                        self.delete_files(&ids);
                    } else {
                        self.table.restore_current_index();
                    }
                }
                self.scroll_from_table()
            }
            Message::CloseProperties => {
                self.properties = None;
                Task::none()
            }
            Message::FileDropped(path) => {
                let source = DropSource::External(vec![path.to_string_lossy().into_owned()]);
                if !self.table.drop_tracks(source, None) {
                    self.status = format!("Cannot add {} here", path.display());
                }
                self.scroll_from_table()
            }
            Message::StopDecks => {
                self.playing.clear();
                self.status = "All decks stopped".to_string();
                Task::none()
            }
        };

        self.drain_table_events();
        task
    }

    fn handle_table_action(&mut self, action: Option<TableAction>) -> Task<Message> {
        match action {
            Some(TableAction::ScrollTo(offset)) => scroll_table_to(offset),
            Some(TableAction::ContextMenu { row, position }) => {
                self.context_menu = Some((row, position));
                Task::none()
            }
            Some(TableAction::ConfirmRemoval(prompt)) => {
                self.removal = Some(prompt);
                Task::none()
            }
            None => Task::none(),
        }
    }

    fn scroll_from_table(&mut self) -> Task<Message> {
        let action = take_scroll_action(&mut self.table);
        self.handle_table_action(action)
    }

    fn handle_context_action(&mut self, action: ContextAction) -> Task<Message> {
        match action {
            ContextAction::LoadToGroup(group) => {
                let deck_playing = self.playing.contains(&group);
                // Replaced by the load event unless the load is refused
                self.status = format!("{} is playing", group);
                self.table.load_selected_track_to_group(&group, false, deck_playing);
            }
            ContextAction::AddToAutoDj(position) => self.table.add_selected_to_auto_dj(position),
            ContextAction::Remove => {
                self.removal = self.table.removal_prompt();
            }
            ContextAction::Unhide => self.table.unhide_selected(),
            ContextAction::Purge => self.table.purge_selected(),
            ContextAction::Properties => self.table.show_selected_track_properties(),
            ContextAction::NextColor => self.table.assign_next_color(),
            ContextAction::PreviousColor => self.table.assign_previous_color(),
            ContextAction::DeleteFromDisk => self.table.delete_selected_from_disk(),
        }
        self.scroll_from_table()
    }

    /// Turn table events into app behavior
    fn drain_table_events(&mut self) {
        for event in self.table.take_events() {
            match event {
                TableEvent::TrackFocused(Some(id)) => {
                    self.status = format!("Selected: {}", self.describe(id));
                }
                TableEvent::TrackFocused(None) => {}
                TableEvent::OnlyCachedCoverArt(cached) => {
                    log::debug!("cover art: cache only = {}", cached);
                }
                TableEvent::LoadTrack(id) => match DECK_GROUPS.iter().find(|g| !self.playing.contains(**g)) {
                    Some(group) => self.load_to_deck(id, group, true),
                    None => self.status = "All decks are playing".to_string(),
                },
                TableEvent::LoadTrackToPlayer { id, group, play } => {
                    self.load_to_deck(id, &group, play);
                }
                TableEvent::AddToAutoDj { ids, position } => self.add_to_auto_dj(&ids, position),
                TableEvent::ShowTrackProperties(id) => self.properties = self.find_entry(id),
                TableEvent::DeleteFromDisk(ids) => self.pending_delete = Some(ids),
            }
        }
    }

    fn dialog_open(&self) -> bool {
        self.removal.is_some()
            || self.pending_delete.is_some()
            || self.properties.is_some()
            || self.context_menu.is_some()
    }

    /// Delete the track files, then drop the deleted tracks from the library
    fn delete_files(&mut self, ids: &[TrackId]) {
        let mut deleted = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(entry) = self.find_entry(id) else {
                continue;
            };
            match std::fs::remove_file(&entry.location) {
                Ok(()) => {
                    log::info!("Deleted {}", entry.location);
                    deleted.push(id);
                }
                Err(e) => log::warn!("Failed to delete {}: {}", entry.location, e),
            }
        }
        self.status = if deleted.len() == ids.len() {
            format!("Deleted {} files", deleted.len())
        } else {
            format!("Deleted {} of {} files", deleted.len(), ids.len())
        };
        self.table.purge_deleted_tracks(&deleted);
    }

    fn load_to_deck(&mut self, id: TrackId, group: &str, play: bool) {
        log::info!("Loading track {} into {} (play: {})", id, group, play);
        if play {
            self.playing.insert(group.to_string());
        }
        self.status = format!("{} -> {}", self.describe(id), group);
    }

    fn add_to_auto_dj(&mut self, ids: &[TrackId], position: AutoDjPosition) {
        let entries: Vec<TrackEntry> = ids.iter().filter_map(|&id| self.find_entry(id)).collect();
        let queue = self
            .auto_dj
            .get_or_insert_with(|| PlaylistModel::new("autodj", Capabilities::auto_dj()));

        let result = match position {
            AutoDjPosition::Bottom => queue.insert_entries(queue.entries().len(), entries),
            AutoDjPosition::Top => queue.insert_entries(0, entries),
            AutoDjPosition::Replace => queue.clear().and_then(|_| queue.insert_entries(0, entries)),
        };
        match result {
            Ok(added) => self.status = format!("Added {} tracks to Auto DJ", added),
            Err(e) => log::warn!("add_to_auto_dj: {}", e),
        }
    }

    fn find_entry(&self, id: TrackId) -> Option<TrackEntry> {
        self.table
            .model()
            .and_then(|m| m.entry_by_id(id))
            .or_else(|| self.library.iter().find(|e| e.id == id))
            .or_else(|| self.auto_dj.as_ref().and_then(|m| m.entry_by_id(id)))
            .cloned()
    }

    fn describe(&self, id: TrackId) -> String {
        match self.find_entry(id) {
            Some(TrackEntry { artist: Some(artist), title, .. }) => format!("{} - {}", artist, title),
            Some(entry) => entry.title,
            None => format!("track {}", id),
        }
    }

    fn switch_source(&mut self, source: Source) {
        if source == self.source {
            return;
        }
        if let Some(previous) = self.table.take_model() {
            self.park(previous);
        }
        self.source = source;
        let model = self.build_model(source);
        self.table.set_model(model, true);
    }

    /// Keep a detached model of the current source
    fn park(&mut self, model: PlaylistModel) {
        match self.source {
            Source::Library | Source::Hidden => self.library = model.entries().to_vec(),
            Source::AutoDj => self.auto_dj = Some(model),
        }
    }

    fn build_model(&mut self, source: Source) -> PlaylistModel {
        match source {
            Source::Library => library_model(self.library.clone()),
            Source::Hidden => PlaylistModel::new(
                "hidden",
                Capabilities::from_slice(&[Capability::Unhide, Capability::Purge, Capability::LoadToDeck]),
            )
            .with_entries(self.library.clone())
            .with_filter(EntryFilter::HiddenOnly),
            Source::AutoDj => self
                .auto_dj
                .take()
                .unwrap_or_else(|| PlaylistModel::new("autodj", Capabilities::auto_dj())),
        }
    }

    /// Save the table layout if it changed since the last save
    fn persist_config(&mut self) {
        let config = self.table.persisted_config();
        if config == self.saved_config {
            return;
        }
        match save_config(&config, &self.config_path) {
            Ok(()) => self.saved_config = config,
            Err(e) => {
                log::warn!("Failed to save config: {:#}", e);
                // Do not retry on every tick
                self.saved_config = config;
            }
        }
    }

    /// Subscriptions: GUI tick, table keys and file drops
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            gui_tick().map(|_| Message::GuiTick),
            table_input().map(Message::Input),
            event::listen_with(file_drop_from_event),
        ])
    }

    /// Build the view
    pub fn view(&self) -> Element<'_, Message> {
        let base = column![
            self.view_header(),
            track_table(&self.table, &self.drag, Message::Table),
            text(&self.status).size(12),
        ]
        .spacing(8)
        .padding(10);

        if let Some(ids) = &self.pending_delete {
            let dialog = container(
                column![
                    text("Delete track files").size(16),
                    text(format!(
                        "Permanently delete {} track files from disk?",
                        ids.len()
                    ))
                    .size(13),
                    row![
                        Space::new().width(Length::Fill),
                        button(text("Cancel"))
                            .on_press(Message::ConfirmDelete(false))
                            .style(button::secondary),
                        button(text("Delete"))
                            .on_press(Message::ConfirmDelete(true))
                            .style(button::danger),
                    ]
                    .spacing(10),
                ]
                .spacing(12),
            )
            .padding(20)
            .width(Length::Fixed(420.0))
            .style(container::rounded_box);

            return stack![base, backdrop(Message::ConfirmDelete(false)), center(opaque(dialog))].into();
        }

        if let Some(entry) = &self.properties {
            let field = |label: &'static str, value: String| {
                row![
                    text(label).size(12).width(Length::Fixed(90.0)),
                    text(value).size(12),
                ]
                .spacing(8)
            };
            let dialog = container(
                column![
                    text(entry.title.clone()).size(16),
                    field("Artist", entry.artist.clone().unwrap_or_default()),
                    field("Album", entry.album.clone().unwrap_or_default()),
                    field("BPM", entry.format_bpm()),
                    field("Duration", entry.format_duration()),
                    field(
                        "Color",
                        entry.color.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string())
                    ),
                    field("Location", entry.location.clone()),
                    row![
                        Space::new().width(Length::Fill),
                        button(text("Close")).on_press(Message::CloseProperties),
                    ],
                ]
                .spacing(8),
            )
            .padding(20)
            .width(Length::Fixed(480.0))
            .style(container::rounded_box);

            return stack![base, backdrop(Message::CloseProperties), center(opaque(dialog))].into();
        }

        if let Some(prompt) = &self.removal {
            let dialog = container(
                column![
                    text(prompt.kind.title()).size(16),
                    text(prompt.kind.message()).size(13),
                    row![
                        Space::new().width(Length::Fill),
                        button(text("Cancel"))
                            .on_press(Message::ConfirmRemoval(false))
                            .style(button::secondary),
                        button(text("OK"))
                            .on_press(Message::ConfirmRemoval(true))
                            .style(button::danger),
                    ]
                    .spacing(10),
                ]
                .spacing(12),
            )
            .padding(20)
            .width(Length::Fixed(420.0))
            .style(container::rounded_box);

            stack![base, backdrop(Message::ConfirmRemoval(false)), center(opaque(dialog))].into()
        } else if let Some((row, position)) = self.context_menu {
            let menu = container(self.view_context_menu(row))
                .padding(6)
                .style(container::rounded_box);
            let placed = column![
                Space::new().height(Length::Fixed(position.y + 80.0)),
                row![Space::new().width(Length::Fixed(position.x + 10.0)), opaque(menu)],
            ];
            stack![base, backdrop(Message::CloseContextMenu), placed].into()
        } else {
            base.into()
        }
    }

    fn view_header(&self) -> Element<'_, Message> {
        let source_btn = |source: Source| {
            button(text(source.label()))
                .on_press(Message::SwitchSource(source))
                .style(if self.source == source {
                    button::primary
                } else {
                    button::secondary
                })
        };

        let mut decks: Vec<&str> = DECK_GROUPS
            .iter()
            .copied()
            .filter(|g| self.playing.contains(*g))
            .collect();
        decks.sort_unstable();
        let playing = if decks.is_empty() {
            "No deck playing".to_string()
        } else {
            format!("Playing: {}", decks.join(" "))
        };

        row![
            text("trackview").size(24),
            source_btn(Source::Library),
            source_btn(Source::Hidden),
            source_btn(Source::AutoDj),
            Space::new().width(Length::Fill),
            text(playing).size(12),
            button(text("Stop decks"))
                .on_press(Message::StopDecks)
                .style(button::secondary),
        ]
        .spacing(10)
        .into()
    }

    fn view_context_menu(&self, _row: usize) -> Element<'_, Message> {
        let caps = self.table.capabilities();
        let item = |label: String, action: ContextAction| -> Element<'_, Message> {
            button(text(label).size(12))
                .on_press(Message::Context(action))
                .width(Length::Fill)
                .style(button::text)
                .into()
        };

        let mut items: Vec<Element<'_, Message>> = Vec::new();
        if caps.contains(Capability::LoadToDeck) {
            for (i, group) in DECK_GROUPS.iter().enumerate() {
                items.push(item(format!("Load to Deck {}", i + 1), ContextAction::LoadToGroup(group.to_string())));
            }
            items.push(item(
                "Load to Preview Deck".to_string(),
                ContextAction::LoadToGroup(PREVIEW_DECK_GROUP.to_string()),
            ));
        }
        if caps.contains(Capability::AddToAutoDj) {
            items.push(item("Add to Auto DJ (bottom)".to_string(), ContextAction::AddToAutoDj(AutoDjPosition::Bottom)));
            items.push(item("Add to Auto DJ (top)".to_string(), ContextAction::AddToAutoDj(AutoDjPosition::Top)));
            items.push(item("Replace Auto DJ queue".to_string(), ContextAction::AddToAutoDj(AutoDjPosition::Replace)));
        }
        if caps.contains(Capability::Hide) {
            items.push(item("Hide from Library".to_string(), ContextAction::Remove));
        } else if [Capability::Remove, Capability::RemoveCrate, Capability::RemovePlaylist]
            .iter()
            .any(|&cap| caps.contains(cap))
        {
            items.push(item("Remove".to_string(), ContextAction::Remove));
        }
        if caps.contains(Capability::Unhide) {
            items.push(item("Unhide from Library".to_string(), ContextAction::Unhide));
        }
        if caps.contains(Capability::Purge) {
            items.push(item("Purge from Library".to_string(), ContextAction::Purge));
        }
        if caps.contains(Capability::RemoveFromDisk) {
            items.push(item("Delete files from disk".to_string(), ContextAction::DeleteFromDisk));
        }
        if caps.contains(Capability::EditMetadata) {
            items.push(item("Next color".to_string(), ContextAction::NextColor));
            items.push(item("Previous color".to_string(), ContextAction::PreviousColor));
        }
        if self.table.selection().len() == 1 {
            items.push(item("Properties (Ctrl+Enter)".to_string(), ContextAction::Properties));
        }

        column(items).spacing(2).width(Length::Fixed(220.0)).into()
    }
}

fn library_model(entries: Vec<TrackEntry>) -> PlaylistModel {
    PlaylistModel::new("library", Capabilities::library()).with_entries(entries)
}

/// Full-window click catcher behind overlays
fn backdrop<'a>(on_press: Message) -> Element<'a, Message> {
    mouse_area(
        container(Space::new())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.4).into()),
                ..Default::default()
            }),
    )
    .on_press(on_press)
    .into()
}

fn file_drop_from_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        _ => None,
    }
}

/// Scan the collection on a blocking worker
fn scan_task(root: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || scan_collection(&root))
                .await
                .map_err(|e| e.to_string())
                .and_then(|result| result.map_err(|e| format!("{:#}", e)))
        },
        Message::CollectionScanned,
    )
}

/// Collection folder from the command line, or the configured one
pub fn collection_from_args(args: &[String], config: &LibraryViewConfig) -> PathBuf {
    args.iter()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| config.collection_path.clone())
}
