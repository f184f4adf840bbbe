//! Trackview Browser - music folder browser built on the trackview track table
//!
//! Scans a music folder (first argument, or the configured collection path)
//! and shows it in a sortable, searchable, reorderable track table.
//!
//! Set `RUST_LOG=debug` for selection, sort and search traces.

mod app;
mod library;

use std::cell::RefCell;

use iced::{Size, Task};

use app::{BrowserApp, Message};
use trackview_core::config::{default_config_path, load_config, LibraryViewConfig, LIBRARY_VIEW_CONFIG_FILE};

fn main() -> iced::Result {
    let args: Vec<String> = std::env::args().collect();

    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("trackview-browser starting up");

    let config_path = default_config_path(LIBRARY_VIEW_CONFIG_FILE);
    let config: LibraryViewConfig = load_config(&config_path);
    let collection = app::collection_from_args(&args, &config);
    log::info!("Collection folder: {:?}", collection);

    // The boot function must be Fn; it is only called once
    let boot_state = RefCell::new(Some((config, config_path, collection)));

    iced::application(
        move || -> (BrowserApp, Task<Message>) {
            match boot_state.borrow_mut().take() {
                Some((config, config_path, collection)) => BrowserApp::new(config, config_path, collection),
                None => BrowserApp::new(
                    LibraryViewConfig::default(),
                    default_config_path(LIBRARY_VIEW_CONFIG_FILE),
                    LibraryViewConfig::default().collection_path,
                ),
            }
        },
        update,
        view,
    )
    .subscription(subscription)
    .theme(theme)
    .title(title)
    .window_size(Size::new(1100.0, 750.0))
    .run()
}

/// Update function for iced
fn update(app: &mut BrowserApp, message: Message) -> Task<Message> {
    app.update(message)
}

/// View function for iced
fn view(app: &BrowserApp) -> iced::Element<'_, Message> {
    app.view()
}

/// Subscription function for iced
fn subscription(app: &BrowserApp) -> iced::Subscription<Message> {
    app.subscription()
}

/// Theme function for iced
fn theme(app: &BrowserApp) -> iced::Theme {
    app.theme()
}

/// Title function for iced
fn title(app: &BrowserApp) -> String {
    app.title()
}
