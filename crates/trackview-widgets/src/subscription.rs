//! Subscriptions driving the track table
//!
//! # Usage
//!
//! ```ignore
//! use trackview_widgets::{gui_tick, table_input};
//!
//! fn subscription(&self) -> Subscription<Message> {
//!     Subscription::batch([
//!         gui_tick().map(|_| Message::GuiTick),
//!         table_input().map(Message::Input),
//!     ])
//! }
//! ```

use iced::keyboard::{self, key::Named, Key};
use iced::{event, time, window, Event, Subscription};

use trackview_core::cover_art::GUI_TICK_INTERVAL;
use trackview_core::SelectModifiers;

use crate::track_table::TableKey;

/// Keyboard input relevant to the track table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableInput {
    /// Shift/Ctrl state changed (for Shift+click and Ctrl+click selection)
    ModifiersChanged(SelectModifiers),
    /// A navigation or action key was pressed
    Key(TableKey),
}

/// Periodic tick for the cover-art throttle
pub fn gui_tick() -> Subscription<time::Instant> {
    time::every(GUI_TICK_INTERVAL)
}

/// Modifier changes and table keys from the window's event stream
///
/// Key presses already handled by a widget (e.g. typing in the search box)
/// are ignored.
pub fn table_input() -> Subscription<TableInput> {
    event::listen_with(table_input_from_event)
}

fn table_input_from_event(
    event: Event,
    status: event::Status,
    _window: window::Id,
) -> Option<TableInput> {
    match event {
        Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
            Some(TableInput::ModifiersChanged(select_modifiers(modifiers)))
        }
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. })
            if status == event::Status::Ignored =>
        {
            table_key(&key, modifiers).map(TableInput::Key)
        }
        _ => None,
    }
}

/// Map iced modifiers to selection modifiers (Cmd counts as Ctrl on macOS)
pub fn select_modifiers(modifiers: keyboard::Modifiers) -> SelectModifiers {
    SelectModifiers {
        shift: modifiers.shift(),
        ctrl: modifiers.control() || modifiers.logo(),
    }
}

/// Table key for a pressed key and the modifiers held with it
pub fn table_key(key: &Key, modifiers: keyboard::Modifiers) -> Option<TableKey> {
    let ctrl = modifiers.control() || modifiers.logo();
    match key.as_ref() {
        Key::Named(Named::ArrowUp) => Some(TableKey::Up),
        Key::Named(Named::ArrowDown) => Some(TableKey::Down),
        Key::Named(Named::PageUp) => Some(TableKey::PageUp),
        Key::Named(Named::PageDown) => Some(TableKey::PageDown),
        Key::Named(Named::Enter) if ctrl => Some(TableKey::Properties),
        Key::Named(Named::Enter) => Some(TableKey::Enter),
        Key::Named(Named::Delete) if modifiers.shift() => Some(TableKey::DeleteFromDisk),
        Key::Named(Named::Delete) => Some(TableKey::Delete),
        Key::Character("]") if ctrl => Some(TableKey::NextColor),
        Key::Character("[") if ctrl => Some(TableKey::PreviousColor),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_keys() {
        let none = keyboard::Modifiers::default();
        assert_eq!(table_key(&Key::Named(Named::ArrowDown), none), Some(TableKey::Down));
        assert_eq!(table_key(&Key::Named(Named::Delete), none), Some(TableKey::Delete));
        assert_eq!(table_key(&Key::Character("a".into()), none), None);
        assert_eq!(table_key(&Key::Character("]".into()), none), None);
    }

    #[test]
    fn test_modified_table_keys() {
        let ctrl = keyboard::Modifiers::CTRL;
        assert_eq!(table_key(&Key::Named(Named::Enter), ctrl), Some(TableKey::Properties));
        assert_eq!(
            table_key(&Key::Named(Named::Delete), keyboard::Modifiers::SHIFT),
            Some(TableKey::DeleteFromDisk)
        );
        assert_eq!(table_key(&Key::Character("]".into()), ctrl), Some(TableKey::NextColor));
        assert_eq!(
            table_key(&Key::Character("[".into()), keyboard::Modifiers::LOGO),
            Some(TableKey::PreviousColor)
        );
    }

    #[test]
    fn test_select_modifiers() {
        let mods = select_modifiers(keyboard::Modifiers::SHIFT | keyboard::Modifiers::LOGO);
        assert!(mods.shift);
        assert!(mods.ctrl);
        assert_eq!(select_modifiers(keyboard::Modifiers::ALT), SelectModifiers::default());
    }
}
