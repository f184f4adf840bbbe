//! Saved view states keyed by model
//!
//! When the user leaves a view (switches playlist, changes the query) its
//! scroll position and selection are stored under the model key, so coming
//! back to the exact same view puts them where they were.

use std::collections::HashMap;

use crate::selection::SelectionSnapshot;

/// Scroll position and selection of one view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<Id> {
    /// Vertical scroll offset in pixels
    pub scroll_position: f32,
    /// Selection by track identifier
    pub selection: SelectionSnapshot<Id>,
}

/// Store of view states keyed by an opaque model key
pub trait ViewStateStore<Id> {
    /// Saved state for `key`, if any
    fn get(&self, key: &str) -> Option<&ViewState<Id>>;

    /// Save (or replace) the state for `key`
    fn insert(&mut self, key: String, state: ViewState<Id>);

    /// Forget the state for `key`
    fn remove(&mut self, key: &str) -> Option<ViewState<Id>>;
}

/// In-memory [`ViewStateStore`]
#[derive(Debug, Clone)]
pub struct MemoryViewStateStore<Id> {
    states: HashMap<String, ViewState<Id>>,
}

impl<Id> Default for MemoryViewStateStore<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id> MemoryViewStateStore<Id> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<Id> ViewStateStore<Id> for MemoryViewStateStore<Id> {
    fn get(&self, key: &str) -> Option<&ViewState<Id>> {
        self.states.get(key)
    }

    fn insert(&mut self, key: String, state: ViewState<Id>) {
        self.states.insert(key, state);
    }

    fn remove(&mut self, key: &str) -> Option<ViewState<Id>> {
        self.states.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replace_remove() {
        let mut store: MemoryViewStateStore<u32> = MemoryViewStateStore::new();
        assert!(store.get("library").is_none());

        store.insert(
            "library".to_string(),
            ViewState {
                scroll_position: 10.0,
                selection: SelectionSnapshot::default(),
            },
        );
        store.insert(
            "library".to_string(),
            ViewState {
                scroll_position: 42.0,
                selection: SelectionSnapshot {
                    selected: vec![7],
                    current: Some((7, 1)),
                },
            },
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("library").map(|s| s.scroll_position), Some(42.0));

        assert!(store.remove("library").is_some());
        assert!(store.is_empty());
    }
}
