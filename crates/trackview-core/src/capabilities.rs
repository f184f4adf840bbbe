//! Capability sets for track models
//!
//! Each view over the library (main library, playlist, crate, AutoDJ queue,
//! hidden tracks...) supports a different subset of operations. Callers query
//! the set explicitly before offering an action instead of probing the model.

use std::fmt;

/// A single operation a track model may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Rows can be reordered by drag and drop inside the view
    Reorder,
    /// Tracks dragged in from outside the view can be inserted
    ReceiveDrops,
    /// Tracks can be loaded onto a deck
    LoadToDeck,
    /// Tracks can be sent to the AutoDJ queue
    AddToAutoDj,
    /// Tracks can be hidden from the library
    Hide,
    /// Hidden tracks can be restored
    Unhide,
    /// Tracks can be purged from the library database
    Purge,
    /// Tracks can be removed from the AutoDJ queue
    Remove,
    /// Tracks can be removed from a crate
    RemoveCrate,
    /// Tracks can be removed from a playlist
    RemovePlaylist,
    /// Track metadata such as the color can be edited
    EditMetadata,
    /// Track files can be deleted from disk
    RemoveFromDisk,
}

impl Capability {
    /// All capabilities in declaration order
    pub fn all() -> &'static [Capability] {
        &[
            Capability::Reorder,
            Capability::ReceiveDrops,
            Capability::LoadToDeck,
            Capability::AddToAutoDj,
            Capability::Hide,
            Capability::Unhide,
            Capability::Purge,
            Capability::Remove,
            Capability::RemoveCrate,
            Capability::RemovePlaylist,
            Capability::EditMetadata,
            Capability::RemoveFromDisk,
        ]
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// A set of [`Capability`] flags
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u16);

impl Capabilities {
    /// The empty set
    pub const fn none() -> Self {
        Self(0)
    }

    /// Build a set from a list of capabilities
    pub fn from_slice(caps: &[Capability]) -> Self {
        caps.iter().fold(Self::none(), |set, &cap| set.with(cap))
    }

    /// Capabilities of the main library view
    pub fn library() -> Self {
        Self::from_slice(&[
            Capability::ReceiveDrops,
            Capability::LoadToDeck,
            Capability::AddToAutoDj,
            Capability::Hide,
            Capability::Purge,
            Capability::EditMetadata,
            Capability::RemoveFromDisk,
        ])
    }

    /// Capabilities of a user playlist
    pub fn playlist() -> Self {
        Self::from_slice(&[
            Capability::Reorder,
            Capability::ReceiveDrops,
            Capability::LoadToDeck,
            Capability::AddToAutoDj,
            Capability::RemovePlaylist,
            Capability::EditMetadata,
        ])
    }

    /// Capabilities of a crate (unordered, so no reordering)
    pub fn crate_view() -> Self {
        Self::from_slice(&[
            Capability::ReceiveDrops,
            Capability::LoadToDeck,
            Capability::AddToAutoDj,
            Capability::RemoveCrate,
            Capability::EditMetadata,
        ])
    }

    /// Capabilities of the AutoDJ queue
    pub fn auto_dj() -> Self {
        Self::from_slice(&[
            Capability::Reorder,
            Capability::ReceiveDrops,
            Capability::LoadToDeck,
            Capability::Remove,
            Capability::EditMetadata,
        ])
    }

    /// Return a copy with `cap` added
    pub fn with(self, cap: Capability) -> Self {
        Self(self.0 | cap.bit())
    }

    /// Return a copy with `cap` removed
    pub fn without(self, cap: Capability) -> Self {
        Self(self.0 & !cap.bit())
    }

    /// Add a capability in place
    pub fn insert(&mut self, cap: Capability) {
        self.0 |= cap.bit();
    }

    /// Check whether `cap` is in the set
    pub fn contains(&self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    /// Check whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the capabilities in the set
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::all().iter().copied().filter(|&cap| self.contains(cap))
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        iter.into_iter().fold(Self::none(), |set, cap| set.with(cap))
    }
}
