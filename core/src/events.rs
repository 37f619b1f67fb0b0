//! Typed listener registry.
//!
//! Each observable object owns a `ListenerList` of boxed trait objects and
//! hands out `ListenerId`s for removal. There is no global registry.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::{Rect, Size2D};

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned on registration, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Listeners in registration order.
pub struct ListenerList<L: ?Sized> {
    listeners: Vec<(ListenerId, Box<L>)>,
}

impl<L: ?Sized> Default for ListenerList<L> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<L: ?Sized> ListenerList<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Box<L>) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener; returns `false` if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Calls `f` for every listener, in registration order.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut L)) {
        for (_, listener) in self.listeners.iter_mut() {
            f(listener);
        }
    }
}

impl<L: ?Sized> std::fmt::Debug for ListenerList<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.listeners.len())
            .finish()
    }
}

/// Payload of map grid notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapGridEvent {
    /// Bounding box of the changed squares; the whole grid for resizes.
    pub rec_change: Rect,
    /// Grid size after the change.
    pub size: Size2D,
}

/// Receives map grid notifications.
///
/// Listeners run synchronously while the grid is borrowed, so they cannot
/// mutate the grid they observe.
pub trait MapGridListener: Send {
    /// Flags of some squares changed; fired once per outermost transaction.
    fn map_grid_changed(&mut self, event: &MapGridEvent);

    /// The grid was resized.
    fn map_grid_resized(&mut self, event: &MapGridEvent);
}
