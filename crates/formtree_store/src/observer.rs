//! Observer registry: one global channel plus one channel per path.
//!
//! Observers are zero-argument callbacks. They carry no payload; whoever is
//! notified re-reads the store. Notification always works on a snapshot of
//! the relevant lists, so callbacks may subscribe, unsubscribe or write to
//! the store while a notification is in flight.

use std::collections::HashMap;
use std::rc::Rc;

use formtree_foundation::Path;

/// Shared observer callback.
pub type Callback = Rc<dyn Fn()>;

/// Identifies one registration within a hub.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of global and path-scoped observers.
#[derive(Default)]
pub struct ObserverHub {
    next_id: u64,
    global: Vec<(ObserverId, Callback)>,
    scoped: HashMap<Path, Vec<(ObserverId, Callback)>>,
}

impl ObserverHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Registers `callback`. The root path selects the global channel.
    pub fn subscribe(&mut self, path: &Path, callback: Callback) -> ObserverId {
        let id = self.next_id();
        if path.is_root() {
            self.global.push((id, callback));
        } else {
            self.scoped
                .entry(path.clone())
                .or_default()
                .push((id, callback));
        }
        id
    }

    /// Removes a registration. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, path: &Path, id: ObserverId) -> bool {
        if path.is_root() {
            let before = self.global.len();
            self.global.retain(|(other, _)| *other != id);
            return self.global.len() != before;
        }
        let Some(list) = self.scoped.get_mut(path) else {
            return false;
        };
        let before = list.len();
        list.retain(|(other, _)| *other != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.scoped.remove(path);
        }
        removed
    }

    /// Returns the global observers in registration order.
    #[must_use]
    pub fn global(&self) -> Vec<Callback> {
        self.global.iter().map(|(_, cb)| Rc::clone(cb)).collect()
    }

    /// Returns the observers scoped to `path` in registration order.
    ///
    /// For the root path this is the global channel.
    #[must_use]
    pub fn scoped(&self, path: &Path) -> Vec<Callback> {
        if path.is_root() {
            return self.global();
        }
        self.scoped
            .get(path)
            .map(|list| list.iter().map(|(_, cb)| Rc::clone(cb)).collect())
            .unwrap_or_default()
    }

    /// Returns the number of observers on the channel for `path`.
    #[must_use]
    pub fn count(&self, path: &Path) -> usize {
        if path.is_root() {
            self.global.len()
        } else {
            self.scoped.get(path).map_or(0, Vec::len)
        }
    }
}
