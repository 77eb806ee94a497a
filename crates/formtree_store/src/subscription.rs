//! Subscription guards.
//!
//! Both guards unregister on drop. They hold only a weak reference to the
//! store, so a guard that outlives its store is inert.

use std::fmt;
use std::rc::Weak;

use formtree_foundation::Path;

use crate::observer::ObserverId;
use crate::store::Shared;
use crate::validator::Validator;

/// Keeps an observer registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the observer"]
pub struct Subscription {
    shared: Weak<Shared>,
    path: Path,
    id: ObserverId,
}

impl Subscription {
    pub(crate) fn new(shared: Weak<Shared>, path: Path, id: ObserverId) -> Self {
        Self { shared, path, id }
    }

    /// Returns the observed path. The root path means the global channel.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unsubscribes now.
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.observers.borrow_mut().unsubscribe(&self.path, self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("id", &self.id)
            .finish()
    }
}

/// Keeps a set of local validators mounted on one path. Dropping it removes
/// exactly those validator instances.
///
/// Removal does not revalidate the path; its last error stays in place until
/// the next write.
#[must_use = "dropping an ItemSubscription unmounts its validators"]
pub struct ItemSubscription {
    shared: Weak<Shared>,
    path: Path,
    validators: Vec<Validator>,
}

impl ItemSubscription {
    pub(crate) fn new(shared: Weak<Shared>, path: Path, validators: Vec<Validator>) -> Self {
        Self {
            shared,
            path,
            validators,
        }
    }

    /// Returns the path the validators are mounted on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unmounts the validators now.
    pub fn dispose(self) {}
}

impl Drop for ItemSubscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared
                .validators
                .borrow_mut()
                .unregister(&self.path, &self.validators);
        }
    }
}

impl fmt::Debug for ItemSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemSubscription")
            .field("path", &self.path)
            .field("validators", &self.validators.len())
            .finish()
    }
}
