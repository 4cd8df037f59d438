//! Subscription handles
//!
//! A subscription is registered under one variable name and identified by a
//! [`SubscriptionId`]. The [`Subscription`] guard owns that registration:
//! dropping it deregisters the callback, so a destroyed node never leaves a
//! callback behind in a store that outlives it.

use super::VariableStore;
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Identifier of one registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Callback type invoked with the newly set value
pub type Callback = dyn Fn(f64);

/// One registered callback. `active` is cleared on unsubscribe so a wave
/// that already snapshotted the slot skips it.
pub(crate) struct SubscriberSlot {
    pub(crate) id: SubscriptionId,
    pub(crate) active: Cell<bool>,
    pub(crate) callback: Box<Callback>,
}

impl SubscriberSlot {
    pub(crate) fn new(id: SubscriptionId, callback: Box<Callback>) -> Rc<Self> {
        Rc::new(Self {
            id,
            active: Cell::new(true),
            callback,
        })
    }
}

/// RAII guard for a subscription
///
/// Holds only a weak reference to the store: if the store is gone first,
/// dropping the guard is a no-op.
#[must_use = "dropping a Subscription deregisters its callback"]
pub struct Subscription {
    store: Weak<VariableStore>,
    id: SubscriptionId,
    variable: String,
}

impl Subscription {
    pub(crate) fn new(store: Weak<VariableStore>, id: SubscriptionId, variable: String) -> Self {
        Self {
            store,
            id,
            variable,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Name of the variable this subscription listens to
    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("variable", &self.variable)
            .finish()
    }
}
