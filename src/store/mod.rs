//! Variable Store: the single source of truth for process variables
//!
//! Every visual node reads and writes named `f64` variables through this
//! store. Each name carries:
//!
//! - a current value (`get` of an unknown name is `0.0`, never an error)
//! - a bounded history ring (capacity [`HISTORY_CAPACITY`], oldest evicted)
//! - an ordered subscriber list notified synchronously on every `set`
//!
//! # Re-entrancy
//!
//! The store is used from the single frame-loop thread and mutated through
//! `&self`. `set` takes a snapshot of the subscriber list before notifying
//! and releases every internal borrow first, so a subscriber may call `set`,
//! `subscribe` or `unsubscribe` on the same store. Subscribers added during a
//! notification wave are first visited by the next `set`; subscribers removed
//! during a wave are skipped if they have not been called yet.

mod subscription;

pub use subscription::{Callback, Subscription, SubscriptionId};

use subscription::SubscriberSlot;

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

/// Maximum number of history samples retained per variable
pub const HISTORY_CAPACITY: usize = 100;

/// Fixed status variable driven by the `change_color` builtin
pub const STATUS_VARIABLE: &str = "panel_status";
/// Fixed temperature variable for the temperature builtins and demo control
pub const TEMPERATURE_VARIABLE: &str = "temperature_value";
/// Setpoint the demo control step drives the temperature towards
pub const SETPOINT_VARIABLE: &str = "setpoint_value";
/// Fixed pressure variable for the pressure builtins
pub const PRESSURE_VARIABLE: &str = "pressure_value";
/// History channel the demo control step appends to
pub const TEMPERATURE_HISTORY: &str = "temperature_history";
/// Demo pressure history channel
pub const PRESSURE_HISTORY: &str = "pressure_history";

/// Pub/sub key-value store with bounded per-variable history
pub struct VariableStore {
    values: RefCell<HashMap<String, f64>>,
    history: RefCell<HashMap<String, VecDeque<f64>>>,
    subscribers: RefCell<HashMap<String, Vec<Rc<SubscriberSlot>>>>,
    next_id: Cell<u64>,
    history_capacity: usize,
}

impl VariableStore {
    /// Create an empty store with the default history capacity
    pub fn new() -> Self {
        Self::with_history_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty store keeping at most `capacity` samples per name
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            history: RefCell::new(HashMap::new()),
            subscribers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            history_capacity: capacity.max(1),
        }
    }

    /// Convenience constructor for the shared handle nodes subscribe through
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    // ── Values ──

    /// Overwrite the value, append it to history and notify subscribers.
    ///
    /// There is no change detection: setting the same value again still
    /// grows history and fires every subscriber.
    pub fn set(&self, name: &str, value: f64) {
        self.values.borrow_mut().insert(name.to_string(), value);
        self.push_history(name, value);

        let wave: Vec<Rc<SubscriberSlot>> = self
            .subscribers
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default();

        tracing::trace!(
            "Variable '{}' set to {} ({} subscribers)",
            name,
            value,
            wave.len()
        );

        for slot in wave {
            if slot.active.get() {
                (slot.callback)(value);
            }
        }
    }

    /// Current value, or `0.0` if the name was never set
    pub fn get(&self, name: &str) -> f64 {
        self.values.borrow().get(name).copied().unwrap_or(0.0)
    }

    /// Whether a value was ever set under this name
    pub fn exists(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    /// Names with a current value, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Copy of all current values, ordered by name
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.values
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    // ── History ──

    /// History samples oldest to newest (empty if none)
    pub fn history(&self, name: &str) -> Vec<f64> {
        self.history
            .borrow()
            .get(name)
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn history_len(&self, name: &str) -> usize {
        self.history.borrow().get(name).map_or(0, VecDeque::len)
    }

    /// Append to a history channel without touching the current value and
    /// without notifying subscribers.
    pub fn push_history(&self, name: &str, value: f64) {
        let mut history = self.history.borrow_mut();
        let ring = history
            .entry(name.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.history_capacity));
        ring.push_back(value);
        while ring.len() > self.history_capacity {
            ring.pop_front();
        }
    }

    // ── Subscriptions ──

    /// Register `callback` for every future `set(name, ..)`, returning a
    /// guard that deregisters it on drop.
    pub fn subscribe(self: &Rc<Self>, name: &str, callback: impl Fn(f64) + 'static) -> Subscription {
        let id = self.subscribe_raw(name, callback);
        Subscription::new(Rc::downgrade(self), id, name.to_string())
    }

    /// Register a callback without a guard; the caller owns deregistration
    /// through [`VariableStore::unsubscribe`].
    pub fn subscribe_raw(&self, name: &str, callback: impl Fn(f64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.subscribers
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(SubscriberSlot::new(id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        for slots in subscribers.values_mut() {
            if let Some(pos) = slots.iter().position(|s| s.id == id) {
                let slot = slots.remove(pos);
                slot.active.set(false);
                return true;
            }
        }
        false
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.subscribers.borrow().get(name).map_or(0, Vec::len)
    }

    // ── Demo data ──

    /// Seed the variables the demonstration scene binds to
    pub fn seed_demo_values(&self) {
        self.set(STATUS_VARIABLE, 0.0);
        self.set(TEMPERATURE_VARIABLE, 72.5);
        self.set(SETPOINT_VARIABLE, 65.0);
        self.set(PRESSURE_VARIABLE, 1.2);

        for i in 0..10 {
            self.set(TEMPERATURE_HISTORY, 70.0 + i as f64 * 0.5);
        }
        for i in 0..10 {
            self.set(PRESSURE_HISTORY, 1.0 + i as f64 * 0.05);
        }
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VariableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableStore")
            .field("variables", &self.len())
            .field("history_capacity", &self.history_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_get_unknown_is_zero() {
        let store = VariableStore::new();
        assert_eq!(store.get("nope"), 0.0);
        assert!(!store.exists("nope"));
        assert!(store.history("nope").is_empty());
    }

    #[test]
    fn test_history_keeps_last_hundred() {
        let store = VariableStore::new();
        for i in 0..105 {
            store.set("level", i as f64);
        }

        let history = store.history("level");
        assert_eq!(history.len(), 100);
        let expected: Vec<f64> = (5..105).map(|i| i as f64).collect();
        assert_eq!(history, expected);
    }

    #[test]
    fn test_subscribers_fire_in_order_even_for_same_value() {
        let store = VariableStore::shared();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let c1 = calls.clone();
        let _a = store.subscribe("x", move |v| c1.borrow_mut().push(("a", v)));
        let c2 = calls.clone();
        let _b = store.subscribe("x", move |v| c2.borrow_mut().push(("b", v)));

        store.set("x", 3.0);
        store.set("x", 3.0);

        assert_eq!(
            *calls.borrow(),
            vec![("a", 3.0), ("b", 3.0), ("a", 3.0), ("b", 3.0)]
        );
        assert_eq!(store.history_len("x"), 2);
    }

    #[test]
    fn test_reentrant_set_from_subscriber() {
        let store = VariableStore::shared();
        let weak = Rc::downgrade(&store);
        let _mirror = store.subscribe("celsius", move |v| {
            if let Some(store) = weak.upgrade() {
                store.set("fahrenheit", v * 9.0 / 5.0 + 32.0);
            }
        });

        store.set("celsius", 100.0);
        assert_eq!(store.get("fahrenheit"), 212.0);
    }

    #[test]
    fn test_subscriber_added_during_wave_waits_for_next_set() {
        let store = VariableStore::shared();
        let late_calls = Rc::new(Cell::new(0));
        let added = Rc::new(Cell::new(false));

        let weak = Rc::downgrade(&store);
        let late = late_calls.clone();
        let added_flag = added.clone();
        store.subscribe_raw("x", move |_| {
            if added_flag.get() {
                return;
            }
            added_flag.set(true);
            if let Some(store) = weak.upgrade() {
                let late = late.clone();
                store.subscribe_raw("x", move |_| late.set(late.get() + 1));
            }
        });

        store.set("x", 1.0);
        assert_eq!(late_calls.get(), 0);
        store.set("x", 2.0);
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_wave_skips_pending_slot() {
        let store = VariableStore::shared();
        let second_calls = Rc::new(Cell::new(0));
        let second_id = Rc::new(Cell::new(None));

        let weak = Rc::downgrade(&store);
        let id_cell = second_id.clone();
        store.subscribe_raw("x", move |_| {
            if let (Some(store), Some(id)) = (weak.upgrade(), id_cell.get()) {
                store.unsubscribe(id);
            }
        });
        let counter = second_calls.clone();
        second_id.set(Some(
            store.subscribe_raw("x", move |_| counter.set(counter.get() + 1)),
        ));

        store.set("x", 1.0);
        assert_eq!(second_calls.get(), 0);
        assert_eq!(store.subscriber_count("x"), 1);
    }

    #[test]
    fn test_dropping_guard_deregisters() {
        let store = VariableStore::shared();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let guard = store.subscribe("x", move |_| c.set(c.get() + 1));

        store.set("x", 1.0);
        drop(guard);
        store.set("x", 2.0);

        assert_eq!(calls.get(), 1);
        assert_eq!(store.subscriber_count("x"), 0);
    }

    #[test]
    fn test_guard_outliving_store_is_harmless() {
        let store = VariableStore::shared();
        let guard = store.subscribe("x", |_| {});
        drop(store);
        drop(guard);
    }

    #[test]
    fn test_push_history_does_not_notify_or_set() {
        let store = VariableStore::shared();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _g = store.subscribe("trend", move |_| c.set(c.get() + 1));

        store.push_history("trend", 4.0);

        assert_eq!(calls.get(), 0);
        assert!(!store.exists("trend"));
        assert_eq!(store.history("trend"), vec![4.0]);
    }

    #[test]
    fn test_seed_demo_values() {
        let store = VariableStore::new();
        store.seed_demo_values();
        assert_eq!(store.get(TEMPERATURE_VARIABLE), 72.5);
        assert_eq!(store.get(SETPOINT_VARIABLE), 65.0);
        assert_eq!(store.history_len(TEMPERATURE_HISTORY), 10);
        assert_eq!(store.history(PRESSURE_HISTORY)[0], 1.0);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let store = VariableStore::new();
        store.set("b", 2.0);
        store.set("a", 1.0);
        let keys: Vec<_> = store.snapshot().into_keys().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    proptest! {
        #[test]
        fn test_set_then_get(name in "[a-z_]{1,12}", value in proptest::num::f64::NORMAL) {
            let store = VariableStore::new();
            store.set(&name, value);
            prop_assert_eq!(store.get(&name), value);
            prop_assert!(store.exists(&name));
        }

        #[test]
        fn test_history_never_exceeds_capacity(values in prop::collection::vec(-1e6f64..1e6, 0..300)) {
            let store = VariableStore::new();
            for v in &values {
                store.set("v", *v);
            }
            let history = store.history("v");
            prop_assert!(history.len() <= HISTORY_CAPACITY);
            let start = values.len().saturating_sub(HISTORY_CAPACITY);
            prop_assert_eq!(history, values[start..].to_vec());
        }
    }
}
