//! Change notification for the lookup engine.
//!
//! A [`Signal`] is a list of callbacks run when the engine reports something:
//! a suggestion was highlighted, a suggestion was committed into a control,
//! a record refresh finished. Hosts subscribe with [`Signal::connect`] and
//! unsubscribe with the returned [`ConnectionId`], or hold a
//! [`ConnectionGuard`] that unsubscribes on drop.
//!
//! Callbacks run synchronously on the emitting thread. The engine emits only
//! from the host thread; results from background fetches are routed through a
//! [`TaskQueue`](crate::TaskQueue) first.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use horizon_lookup_core::Signal;
//!
//! let committed = Signal::<String>::new();
//! let count = Arc::new(AtomicUsize::new(0));
//!
//! let seen = count.clone();
//! let id = committed.connect(move |text| {
//!     assert!(!text.is_empty());
//!     seen.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! committed.emit("Laser 1234 (Ann)".to_string());
//! committed.disconnect(id);
//! committed.emit("ignored".to_string());
//! assert_eq!(count.load(Ordering::Relaxed), 1);
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies one connected callback; pass it to [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Connected callbacks plus their connection order. SlotMap reuses freed
/// slots, so its own iteration order says nothing about connection order.
struct Slots<Args> {
    map: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

impl<Args> Slots<Args> {
    fn remove(&mut self, id: ConnectionId) -> bool {
        let removed = self.map.remove(id).is_some();
        if removed {
            self.order.retain(|&other| other != id);
        }
        removed
    }
}

type Shared<Args> = Mutex<Slots<Args>>;

/// A typed notification with any number of connected callbacks.
///
/// Callbacks run in the order they were connected. The slot table is not
/// locked while they run, so a callback may connect or disconnect callbacks
/// (including itself); the change applies from the next emission.
pub struct Signal<Args> {
    shared: Arc<Shared<Args>>,
}

impl<Args: 'static> Signal<Args> {
    /// Create a signal with nothing connected.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Slots {
                map: SlotMap::with_key(),
                order: Vec::new(),
            })),
        }
    }

    /// Run `slot` on every emission until disconnected.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut slots = self.shared.lock();
        let id = slots.map.insert(Arc::new(slot));
        slots.order.push(id);
        drop(slots);
        tracing::trace!(target: targets::SIGNAL, ?id, "connected");
        id
    }

    /// Like [`connect`](Self::connect), but disconnects when the guard drops.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            id: self.connect(slot),
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Remove one callback. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.shared.lock().remove(id)
    }

    /// Remove every callback.
    pub fn disconnect_all(&self) {
        let mut slots = self.shared.lock();
        slots.map.clear();
        slots.order.clear();
    }

    /// Number of connected callbacks.
    pub fn connection_count(&self) -> usize {
        self.shared.lock().map.len()
    }

    /// Run every connected callback with `args`.
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = {
            let slots = self.shared.lock();
            slots.order.iter().filter_map(|id| slots.map.get(*id).cloned()).collect()
        };
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emitting");
        for slot in &slots {
            slot(&args);
        }
    }
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.shared.lock().map.len())
            .finish()
    }
}

/// Disconnects its callback when dropped.
///
/// Holds only a weak reference, so it may outlive the signal.
pub struct ConnectionGuard<Args> {
    id: ConnectionId,
    shared: Weak<Shared<Args>>,
}

impl<Args> ConnectionGuard<Args> {
    /// The guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.lock().remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        (log, move |value: &T| sink.lock().push(value.clone()))
    }

    #[test]
    fn test_emit_reaches_every_slot_in_order() {
        let signal = Signal::<usize>::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ['a', 'b', 'c'] {
            let order = order.clone();
            signal.connect(move |&n| order.lock().push((tag, n)));
        }

        signal.emit(3);
        assert_eq!(*order.lock(), vec![('a', 3), ('b', 3), ('c', 3)]);
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let signal = Signal::<String>::new();
        let (log, slot) = recorder::<String>();
        let id = signal.connect(slot);

        signal.emit("first".into());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit("second".into());

        assert_eq!(*log.lock(), vec!["first".to_string()]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_reconnect_after_disconnect_runs_last() {
        let signal = Signal::<()>::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let connect = |tag: char| {
            let log = log.clone();
            signal.connect(move |_| log.lock().push(tag))
        };

        let a = connect('a');
        connect('b');
        signal.disconnect(a);
        connect('c');
        connect('d');

        signal.emit(());
        assert_eq!(*log.lock(), vec!['b', 'c', 'd']);
    }

    #[test]
    fn test_dropped_guard_keeps_remaining_order() {
        let signal = Signal::<u8>::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let push = |tag: &'static str| {
            let order = order.clone();
            move |_: &u8| order.lock().push(tag)
        };

        signal.connect(push("first"));
        let guard = signal.connect_scoped(push("second"));
        signal.connect(push("third"));
        drop(guard);
        signal.connect(push("fourth"));

        signal.emit(0);
        assert_eq!(*order.lock(), vec!["first", "third", "fourth"]);
    }

    #[test]
    fn test_guard_disconnects_on_drop() {
        let signal = Signal::<u8>::new();
        let (log, slot) = recorder::<u8>();
        let guard = signal.connect_scoped(slot);
        assert_eq!(signal.connection_count(), 1);

        signal.emit(1);
        drop(guard);
        signal.emit(2);

        assert_eq!(*log.lock(), vec![1]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_guard_may_outlive_signal() {
        let signal = Signal::<()>::new();
        let guard = signal.connect_scoped(|_| {});
        drop(signal);
        drop(guard);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        for _ in 0..4 {
            signal.connect(|_| {});
        }
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_disconnecting_itself() {
        let signal = Arc::new(Signal::<()>::new());
        let calls = Arc::new(Mutex::new(0));
        let own_id = Arc::new(Mutex::new(None::<ConnectionId>));

        let id = signal.connect({
            let signal = signal.clone();
            let calls = calls.clone();
            let own_id = own_id.clone();
            move |_| {
                *calls.lock() += 1;
                if let Some(id) = *own_id.lock() {
                    signal.disconnect(id);
                }
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        signal.emit(());
        assert_eq!(*calls.lock(), 1);
    }
}
