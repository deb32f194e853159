//! Change-listener registry for the notes store.
//!
//! # Invariants
//! - Observer ids are never reused within one registry.
//! - Listeners are invoked outside the registry lock, so a listener may
//!   unregister itself (or others) from inside its callback.
//! - Listeners always receive the full ordered collection, never a delta.

use crate::model::note::Note;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback receiving the full current note collection.
pub type NotesListener = Arc<dyn Fn(&[Note]) + Send + Sync>;

/// Handle returned by registration; pass it back to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
struct Slots {
    next_id: u64,
    listeners: BTreeMap<ObserverId, NotesListener>,
}

/// Thread-safe set of registered note listeners.
#[derive(Default)]
pub struct NoteObservers {
    slots: Mutex<Slots>,
}

impl NoteObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener and returns its id.
    pub fn register(&self, listener: NotesListener) -> ObserverId {
        let mut slots = self.lock();
        let id = ObserverId(slots.next_id);
        slots.next_id += 1;
        slots.listeners.insert(id, listener);
        id
    }

    /// Removes a listener. Returns `false` when `id` is not registered.
    pub fn unregister(&self, id: ObserverId) -> bool {
        self.lock().listeners.remove(&id).is_some()
    }

    /// Delivers `notes` to one listener, if it is still registered.
    pub fn notify_one(&self, id: ObserverId, notes: &[Note]) {
        let listener = self.lock().listeners.get(&id).cloned();
        if let Some(listener) = listener {
            listener(notes);
        }
    }

    /// Delivers `notes` to every registered listener in registration order.
    pub fn notify_all(&self, notes: &[Note]) {
        let listeners = self.lock().listeners.values().cloned().collect::<Vec<_>>();
        for listener in listeners {
            listener(notes);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        // Critical sections never leave the map half-updated.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteObservers, NotesListener};
    use crate::model::note::Note;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_listener(counter: &Arc<AtomicUsize>) -> NotesListener {
        let counter = Arc::clone(counter);
        Arc::new(move |_: &[Note]| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn unregister_stops_delivery_and_ids_are_not_reused() {
        let observers = NoteObservers::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let first = observers.register(counting_listener(&hits));
        observers.notify_all(&[]);
        assert!(observers.unregister(first));
        assert!(!observers.unregister(first));
        observers.notify_all(&[]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let second = observers.register(counting_listener(&hits));
        assert_ne!(first, second);
    }

    #[test]
    fn listener_can_unregister_itself_during_callback() {
        let observers = Arc::new(NoteObservers::new());
        let slot = Arc::new(std::sync::Mutex::new(None));
        let registry = Arc::clone(&observers);
        let own_id = Arc::clone(&slot);
        let id = observers.register(Arc::new(move |_: &[Note]| {
            if let Some(id) = *own_id.lock().expect("slot lock") {
                registry.unregister(id);
            }
        }));
        *slot.lock().expect("slot lock") = Some(id);

        observers.notify_all(&[]);
        assert!(observers.is_empty());
    }
}
