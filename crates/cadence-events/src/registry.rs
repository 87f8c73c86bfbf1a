//! Per-event listener registry.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::RwLock;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::event::Event;
use crate::listener::Listener;

/// Identity of a single registration.
///
/// Registering the same listener twice produces two entries with different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A registered listener together with its one-shot flag.
pub struct ListenerEntry<E: Event> {
    id: EntryId,
    listener: Listener<E>,
    once: bool,
}

impl<E: Event> ListenerEntry<E> {
    /// Registration id.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The registered listener.
    #[must_use]
    pub fn listener(&self) -> &Listener<E> {
        &self.listener
    }

    /// Whether the entry is removed after its first successful emission.
    #[must_use]
    pub fn is_once(&self) -> bool {
        self.once
    }
}

impl<E: Event> Clone for ListenerEntry<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            listener: self.listener.clone(),
            once: self.once,
        }
    }
}

impl<E: Event> fmt::Debug for ListenerEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("listener", &self.listener)
            .field("once", &self.once)
            .finish()
    }
}

/// Type-erased `Vec<ListenerEntry<E>>`, keyed by `TypeId::of::<E>()`.
type Channel = Box<dyn Any + Send + Sync>;

/// Ordered listener lists, one per event type.
///
/// Registration order is preserved and is the order sequential emission runs
/// in. The internal lock is only held for the duration of a single registry
/// operation and never while a listener runs, so listeners may register or
/// remove listeners re-entrantly.
#[derive(Default)]
pub struct ListenerRegistry {
    channels: RwLock<HashMap<TypeId, Channel>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.channels.read().map(|c| c.len()).unwrap_or_default();
        f.debug_struct("ListenerRegistry")
            .field("channel_count", &count)
            .finish()
    }
}

fn entries<E: Event>(channel: &Channel) -> Option<&Vec<ListenerEntry<E>>> {
    channel.downcast_ref::<Vec<ListenerEntry<E>>>()
}

fn entries_mut<E: Event>(channel: &mut Channel) -> Option<&mut Vec<ListenerEntry<E>>> {
    channel.downcast_mut::<Vec<ListenerEntry<E>>>()
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Append `listener` to the end of `E`'s list.
    ///
    /// No deduplication is done: a listener added twice runs twice.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add<E: Event>(&self, listener: Listener<E>, once: bool) -> EntryId {
        let id = EntryId::new();
        let listener_id = listener.id();

        let mut channels = self.channels.write().expect("lock poisoned");
        let channel = channels
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<ListenerEntry<E>>::new()));
        if let Some(list) = entries_mut::<E>(channel) {
            list.push(ListenerEntry { id, listener, once });
        }
        drop(channels);

        debug!(event = E::NAME, listener_id = %listener_id, once, "Listener registered");
        id
    }

    /// Remove the most recently added entry for `listener`.
    ///
    /// Returns `true` if an entry was removed. Unknown events and unknown
    /// listeners are a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_last<E: Event>(&self, listener: &Listener<E>) -> bool {
        let key = TypeId::of::<E>();
        let mut removed = None;
        let mut channels = self.channels.write().expect("lock poisoned");
        if let Some(list) = channels.get_mut(&key).and_then(entries_mut::<E>) {
            if let Some(index) = list
                .iter()
                .rposition(|entry| entry.listener.id() == listener.id())
            {
                removed = Some(list.remove(index));
            }
            if list.is_empty() {
                channels.remove(&key);
            }
        }
        // Release the lock before the entry's callback is dropped.
        drop(channels);

        if removed.is_none() {
            trace!(event = E::NAME, listener_id = %listener.id(), "No listener to remove");
            return false;
        }
        debug!(event = E::NAME, listener_id = %listener.id(), "Listener removed");
        true
    }

    /// Copy of `E`'s list as it is right now.
    ///
    /// Later registry changes never affect the returned vector.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn snapshot<E: Event>(&self) -> Vec<ListenerEntry<E>> {
        let channels = self.channels.read().expect("lock poisoned");
        channels
            .get(&TypeId::of::<E>())
            .and_then(entries::<E>)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove every one-shot entry in `ran` that is still registered.
    ///
    /// Entries registered after `ran` was taken are left alone.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn prune_once<E: Event>(&self, ran: &[ListenerEntry<E>]) {
        let prune: HashSet<EntryId> = ran
            .iter()
            .filter(|entry| entry.once)
            .map(|entry| entry.id)
            .collect();
        if prune.is_empty() {
            return;
        }

        let key = TypeId::of::<E>();
        let mut removed = Vec::new();
        let mut channels = self.channels.write().expect("lock poisoned");
        if let Some(list) = channels.get_mut(&key).and_then(entries_mut::<E>) {
            let (pruned, kept): (Vec<_>, Vec<_>) = std::mem::take(list)
                .into_iter()
                .partition(|entry| prune.contains(&entry.id));
            *list = kept;
            removed = pruned;
            if list.is_empty() {
                channels.remove(&key);
            }
        }
        drop(channels);

        if !removed.is_empty() {
            debug!(
                event = E::NAME,
                pruned = removed.len(),
                "One-shot listeners removed"
            );
        }
    }

    /// Number of entries registered for `E`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len<E: Event>(&self) -> usize {
        let channels = self.channels.read().expect("lock poisoned");
        channels
            .get(&TypeId::of::<E>())
            .and_then(entries::<E>)
            .map_or(0, Vec::len)
    }

    /// Whether no event has any listener.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.read().expect("lock poisoned").is_empty()
    }

    /// Remove every entry registered for `E`, returning how many were removed.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear<E: Event>(&self) -> usize {
        let mut channels = self.channels.write().expect("lock poisoned");
        let removed = channels.remove(&TypeId::of::<E>());
        drop(channels);

        let count = removed
            .as_ref()
            .and_then(entries::<E>)
            .map_or(0, Vec::len);
        debug!(event = E::NAME, removed = count, "Listeners cleared");
        count
    }

    /// Remove every entry for every event.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear_all(&self) {
        let mut channels = self.channels.write().expect("lock poisoned");
        let removed = std::mem::take(&mut *channels);
        drop(channels);
        drop(removed);
        debug!("All listeners cleared");
    }
}
