//! Event emitter with sequential and parallel dispatch.

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, trace, warn};

use crate::event::Event;
use crate::listener::{Listener, ListenerError};
use crate::registry::ListenerRegistry;

/// Typed asynchronous event emitter.
///
/// Listeners are registered per [`Event`] type and run when that event is
/// emitted. Every emission works on a snapshot of the listeners registered
/// when it started: listeners added or removed while it runs only affect
/// later emissions.
///
/// Registration methods return `&Self` so calls can be chained:
///
/// ```rust
/// use cadence_events::{Event, EventEmitter, Listener};
///
/// struct Tick;
///
/// impl Event for Tick {
///     type Args = (u64,);
///     const NAME: &'static str = "tick";
/// }
///
/// let emitter = EventEmitter::new();
/// let log = Listener::<Tick>::sync(|(n,)| {
///     println!("tick {n}");
///     Ok(())
/// });
///
/// emitter
///     .on(log.clone())
///     .once(Listener::<Tick>::sync(|_| Ok(())))
///     .off(&log);
///
/// assert_eq!(emitter.listener_count::<Tick>(), 1);
/// ```
///
/// To let listeners register or remove listeners, share the emitter through
/// an `Arc` and capture a clone in the listener.
#[derive(Debug, Default)]
pub struct EventEmitter {
    registry: ListenerRegistry,
}

impl EventEmitter {
    /// Create an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ListenerRegistry::new(),
        }
    }

    /// Register `listener` for every emission of `E`.
    pub fn on<E: Event>(&self, listener: Listener<E>) -> &Self {
        self.registry.add(listener, false);
        self
    }

    /// Register `listener` for the next successful emission of `E` only.
    ///
    /// The listener stays registered if the emission it ran in fails.
    pub fn once<E: Event>(&self, listener: Listener<E>) -> &Self {
        self.registry.add(listener, true);
        self
    }

    /// Remove the most recent registration of `listener` for `E`.
    ///
    /// Does nothing if it is not registered.
    pub fn off<E: Event>(&self, listener: &Listener<E>) -> &Self {
        self.registry.remove_last(listener);
        self
    }

    /// Alias of [`EventEmitter::on`].
    pub fn add_listener<E: Event>(&self, listener: Listener<E>) -> &Self {
        self.on(listener)
    }

    /// Alias of [`EventEmitter::off`].
    pub fn remove_listener<E: Event>(&self, listener: &Listener<E>) -> &Self {
        self.off(listener)
    }

    /// Remove every listener registered for `E`.
    pub fn remove_all_listeners<E: Event>(&self) -> &Self {
        self.registry.clear::<E>();
        self
    }

    /// Number of registrations for `E`.
    #[must_use]
    pub fn listener_count<E: Event>(&self) -> usize {
        self.registry.len::<E>()
    }

    /// Whether anything is registered for `E`.
    #[must_use]
    pub fn has_listeners<E: Event>(&self) -> bool {
        self.listener_count::<E>() > 0
    }

    /// The underlying listener registry.
    #[must_use]
    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Run the listeners for `E` one at a time, in registration order.
    ///
    /// Each listener is awaited before the next one starts. Returns
    /// `Ok(false)` if nothing is registered and `Ok(true)` once every listener
    /// completed, after one-shot listeners have been removed.
    ///
    /// # Errors
    ///
    /// Returns the first listener error unchanged. Listeners after the failing
    /// one do not run, and no one-shot listener is removed.
    pub async fn emit<E: Event>(&self, args: E::Args) -> Result<bool, ListenerError> {
        let snapshot = self.registry.snapshot::<E>();
        if snapshot.is_empty() {
            trace!(event = E::NAME, "No listeners for event");
            return Ok(false);
        }

        debug!(
            event = E::NAME,
            listener_count = snapshot.len(),
            "Emitting event"
        );

        for entry in &snapshot {
            let listener = entry.listener();
            trace!(event = E::NAME, listener_id = %listener.id(), "Invoking listener");

            let call = listener.call(args.clone());
            if let Err(error) = call.await {
                warn!(
                    event = E::NAME,
                    listener_id = %listener.id(),
                    error = %error,
                    "Listener failed, stopping emission"
                );
                return Err(error);
            }
        }

        self.registry.prune_once(&snapshot);
        Ok(true)
    }

    /// Start every listener for `E` at once and wait for all of them.
    ///
    /// Each listener runs on its own tokio task with a clone of `args`. There
    /// is no ordering between listeners. Returns `Ok(false)` if nothing is
    /// registered and `Ok(true)` once every listener completed, after one-shot
    /// listeners have been removed.
    ///
    /// # Errors
    ///
    /// Returns the first listener error to be reported, unchanged. The other
    /// listeners are not cancelled and keep running in the background. No
    /// one-shot listener is removed.
    ///
    /// The one error no listener returned is a cancelled listener task, which
    /// only happens when the runtime shuts down mid-emission. It is reported
    /// as the boxed [`tokio::task::JoinError`].
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime. A panicking listener's
    /// panic is resumed on the caller.
    pub async fn emit_parallel<E: Event>(&self, args: E::Args) -> Result<bool, ListenerError> {
        let snapshot = self.registry.snapshot::<E>();
        if snapshot.is_empty() {
            trace!(event = E::NAME, "No listeners for event");
            return Ok(false);
        }

        debug!(
            event = E::NAME,
            listener_count = snapshot.len(),
            "Emitting event in parallel"
        );

        let mut pending: FuturesUnordered<_> = snapshot
            .iter()
            .map(|entry| {
                let listener = entry.listener().clone();
                let args = args.clone();
                let listener_id = listener.id();
                let task = tokio::spawn(async move { listener.call(args).await });
                async move { (listener_id, task.await) }
            })
            .collect();

        while let Some((listener_id, joined)) = pending.next().await {
            match joined {
                Ok(Ok(())) => {
                    trace!(event = E::NAME, listener_id = %listener_id, "Listener completed");
                },
                Ok(Err(error)) => {
                    warn!(
                        event = E::NAME,
                        listener_id = %listener_id,
                        error = %error,
                        "Listener failed, remaining listeners left running"
                    );
                    return Err(error);
                },
                Err(join_error) if join_error.is_panic() => {
                    std::panic::resume_unwind(join_error.into_panic());
                },
                Err(join_error) => {
                    warn!(
                        event = E::NAME,
                        listener_id = %listener_id,
                        error = %join_error,
                        "Listener task cancelled"
                    );
                    return Err(Box::new(join_error));
                },
            }
        }

        self.registry.prune_once(&snapshot);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct Foo;

    impl Event for Foo {
        type Args = (i64,);
        const NAME: &'static str = "foo";
    }

    struct Bar;

    impl Event for Bar {
        type Args = (String,);
        const NAME: &'static str = "bar";
    }

    #[tokio::test]
    async fn test_emit_without_listeners() {
        let emitter = EventEmitter::new();

        assert!(!emitter.emit::<Foo>((1,)).await.unwrap());
        assert!(!emitter.emit_parallel::<Foo>((1,)).await.unwrap());
    }

    #[tokio::test]
    async fn test_emit_runs_listener_with_args() {
        let emitter = EventEmitter::new();
        let seen = Arc::new(std::sync::Mutex::new(String::new()));
        let seen_clone = Arc::clone(&seen);

        emitter.on(Listener::<Bar>::sync(move |(value,)| {
            *seen_clone.lock().unwrap() = value;
            Ok(())
        }));

        assert!(emitter.emit::<Bar>(("a".to_string(),)).await.unwrap());
        assert_eq!(*seen.lock().unwrap(), "a");
    }

    #[tokio::test]
    async fn test_emit_only_reaches_its_event() {
        let emitter = EventEmitter::new();
        let counter = Arc::new(AtomicI64::new(0));
        let counter_clone = Arc::clone(&counter);

        emitter.on(Listener::<Foo>::sync(move |(v,)| {
            counter_clone.fetch_add(v, Ordering::SeqCst);
            Ok(())
        }));

        assert!(!emitter.emit::<Bar>(("x".to_string(),)).await.unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_aliases_match_on_and_off() {
        let emitter = EventEmitter::new();
        let listener = Listener::<Foo>::sync(|_| Ok(()));

        emitter.add_listener(listener.clone());
        assert!(emitter.has_listeners::<Foo>());

        emitter.remove_listener(&listener);
        assert!(!emitter.has_listeners::<Foo>());
    }

    #[tokio::test]
    async fn test_remove_all_listeners() {
        let emitter = EventEmitter::new();
        emitter
            .on(Listener::<Foo>::sync(|_| Ok(())))
            .once(Listener::<Foo>::sync(|_| Ok(())))
            .on(Listener::<Bar>::sync(|_| Ok(())))
            .remove_all_listeners::<Foo>();

        assert_eq!(emitter.listener_count::<Foo>(), 0);
        assert_eq!(emitter.listener_count::<Bar>(), 1);
        assert!(!emitter.emit::<Foo>((1,)).await.unwrap());
    }

    #[tokio::test]
    async fn test_emit_parallel_prunes_once_on_success() {
        let emitter = EventEmitter::new();
        let counter = Arc::new(AtomicI64::new(0));
        let counter_clone = Arc::clone(&counter);

        emitter.once(Listener::<Foo>::new(move |(v,)| {
            let counter = Arc::clone(&counter_clone);
            async move {
                tokio::task::yield_now().await;
                counter.fetch_add(v, Ordering::SeqCst);
                Ok(())
            }
        }));

        assert!(emitter.emit_parallel::<Foo>((5,)).await.unwrap());
        assert!(!emitter.emit_parallel::<Foo>((5,)).await.unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
