//! Listener handles.

use std::fmt;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use uuid::Uuid;

use crate::event::Event;

/// Error produced by a failing listener.
///
/// The emitter never wraps it: the value a listener returns is the value the
/// caller of `emit` receives.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by every listener invocation.
pub type ListenerResult = Result<(), ListenerError>;

type Callback<A> = dyn Fn(A) -> BoxFuture<'static, ListenerResult> + Send + Sync;

/// Identity of a listener handle, shared by all of its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cloneable handle to an asynchronous callback for event `E`.
///
/// Identity is fixed when the handle is created. Cloning the handle keeps the
/// identity, so a clone can later be passed to
/// [`EventEmitter::off`](crate::EventEmitter::off) to remove a registration.
/// Two handles built from identical closures are still different listeners.
pub struct Listener<E: Event> {
    id: ListenerId,
    callback: Arc<Callback<E::Args>>,
}

impl<E: Event> Listener<E> {
    /// Wrap an asynchronous callback.
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(E::Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ListenerResult> + Send + 'static,
    {
        let callback: Arc<Callback<E::Args>> =
            Arc::new(move |args: E::Args| callback(args).boxed());
        Self {
            id: ListenerId::new(),
            callback,
        }
    }

    /// Wrap a synchronous callback.
    ///
    /// The callback runs when the listener is invoked and its result is
    /// returned as an already-completed future.
    pub fn sync<F>(callback: F) -> Self
    where
        F: Fn(E::Args) -> ListenerResult + Send + Sync + 'static,
    {
        let callback: Arc<Callback<E::Args>> =
            Arc::new(move |args: E::Args| future::ready(callback(args)).boxed());
        Self {
            id: ListenerId::new(),
            callback,
        }
    }

    /// Identity of this handle.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Invoke the callback.
    pub(crate) fn call(&self, args: E::Args) -> BoxFuture<'static, ListenerResult> {
        (self.callback)(args)
    }
}

impl<E: Event> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<E: Event> PartialEq for Listener<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Event> Eq for Listener<E> {}

impl<E: Event> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event", &E::NAME)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl Event for Ping {
        type Args = (u32,);
        const NAME: &'static str = "ping";
    }

    #[test]
    fn test_clone_keeps_identity() {
        let listener = Listener::<Ping>::sync(|_| Ok(()));
        let clone = listener.clone();

        assert_eq!(listener.id(), clone.id());
        assert_eq!(listener, clone);
    }

    #[test]
    fn test_identical_closures_are_distinct() {
        let first = Listener::<Ping>::sync(|_| Ok(()));
        let second = Listener::<Ping>::sync(|_| Ok(()));

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_async_listener_receives_args() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let listener = Listener::<Ping>::new(move |(n,)| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(n);
                Ok(())
            }
        });

        listener.call((7,)).await.unwrap();
        assert_eq!(rx.recv().await, Some(7));
    }

    #[tokio::test]
    async fn test_sync_listener_error_is_returned() {
        let listener = Listener::<Ping>::sync(|(n,)| Err(format!("bad value {n}").into()));

        let err = listener.call((3,)).await.unwrap_err();
        assert_eq!(err.to_string(), "bad value 3");
    }

    #[test]
    fn test_debug_names_event() {
        let listener = Listener::<Ping>::sync(|_| Ok(()));
        let rendered = format!("{listener:?}");

        assert!(rendered.contains("ping"));
    }
}
