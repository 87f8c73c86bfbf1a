//! Event channel declarations.

/// A named event channel and the argument list its listeners receive.
///
/// Every implementing type is an independent channel: listeners registered
/// for one event type are never invoked for another. The mapping from event to
/// argument shape is checked at compile time through [`Event::Args`].
///
/// # Example
///
/// ```rust
/// use cadence_events::Event;
///
/// struct OrderPlaced;
///
/// impl Event for OrderPlaced {
///     type Args = (u64, String);
///     const NAME: &'static str = "order_placed";
/// }
/// ```
pub trait Event: 'static {
    /// Arguments handed to each listener, usually a tuple such as `(u32,)`.
    ///
    /// Every listener receives its own clone of the emitted arguments.
    type Args: Clone + Send + 'static;

    /// Human-readable name, used in log output only.
    const NAME: &'static str;
}
