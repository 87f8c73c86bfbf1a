//! Prelude module - commonly used types for convenient import.
//!
//! Use `use cadence_events::prelude::*;` to import all essential types.

// Emitter
pub use crate::EventEmitter;

// Events and listeners
pub use crate::{Event, Listener, ListenerError, ListenerResult};
