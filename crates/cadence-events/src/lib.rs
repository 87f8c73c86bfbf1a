//! Cadence Events - Typed asynchronous event emitter.
//!
//! This crate provides:
//! - [`Event`] declarations that fix each event's argument list at compile time
//! - [`Listener`] handles wrapping synchronous or asynchronous callbacks
//! - A [`ListenerRegistry`] keeping one ordered listener list per event
//! - An [`EventEmitter`] with sequential and parallel dispatch
//!
//! # Dispatch
//!
//! [`EventEmitter::emit`] runs listeners one after another in registration
//! order and stops at the first failure. [`EventEmitter::emit_parallel`]
//! starts all listeners at once and waits for every one of them. Both return
//! `Ok(false)` when nothing is registered and `Ok(true)` once all listeners
//! completed. Listeners registered with [`EventEmitter::once`] are removed
//! after the first emission that completes without error.
//!
//! # Example
//!
//! ```rust
//! use cadence_events::{Event, EventEmitter, Listener};
//!
//! struct Greet;
//!
//! impl Event for Greet {
//!     type Args = (String,);
//!     const NAME: &'static str = "greet";
//! }
//!
//! # async fn example() -> Result<(), cadence_events::ListenerError> {
//! let emitter = EventEmitter::new();
//!
//! emitter.on(Listener::<Greet>::sync(|(name,)| {
//!     println!("hello, {name}");
//!     Ok(())
//! }));
//!
//! let ran = emitter.emit::<Greet>(("world".to_string(),)).await?;
//! assert!(ran);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod emitter;
mod event;
mod listener;
mod registry;

pub use emitter::EventEmitter;
pub use event::Event;
pub use listener::{Listener, ListenerError, ListenerId, ListenerResult};
pub use registry::{EntryId, ListenerEntry, ListenerRegistry};
