//! Cadence Test - Shared test utilities for the Cadence crates.
//!
//! Add as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! cadence-test.workspace = true
//! ```
//!
//! ```rust
//! use cadence_test::{CallLog, TestFailure};
//!
//! let log = CallLog::new();
//! log.record("first");
//! log.record("second");
//! assert_eq!(log.entries(), vec!["first", "second"]);
//!
//! let err = TestFailure::new("listener 1");
//! assert_eq!(err.to_string(), "test failure: listener 1");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
