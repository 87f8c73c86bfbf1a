//! Cadence Telemetry - Logging setup for the Cadence event emitter.
//!
//! The emitter logs registrations, emissions and listener failures through
//! `tracing`. This crate installs a `tracing-subscriber` that renders them.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), cadence_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("cadence_events=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("Logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FORMAT_ENV_VAR, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
