//! # Logging
//!
//! `tracing` subscriber setup shared by the binaries. Library code only emits
//! events; installing a subscriber is left to whoever owns `main`.

/// Subscriber initialisation.
pub mod setup;

pub use setup::init_logging;
