//! Shared utilities for analyst-rs
//!
//! Logging setup used by the `analyst` binary.

pub mod logging;

pub use logging::{LogFormat, LoggingError, init_tracing_with};
