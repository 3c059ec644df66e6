//! Observability module
//!
//! Logging setup. Diagnostics go through `tracing`; stdout carries only the
//! rendered result.

pub mod logging;

pub use logging::{LogFormat, LogTarget, init_logging};
