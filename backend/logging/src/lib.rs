//! Structured logging setup for exfil-sink.
//!
//! Console output for operators, with an optional JSON mode and an optional
//! daily-rolling NDJSON file.

pub mod logger;

pub use logger::{init_logger, LogOptions};
