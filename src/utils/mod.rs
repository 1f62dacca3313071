//! Utility functions and helpers for the SparkPath gateway.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and secret redaction for log output.

pub mod logging;
