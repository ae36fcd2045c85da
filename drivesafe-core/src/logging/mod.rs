//! Structured logging with analysis context.
//!
//! Provides logging macros and utilities that include the run id, log
//! channel and trip id in every log message for easy correlation.

pub mod structured;

pub use structured::*;
