//! Pipeline orchestration module.
//!
//! Runs the derivation chain for one channel:
//! - Record loading
//! - Trip reconstruction
//! - Event detection
//! - Marker merging

pub mod analysis;
pub mod context;

pub use analysis::*;
pub use context::*;
