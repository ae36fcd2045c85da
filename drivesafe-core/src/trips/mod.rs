//! Trip reconstruction.
//!
//! Turns a channel's flat record sequence into discrete trips framed by
//! connection markers, with a single-trip fallback for marker-free logs.

pub mod reconstruct;

pub use reconstruct::*;
