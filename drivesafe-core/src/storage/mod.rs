//! Storage module.
//!
//! Narrow interfaces to the persistence collaborators plus file-backed and
//! in-memory implementations:
//! - `log_store` - append-only line-delimited record logs per channel
//! - `score_store` - the single persisted score snapshot
//! - `recorder` - session recording on top of a log store

pub mod log_store;
pub mod recorder;
pub mod score_store;

pub use log_store::*;
pub use recorder::*;
pub use score_store::*;
