//! Score caching.
//!
//! - `source` - where the cache gets its trips from
//! - `score_cache` - freshness checks, recomputation and change listeners

pub mod score_cache;
pub mod source;

pub use score_cache::*;
pub use source::*;
