//! Log record model and construction.
//!
//! - `model` - tagged record types as they appear on the wire
//! - `codec` - line-delimited JSON encoding with malformed-line skipping
//! - `builder` - DATA/marker construction with acceleration derivation

pub mod builder;
pub mod codec;
pub mod model;

pub use builder::*;
pub use codec::*;
pub use model::*;
