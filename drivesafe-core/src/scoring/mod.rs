//! Safety scoring.
//!
//! - `metrics` - speed and acceleration statistics over trips
//! - `formulas` - bounded 1-100 score curves
//! - `snapshot` - the persisted score document
//! - `engine` - composition into a `ScoreSnapshot`

pub mod engine;
pub mod formulas;
pub mod metrics;
pub mod snapshot;

pub use engine::*;
pub use formulas::*;
pub use metrics::*;
pub use snapshot::*;
