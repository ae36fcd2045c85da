//! Unsafe-driving event detection.
//!
//! Four detectors share one greedy clustering shape and differ only in their
//! predicate, tolerances and payload:
//! - `speeding` - deviation from the posted limit
//! - `acceleration` - harsh positive acceleration
//! - `braking` - harsh negative acceleration
//! - `turning` - lateral g-force, from inline analysis and standalone records
//!
//! `combined` merges their outputs into map markers.

pub mod acceleration;
pub mod braking;
pub mod cluster;
pub mod combined;
pub mod geo;
pub mod pin;
pub mod speeding;
pub mod turning;

#[cfg(test)]
mod test_support;

pub use acceleration::*;
pub use braking::*;
pub use combined::*;
pub use geo::*;
pub use pin::*;
pub use speeding::*;
pub use turning::*;

use crate::config::DetectionConfig;
use crate::trips::reconstruct::Trip;

/// Run all four detectors with the configured thresholds.
///
/// The detectors are independent of each other; the merge step is the only
/// consumer that needs all four results.
pub fn detect_all(trip: Option<&Trip>, config: &DetectionConfig) -> PinsByType {
    PinsByType {
        speeding: detect_speeding(trip, config.speeding_threshold, config),
        acceleration: detect_acceleration(trip, config.acceleration_threshold, config),
        braking: detect_braking(trip, config.braking_threshold, config),
        unsafe_turning: detect_unsafe_turning(trip, config.turning_threshold, config),
    }
}
