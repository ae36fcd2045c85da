//! Speeding detection.

use crate::config::DetectionConfig;
use crate::trips::reconstruct::Trip;

use super::cluster::{cluster_pins, Tolerance};
use super::pin::{EventDetails, EventPin};

/// Pins for samples whose speed deviates from the limit by more than `threshold` mph.
pub fn detect_speeding(
    trip: Option<&Trip>,
    threshold: f64,
    config: &DetectionConfig,
) -> Vec<EventPin> {
    let Some(trip) = trip else {
        return Vec::new();
    };

    let candidates: Vec<EventPin> = trip
        .logs
        .iter()
        .filter_map(|record| {
            let speed = record.speed?;
            let speed_limit = record.speed_limit?;
            let location = record.location?;
            if (speed - speed_limit).abs() > threshold {
                Some(EventPin::new(
                    location,
                    record.timestamp,
                    EventDetails::Speeding { speed, speed_limit },
                ))
            } else {
                None
            }
        })
        .collect();

    cluster_pins(
        candidates,
        Tolerance {
            distance_ft: config.speeding_distance_ft,
            magnitude: config.speeding_speed_tolerance,
        },
    )
}
