//! Harsh acceleration detection.

use crate::config::DetectionConfig;
use crate::trips::reconstruct::Trip;

use super::cluster::{cluster_pins, Tolerance};
use super::pin::{EventDetails, EventPin};

pub fn detect_acceleration(
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
            let acceleration = record.acceleration.filter(|a| *a > threshold)?;
            let location = record.location?;
            Some(EventPin::new(
                location,
                record.timestamp,
                EventDetails::Acceleration { acceleration },
            ))
        })
        .collect();

    cluster_pins(
        candidates,
        Tolerance {
            distance_ft: config.acceleration_distance_ft,
            magnitude: config.acceleration_tolerance,
        },
    )
}
