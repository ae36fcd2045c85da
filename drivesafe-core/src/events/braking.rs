//! Harsh braking detection.
//!
//! The threshold is a signed acceleration (conventionally negative); a sample
//! counts when its acceleration is strictly below it. Clustering and the
//! representative choice work on the braking magnitude.

use crate::config::DetectionConfig;
use crate::trips::reconstruct::Trip;

use super::cluster::{cluster_pins, Tolerance};
use super::pin::{EventDetails, EventPin};

pub fn detect_braking(
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
            let acceleration = record.acceleration.filter(|a| *a < threshold)?;
            let location = record.location?;
            Some(EventPin::new(
                location,
                record.timestamp,
                EventDetails::Braking {
                    acceleration,
                    braking: acceleration.abs(),
                },
            ))
        })
        .collect();

    cluster_pins(
        candidates,
        Tolerance {
            distance_ft: config.braking_distance_ft,
            magnitude: config.braking_tolerance,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::{trip_of, with_accel};

    #[test]
    fn test_hard_stop_detected() {
        let trip = trip_of(vec![
            with_accel(0, 40.0, Some(10.0)),
            with_accel(1, 40.00001, Some(-12.0)),
        ]);
        let pins = detect_braking(Some(&trip), -8.0, &DetectionConfig::default());
        assert_eq!(pins.len(), 1);
        assert!(matches!(
            pins[0].details,
            EventDetails::Braking { acceleration, braking } if acceleration == -12.0 && braking == 12.0
        ));
    }

    #[test]
    fn test_keeps_strongest_stop_in_cluster() {
        let trip = trip_of(vec![
            with_accel(0, 40.0, Some(-9.0)),
            with_accel(1, 40.0001, Some(-11.5)),
            with_accel(2, 40.0002, Some(-10.0)),
        ]);
        let pins = detect_braking(Some(&trip), -8.0, &DetectionConfig::default());
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].magnitude(), 11.5);
    }

    #[test]
    fn test_threshold_is_strict_less_than() {
        let trip = trip_of(vec![with_accel(0, 40.0, Some(-8.0))]);
        assert!(detect_braking(Some(&trip), -8.0, &DetectionConfig::default()).is_empty());
    }
}
