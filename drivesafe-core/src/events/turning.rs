//! Unsafe-turning detection.
//!
//! Pins come from two sources: the inline `turningAnalysis` of DATA records,
//! and standalone UNSAFE_TURNING records pinned to the DATA record with a
//! location nearest in time (within the correlation window). The same event
//! is usually logged both ways, so candidates go through a single
//! "keep the higher g-force within the de-dup radius" pass instead of the
//! clustering loop.

use crate::config::DetectionConfig;
use crate::records::model::{DataRecord, UnsafeTurningEvent};
use crate::trips::reconstruct::Trip;

use super::geo::distance_ft;
use super::pin::{EventDetails, EventPin};

pub fn detect_unsafe_turning(
    trip: Option<&Trip>,
    threshold: f64,
    config: &DetectionConfig,
) -> Vec<EventPin> {
    let Some(trip) = trip else {
        return Vec::new();
    };

    let mut candidates: Vec<EventPin> = trip
        .logs
        .iter()
        .filter_map(|record| {
            let analysis = record
                .turning_analysis
                .filter(|t| t.is_unsafe_turning && t.max_g_force > threshold)?;
            let location = record.location?;
            Some(EventPin::new(
                location,
                record.timestamp,
                EventDetails::UnsafeTurning {
                    g_force: analysis.max_g_force,
                    severity: analysis.severity,
                },
            ))
        })
        .collect();

    candidates.extend(
        trip.unsafe_turning
            .iter()
            .filter_map(|event| correlate(event, &trip.logs, config.turning_correlation_secs)),
    );

    candidates.sort_by_key(|pin| pin.timestamp);
    dedup_by_g_force(candidates, config.turning_dedup_distance_ft)
}

/// Pin a standalone record to the closest-in-time DATA record with a location.
fn correlate(
    event: &UnsafeTurningEvent,
    logs: &[DataRecord],
    window_secs: f64,
) -> Option<EventPin> {
    let window_ms = (window_secs * 1000.0) as i64;
    let (gap_ms, nearest) = logs
        .iter()
        .filter(|r| r.location.is_some())
        .map(|r| ((r.timestamp - event.timestamp).num_milliseconds().abs(), r))
        .min_by_key(|(gap, _)| *gap)?;

    if gap_ms > window_ms {
        return None;
    }

    Some(EventPin::new(
        nearest.location?,
        event.timestamp,
        EventDetails::UnsafeTurning {
            g_force: event.g_force.max,
            severity: event.severity,
        },
    ))
}

/// Keep one pin per neighbourhood, preferring the higher g-force.
fn dedup_by_g_force(candidates: Vec<EventPin>, radius_ft: f64) -> Vec<EventPin> {
    let mut kept: Vec<EventPin> = Vec::new();
    for candidate in candidates {
        let nearby = kept
            .iter()
            .position(|pin| distance_ft(pin.location(), candidate.location()) <= radius_ft);
        match nearby {
            Some(index) => {
                if candidate.magnitude() > kept[index].magnitude() {
                    kept[index] = candidate;
                }
            }
            None => kept.push(candidate),
        }
    }
    kept
}
