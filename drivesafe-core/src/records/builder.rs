//! Record construction.
//!
//! A `RecordBuilder` holds the per-channel "previous speed sample" used to
//! derive acceleration. Connection markers clear it, so acceleration never
//! spans two sessions. Motion samples are passed in by the caller on every
//! call rather than read from shared state.

use chrono::{DateTime, Utc};

use super::model::{
    ConnectionMarker, ConnectionState, DataRecord, DeviceMotion, GForce, LogRecord, Location,
    Severity, TurningAnalysis, UnsafeTurningEvent,
};

/// Severity escalates to HIGH above this multiple of the threshold.
const HIGH_SEVERITY_FACTOR: f64 = 1.5;

/// Values fetched from the OBD bridge for one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObdReading {
    pub speed: Option<f64>,
    pub rpm: Option<f64>,
    pub throttle: Option<f64>,
}

/// Resolved position context for a sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadContext {
    pub location: Option<Location>,
    pub street_name: Option<String>,
    pub speed_limit: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct SpeedSample {
    speed: f64,
    at: DateTime<Utc>,
}

/// Builds records for one log channel.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    last_sample: Option<SpeedSample>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a DATA record, deriving `acceleration` from the previous sample.
    pub fn data_record(
        &mut self,
        timestamp: DateTime<Utc>,
        obd: ObdReading,
        road: RoadContext,
        motion: Option<DeviceMotion>,
        turning_threshold: f64,
    ) -> DataRecord {
        let acceleration = obd.speed.and_then(|speed| self.observe_speed(speed, timestamp));

        DataRecord {
            timestamp,
            speed: obd.speed,
            rpm: obd.rpm,
            throttle: obd.throttle,
            location: road.location,
            street_name: road.street_name,
            speed_limit: road.speed_limit,
            acceleration,
            device_motion: motion,
            turning_analysis: motion.map(|m| turning_analysis(&m, turning_threshold)),
        }
    }

    /// Build a connection marker and forget the previous speed sample.
    pub fn connection_marker(
        &mut self,
        timestamp: DateTime<Utc>,
        state: ConnectionState,
        message: &str,
        street_name: Option<String>,
    ) -> ConnectionMarker {
        self.reset();
        let (street_name, last_street_name) = match state {
            ConnectionState::Connected => (street_name, None),
            ConnectionState::Disconnected => (None, street_name),
        };
        ConnectionMarker {
            timestamp,
            state,
            message: message.to_string(),
            street_name,
            last_street_name,
        }
    }

    pub fn reset(&mut self) {
        self.last_sample = None;
    }

    /// Record a speed sample and return mph/s against the previous one.
    fn observe_speed(&mut self, speed: f64, at: DateTime<Utc>) -> Option<f64> {
        let previous = self.last_sample.replace(SpeedSample { speed, at });
        let previous = previous?;
        let elapsed = (at - previous.at).num_milliseconds() as f64 / 1000.0;
        if elapsed <= 0.0 {
            return None;
        }
        Some((speed - previous.speed) / elapsed)
    }
}

/// Recompute `acceleration` on every DATA record of a channel in order.
///
/// Used when replaying logs that were written without the derived field.
pub fn annotate_accelerations(records: &mut [LogRecord]) {
    let mut builder = RecordBuilder::new();
    for record in records.iter_mut() {
        match record {
            LogRecord::ConnectionMarker(_) => builder.reset(),
            LogRecord::Data(data) => {
                data.acceleration = match data.speed {
                    Some(speed) => builder.observe_speed(speed, data.timestamp),
                    None => None,
                };
            }
            LogRecord::UnsafeTurning(_) => {}
        }
    }
}

/// Classify a motion sample against the unsafe-turning threshold (g).
pub fn turning_analysis(motion: &DeviceMotion, threshold: f64) -> TurningAnalysis {
    let a = motion.acceleration;
    let max_g_force = a.x.abs().max(a.y.abs()).max(a.z.abs());
    let exceeds_threshold = max_g_force > threshold;

    let severity = if max_g_force > threshold * HIGH_SEVERITY_FACTOR {
        Severity::High
    } else if exceeds_threshold {
        Severity::Medium
    } else {
        Severity::Safe
    };

    TurningAnalysis {
        is_unsafe_turning: exceeds_threshold,
        severity,
        max_g_force,
        threshold,
        exceeds_threshold,
    }
}

/// Standalone UNSAFE_TURNING record for a DATA record flagged as unsafe.
pub fn unsafe_turning_record(data: &DataRecord) -> Option<UnsafeTurningEvent> {
    let analysis = data.turning_analysis.filter(|t| t.is_unsafe_turning)?;
    let a = data.device_motion.map(|m| m.acceleration).unwrap_or_default();
    Some(UnsafeTurningEvent {
        timestamp: data.timestamp,
        g_force: GForce {
            x: a.x,
            y: a.y,
            z: a.z,
            max: analysis.max_g_force,
        },
        threshold: analysis.threshold,
        severity: analysis.severity,
    })
}
