//! Log record types.
//!
//! One JSON object per line, discriminated by the `type` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogRecord {
    Data(DataRecord),
    ConnectionMarker(ConnectionMarker),
    UnsafeTurning(UnsafeTurningEvent),
}

impl LogRecord {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogRecord::Data(r) => r.timestamp,
            LogRecord::ConnectionMarker(m) => m.timestamp,
            LogRecord::UnsafeTurning(e) => e.timestamp,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LogRecord::Data(_) => "DATA",
            LogRecord::ConnectionMarker(_) => "CONNECTION_MARKER",
            LogRecord::UnsafeTurning(_) => "UNSAFE_TURNING",
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, LogRecord::ConnectionMarker(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Device acceleration in g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Latest motion sensor snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMotion {
    pub acceleration: Vector3,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Safe,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurningAnalysis {
    pub is_unsafe_turning: bool,
    pub severity: Severity,
    pub max_g_force: f64,
    pub threshold: f64,
    pub exceeds_threshold: bool,
}

/// One polled sample.
///
/// Speeds are mph, `acceleration` is mph/s and absent when there is no
/// prior sample in the same connection session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_motion: Option<DeviceMotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turning_analysis: Option<TurningAnalysis>,
}

impl DataRecord {
    /// A record with only a timestamp; fill fields with struct update syntax.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            speed: None,
            rpm: None,
            throttle: None,
            location: None,
            street_name: None,
            speed_limit: None,
            acceleration: None,
            device_motion: None,
            turning_analysis: None,
        }
    }

    /// Non-empty street name, if any.
    pub fn street(&self) -> Option<&str> {
        self.street_name.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionMarker {
    pub timestamp: DateTime<Utc>,
    pub state: ConnectionState,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_street_name: Option<String>,
}

impl ConnectionMarker {
    /// Marker-supplied street, preferring `streetName` over `lastStreetName`.
    pub fn street(&self) -> Option<&str> {
        self.street_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.last_street_name
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
            })
    }
}

/// Per-axis g-force plus the peak component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GForce {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub max: f64,
}

/// Standalone unsafe-turning record, logged next to the DATA sample that tripped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsafeTurningEvent {
    pub timestamp: DateTime<Utc>,
    pub g_force: GForce,
    pub threshold: f64,
    pub severity: Severity,
}
