//! Event pin types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::model::{Location, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    Speeding,
    Acceleration,
    Braking,
    UnsafeTurning,
}

impl EventType {
    /// Display priority for merged markers, highest first.
    pub const PRIORITY: [EventType; 4] = [
        EventType::Speeding,
        EventType::UnsafeTurning,
        EventType::Braking,
        EventType::Acceleration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Speeding => "speeding",
            EventType::Acceleration => "acceleration",
            EventType::Braking => "braking",
            EventType::UnsafeTurning => "unsafeTurning",
        }
    }

    pub fn color(&self) -> PinColor {
        match self {
            EventType::Speeding => PinColor::Red,
            EventType::Acceleration => PinColor::Orange,
            EventType::Braking => PinColor::Yellow,
            EventType::UnsafeTurning => PinColor::Blue,
        }
    }

    /// Acceleration and braking may never share a marker.
    pub fn excludes(&self, other: EventType) -> bool {
        matches!(
            (self, other),
            (EventType::Acceleration, EventType::Braking)
                | (EventType::Braking, EventType::Acceleration)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinColor {
    Red,
    Orange,
    Yellow,
    Blue,
}

/// Type-specific payload of a pin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventDetails {
    #[serde(rename_all = "camelCase")]
    Speeding { speed: f64, speed_limit: f64 },
    #[serde(rename_all = "camelCase")]
    Acceleration { acceleration: f64 },
    /// `braking` is the magnitude of the (negative) `acceleration`.
    #[serde(rename_all = "camelCase")]
    Braking { acceleration: f64, braking: f64 },
    #[serde(rename_all = "camelCase")]
    UnsafeTurning { g_force: f64, severity: Severity },
}

/// Representative point for a cluster of threshold-exceeding samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPin {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl EventPin {
    pub fn new(location: Location, timestamp: DateTime<Utc>, details: EventDetails) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            timestamp,
            details,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }

    pub fn event_type(&self) -> EventType {
        match self.details {
            EventDetails::Speeding { .. } => EventType::Speeding,
            EventDetails::Acceleration { .. } => EventType::Acceleration,
            EventDetails::Braking { .. } => EventType::Braking,
            EventDetails::UnsafeTurning { .. } => EventType::UnsafeTurning,
        }
    }

    /// Value compared by clustering and representative selection.
    pub fn magnitude(&self) -> f64 {
        match self.details {
            EventDetails::Speeding { speed, .. } => speed,
            EventDetails::Acceleration { acceleration } => acceleration,
            EventDetails::Braking { braking, .. } => braking,
            EventDetails::UnsafeTurning { g_force, .. } => g_force,
        }
    }
}

/// Detector output bucketed by event type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinsByType {
    pub speeding: Vec<EventPin>,
    pub acceleration: Vec<EventPin>,
    pub braking: Vec<EventPin>,
    pub unsafe_turning: Vec<EventPin>,
}

impl PinsByType {
    pub fn get(&self, event_type: EventType) -> &[EventPin] {
        match event_type {
            EventType::Speeding => &self.speeding,
            EventType::Acceleration => &self.acceleration,
            EventType::Braking => &self.braking,
            EventType::UnsafeTurning => &self.unsafe_turning,
        }
    }

    pub fn push(&mut self, pin: EventPin) {
        match pin.event_type() {
            EventType::Speeding => self.speeding.push(pin),
            EventType::Acceleration => self.acceleration.push(pin),
            EventType::Braking => self.braking.push(pin),
            EventType::UnsafeTurning => self.unsafe_turning.push(pin),
        }
    }

    pub fn total(&self) -> usize {
        self.speeding.len() + self.acceleration.len() + self.braking.len() + self.unsafe_turning.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pin_serializes_flat() {
        let pin = EventPin::new(
            Location::new(40.0, -75.0),
            "2025-03-01T12:00:00Z".parse().unwrap(),
            EventDetails::Speeding { speed: 72.0, speed_limit: 60.0 },
        );
        let value = serde_json::to_value(&pin).unwrap();
        assert_eq!(value["type"], json!("speeding"));
        assert_eq!(value["speed"], json!(72.0));
        assert_eq!(value["speedLimit"], json!(60.0));
        assert_eq!(value["latitude"], json!(40.0));
    }

    #[test]
    fn test_type_tags_and_colors() {
        assert_eq!(EventType::UnsafeTurning.as_str(), "unsafeTurning");
        assert_eq!(EventType::Braking.color(), PinColor::Yellow);
        assert!(EventType::Acceleration.excludes(EventType::Braking));
        assert!(EventType::Braking.excludes(EventType::Acceleration));
        assert!(!EventType::Speeding.excludes(EventType::Braking));
        assert!(!EventType::Braking.excludes(EventType::Braking));
    }

    #[test]
    fn test_braking_magnitude_is_positive() {
        let pin = EventPin::new(
            Location::new(0.0, 0.0),
            chrono::Utc::now(),
            EventDetails::Braking { acceleration: -12.0, braking: 12.0 },
        );
        assert_eq!(pin.magnitude(), 12.0);
        assert_eq!(pin.event_type(), EventType::Braking);
    }
}
