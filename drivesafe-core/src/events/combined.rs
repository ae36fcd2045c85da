//! Merging detector output into map markers.
//!
//! Pins of all four types are clustered by proximity to any existing member
//! of a cluster. Acceleration and braking pins never share a cluster; every
//! other combination may.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DetectionConfig;

use super::geo::distance_ft;
use super::pin::{EventDetails, EventPin, EventType, PinColor, PinsByType};

/// A merged marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedEventPin {
    /// Mean of member coordinates.
    pub latitude: f64,
    pub longitude: f64,
    pub primary_event: EventPin,
    pub events_by_type: PinsByType,
    pub event_count: usize,
    pub has_multiple_types: bool,
    pub pin_color: PinColor,
    /// Copied from the primary event.
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl CombinedEventPin {
    fn from_members(members: Vec<EventPin>) -> Option<Self> {
        let primary = EventType::PRIORITY
            .iter()
            .find_map(|wanted| members.iter().find(|p| p.event_type() == *wanted))
            .or_else(|| members.first())?
            .clone();

        let count = members.len();
        let latitude = members.iter().map(|p| p.latitude).sum::<f64>() / count as f64;
        let longitude = members.iter().map(|p| p.longitude).sum::<f64>() / count as f64;

        let first_type = members[0].event_type();
        let has_multiple_types = members.iter().any(|p| p.event_type() != first_type);

        let mut events_by_type = PinsByType::default();
        for pin in members {
            events_by_type.push(pin);
        }

        Some(Self {
            latitude,
            longitude,
            pin_color: primary.event_type().color(),
            timestamp: primary.timestamp,
            details: primary.details.clone(),
            primary_event: primary,
            events_by_type,
            event_count: count,
            has_multiple_types,
        })
    }
}

/// Merge the four detectors' pins into combined markers.
pub fn merge_events(pins: &PinsByType, config: &DetectionConfig) -> Vec<CombinedEventPin> {
    let tagged = [
        EventType::Speeding,
        EventType::Acceleration,
        EventType::Braking,
        EventType::UnsafeTurning,
    ]
    .into_iter()
    .flat_map(|event_type| pins.get(event_type).iter().cloned());

    let mut clusters: Vec<Vec<EventPin>> = Vec::new();
    for pin in tagged {
        let target = clusters.iter().position(|cluster| {
            let conflicts = cluster
                .iter()
                .any(|member| pin.event_type().excludes(member.event_type()));
            !conflicts
                && cluster.iter().any(|member| {
                    distance_ft(member.location(), pin.location()) <= config.merge_distance_ft
                })
        });
        match target {
            Some(index) => clusters[index].push(pin),
            None => clusters.push(vec![pin]),
        }
    }

    clusters
        .into_iter()
        .filter_map(CombinedEventPin::from_members)
        .collect()
}
