//! Connection-marker framing of log records into trips.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logging::structured::LogContext;
use crate::records::model::{ConnectionState, DataRecord, LogRecord, UnsafeTurningEvent};

pub const UNKNOWN_ROAD: &str = "Unknown Road";
pub const CURRENT_TRIP: &str = "Current Trip";
pub const MIXED_ROUTES: &str = "Mixed Routes";

/// A reconstructed driving session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// 1-based.
    pub id: u32,
    pub start_time: DateTime<Utc>,
    /// `None` while the trip is still open.
    pub end_time: Option<DateTime<Utc>>,
    pub road_name: String,
    #[serde(default)]
    pub start_message: String,
    #[serde(default)]
    pub end_message: Option<String>,
    /// DATA records only, in log order.
    pub logs: Vec<DataRecord>,
    /// Standalone turning records that fell inside the trip.
    #[serde(default)]
    pub unsafe_turning: Vec<UnsafeTurningEvent>,
}

impl Trip {
    fn open(id: u32, start_time: DateTime<Utc>, start_message: String) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            road_name: String::new(),
            start_message,
            end_message: None,
            logs: Vec::new(),
            unsafe_turning: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Newest instant the trip knows about.
    pub fn latest_timestamp(&self) -> DateTime<Utc> {
        let mut latest = self.start_time;
        if let Some(end) = self.end_time {
            latest = latest.max(end);
        }
        if let Some(last) = self.logs.last() {
            latest = latest.max(last.timestamp);
        }
        latest
    }

    /// Most recent street name recorded in the trip's DATA records.
    fn latest_street(&self) -> Option<&str> {
        self.logs.iter().rev().find_map(|r| r.street())
    }
}

/// Reconstruct trips from one channel's records.
///
/// Never fails: stray DATA outside a trip is dropped and an unterminated trip
/// is returned as open.
pub fn reconstruct(records: &[LogRecord], ctx: &LogContext) -> Vec<Trip> {
    if records.is_empty() {
        return Vec::new();
    }

    if !records.iter().any(|r| r.is_marker()) {
        return fallback_trip(records, ctx).into_iter().collect();
    }

    let mut trips: Vec<Trip> = Vec::new();
    let mut current: Option<Trip> = None;
    let mut dropped = 0usize;

    for record in records {
        match record {
            LogRecord::ConnectionMarker(marker) => match marker.state {
                ConnectionState::Connected => {
                    if let Some(orphan) = current.take() {
                        log::warn!(
                            "{} TRIP_ORPHANED trip={} logs={} reason=connected_while_open",
                            ctx,
                            orphan.id,
                            orphan.logs.len()
                        );
                    }
                    let id = trips.len() as u32 + 1;
                    log::debug!("{} TRIP_OPENED trip={}", ctx, id);
                    current = Some(Trip::open(id, marker.timestamp, marker.message.clone()));
                }
                ConnectionState::Disconnected => {
                    let Some(mut trip) = current.take() else {
                        log::debug!("{} MARKER_IGNORED state=DISCONNECTED reason=no_open_trip", ctx);
                        continue;
                    };
                    trip.end_time = Some(marker.timestamp);
                    trip.end_message = Some(marker.message.clone());
                    trip.road_name = match marker.street() {
                        Some(street) => street.to_string(),
                        None => trip.latest_street().unwrap_or(UNKNOWN_ROAD).to_string(),
                    };
                    log::debug!(
                        "{} TRIP_CLOSED trip={} logs={} road={}",
                        ctx,
                        trip.id,
                        trip.logs.len(),
                        trip.road_name
                    );
                    trips.push(trip);
                }
            },
            LogRecord::Data(data) => match current.as_mut() {
                Some(trip) => trip.logs.push(data.clone()),
                None => dropped += 1,
            },
            LogRecord::UnsafeTurning(event) => {
                if let Some(trip) = current.as_mut() {
                    trip.unsafe_turning.push(event.clone());
                }
            }
        }
    }

    if let Some(mut trip) = current {
        trip.road_name = CURRENT_TRIP.to_string();
        trips.push(trip);
    }

    log::info!(
        "{} TRIPS_RECONSTRUCTED records={} trips={} dropped_data={}",
        ctx,
        records.len(),
        trips.len(),
        dropped
    );

    trips
}

/// One trip spanning every DATA record of a marker-free log.
fn fallback_trip(records: &[LogRecord], ctx: &LogContext) -> Option<Trip> {
    let logs: Vec<DataRecord> = records
        .iter()
        .filter_map(|r| match r {
            LogRecord::Data(d) => Some(d.clone()),
            _ => None,
        })
        .collect();
    let first = logs.first()?;
    let last = logs.last()?;

    let road_name = logs
        .iter()
        .find_map(|r| r.street())
        .unwrap_or(MIXED_ROUTES)
        .to_string();

    let mut trip = Trip::open(1, first.timestamp, String::new());
    trip.end_time = Some(last.timestamp);
    trip.road_name = road_name;
    trip.unsafe_turning = records
        .iter()
        .filter_map(|r| match r {
            LogRecord::UnsafeTurning(e) => Some(e.clone()),
            _ => None,
        })
        .collect();
    trip.logs = logs;

    log::info!(
        "{} TRIPS_RECONSTRUCTED mode=fallback records={} logs={}",
        ctx,
        records.len(),
        trip.logs.len()
    );
    Some(trip)
}
