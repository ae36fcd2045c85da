//! Trip analysis pipeline.
//!
//! Log store -> trip reconstruction -> four detectors -> combined markers.
//! Scoring runs separately through the score cache.

use serde::Serialize;

use crate::config::DetectionConfig;
use crate::events::combined::{merge_events, CombinedEventPin};
use crate::events::detect_all;
use crate::events::pin::PinsByType;
use crate::storage::log_store::LogStore;
use crate::trips::reconstruct::{reconstruct, Trip};

use super::context::AnalysisContext;

/// Detector output and merged markers for one trip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAnalysis {
    pub trip_id: u32,
    pub pins: PinsByType,
    pub combined: Vec<CombinedEventPin>,
}

/// Every trip on a channel together with its analysis.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAnalysis {
    pub trips: Vec<Trip>,
    pub analyses: Vec<TripAnalysis>,
}

impl ChannelAnalysis {
    pub fn total_events(&self) -> usize {
        self.analyses.iter().map(|a| a.pins.total()).sum()
    }

    pub fn analysis_for(&self, trip_id: u32) -> Option<&TripAnalysis> {
        self.analyses.iter().find(|a| a.trip_id == trip_id)
    }
}

pub fn analyze_trip(trip: &Trip, config: &DetectionConfig, ctx: &AnalysisContext) -> TripAnalysis {
    let log_ctx = ctx.trip_context(trip.id);
    let pins = detect_all(Some(trip), config);
    crate::log_debug!(log_ctx, "SPEEDING_DETECTED", pins = pins.speeding.len());
    crate::log_debug!(log_ctx, "ACCELERATION_DETECTED", pins = pins.acceleration.len());
    crate::log_debug!(log_ctx, "BRAKING_DETECTED", pins = pins.braking.len());
    crate::log_debug!(
        log_ctx,
        "UNSAFE_TURNING_DETECTED",
        standalone_records = trip.unsafe_turning.len(),
        pins = pins.unsafe_turning.len()
    );

    let combined = merge_events(&pins, config);
    crate::log_debug!(
        log_ctx,
        "EVENTS_MERGED",
        pins = pins.total(),
        markers = combined.len(),
        mixed = combined.iter().filter(|c| c.has_multiple_types).count()
    );

    TripAnalysis {
        trip_id: trip.id,
        pins,
        combined,
    }
}

/// Read one channel, reconstruct its trips and analyze each.
///
/// A store read failure is logged and yields an empty analysis.
pub fn analyze_channel(
    store: &dyn LogStore,
    config: &DetectionConfig,
    ctx: &AnalysisContext,
) -> ChannelAnalysis {
    let log_ctx = ctx.log_context();

    let records = match store.read_all(ctx.channel) {
        Ok(records) => records,
        Err(e) => {
            crate::log_error!(log_ctx, "CHANNEL_READ_FAILED", error = e);
            return ChannelAnalysis::default();
        }
    };

    let trips = reconstruct(&records, &log_ctx);
    let analyses: Vec<TripAnalysis> = trips
        .iter()
        .map(|trip| analyze_trip(trip, config, ctx))
        .collect();

    let result = ChannelAnalysis { trips, analyses };
    crate::log_info!(
        log_ctx,
        "CHANNEL_ANALYZED",
        records = records.len(),
        trips = result.trips.len(),
        events = result.total_events()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TelemetryError};
    use crate::records::model::{ConnectionMarker, ConnectionState, DataRecord, Location, LogRecord};
    use crate::storage::log_store::{Channel, MemoryLogStore};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 2, 17, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn marker(secs: i64, state: ConnectionState) -> LogRecord {
        LogRecord::ConnectionMarker(ConnectionMarker {
            timestamp: t(secs),
            state,
            message: String::new(),
            street_name: None,
            last_street_name: None,
        })
    }

    fn speeding_sample(secs: i64, lat: f64) -> LogRecord {
        LogRecord::Data(DataRecord {
            speed: Some(52.0),
            speed_limit: Some(35.0),
            location: Some(Location::new(lat, -122.0)),
            ..DataRecord::at(t(secs))
        })
    }

    struct OfflineStore;

    impl LogStore for OfflineStore {
        fn append(&self, _channel: Channel, _record: &LogRecord) -> Result<()> {
            Err(TelemetryError::Store("offline".to_string()))
        }

        fn read_all(&self, _channel: Channel) -> Result<Vec<LogRecord>> {
            Err(TelemetryError::Store("offline".to_string()))
        }

        fn clear(&self, _channel: Channel) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_analyze_channel_per_trip() {
        let store = MemoryLogStore::new();
        let records = [
            marker(0, ConnectionState::Connected),
            speeding_sample(1, 37.0),
            marker(2, ConnectionState::Disconnected),
            marker(10, ConnectionState::Connected),
            LogRecord::Data(DataRecord {
                speed: Some(30.0),
                speed_limit: Some(35.0),
                location: Some(Location::new(37.1, -122.0)),
                ..DataRecord::at(t(11))
            }),
            marker(12, ConnectionState::Disconnected),
        ];
        for record in &records {
            store.append(Channel::Sim, record).unwrap();
        }

        let ctx = AnalysisContext::new(Channel::Sim);
        let result = analyze_channel(&store, &DetectionConfig::default(), &ctx);

        assert_eq!(result.trips.len(), 2);
        assert_eq!(result.analyses.len(), 2);
        assert_eq!(result.analysis_for(1).unwrap().pins.speeding.len(), 1);
        assert_eq!(result.analysis_for(1).unwrap().combined.len(), 1);
        assert!(result.analysis_for(2).unwrap().pins.is_empty());
        assert_eq!(result.total_events(), 1);
    }

    #[test]
    fn test_read_failure_yields_empty_analysis() {
        let ctx = AnalysisContext::new(Channel::Real);
        let result = analyze_channel(&OfflineStore, &DetectionConfig::default(), &ctx);
        assert!(result.trips.is_empty());
        assert!(result.analyses.is_empty());
    }

    #[test]
    fn test_analyze_trip_without_events() {
        let ctx = AnalysisContext::new(Channel::Sim);
        let trip = Trip {
            id: 7,
            start_time: t(0),
            end_time: None,
            road_name: "Current Trip".to_string(),
            start_message: String::new(),
            end_message: None,
            logs: vec![DataRecord::at(t(1))],
            unsafe_turning: Vec::new(),
        };
        let analysis = analyze_trip(&trip, &DetectionConfig::default(), &ctx);
        assert_eq!(analysis.trip_id, 7);
        assert!(analysis.pins.is_empty());
        assert!(analysis.combined.is_empty());
    }
}
