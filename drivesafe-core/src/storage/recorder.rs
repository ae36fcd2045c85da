//! Session recording.
//!
//! Wraps a `RecordBuilder` and writes every constructed record to one
//! channel: CONNECTED on start, DATA (plus UNSAFE_TURNING when flagged) per
//! poll, DISCONNECTED carrying the last seen street on stop.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::logging::structured::LogContext;
use crate::records::builder::{unsafe_turning_record, ObdReading, RecordBuilder, RoadContext};
use crate::records::model::{ConnectionState, DataRecord, DeviceMotion, LogRecord};

use super::log_store::{Channel, LogStore};

pub struct ChannelRecorder {
    store: Arc<dyn LogStore>,
    channel: Channel,
    builder: RecordBuilder,
    turning_threshold: f64,
    last_street: Option<String>,
    recording: bool,
    log_ctx: LogContext,
}

impl ChannelRecorder {
    pub fn new(store: Arc<dyn LogStore>, channel: Channel, turning_threshold: f64) -> Self {
        Self {
            store,
            channel,
            builder: RecordBuilder::new(),
            turning_threshold,
            last_street: None,
            recording: false,
            log_ctx: LogContext::new(&format!("session-{}", &Uuid::new_v4().to_string()[..8]))
                .with_channel(channel.as_str()),
        }
    }

    pub fn log_context(&self) -> &LogContext {
        &self.log_ctx
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Append a CONNECTED marker.
    pub fn start(&mut self, timestamp: DateTime<Utc>, street_name: Option<String>) -> Result<()> {
        let marker = self.builder.connection_marker(
            timestamp,
            ConnectionState::Connected,
            "Connected to OBD bridge",
            street_name.clone(),
        );
        self.store
            .append(self.channel, &LogRecord::ConnectionMarker(marker))?;
        self.last_street = street_name;
        self.recording = true;
        crate::log_info!(self.log_ctx, "SESSION_STARTED", street = self.last_street);
        Ok(())
    }

    /// Append one DATA record, and an UNSAFE_TURNING record when the motion
    /// sample crosses the turning threshold.
    pub fn record_sample(
        &mut self,
        timestamp: DateTime<Utc>,
        obd: ObdReading,
        road: RoadContext,
        motion: Option<DeviceMotion>,
    ) -> Result<DataRecord> {
        let record = self
            .builder
            .data_record(timestamp, obd, road, motion, self.turning_threshold);
        if let Some(street) = record.street() {
            self.last_street = Some(street.to_string());
        }

        self.store
            .append(self.channel, &LogRecord::Data(record.clone()))?;
        if let Some(event) = unsafe_turning_record(&record) {
            crate::log_info!(
                self.log_ctx,
                "UNSAFE_TURNING_RECORDED",
                g_force = event.g_force.max,
                severity = event.severity
            );
            self.store
                .append(self.channel, &LogRecord::UnsafeTurning(event))?;
        }
        Ok(record)
    }

    /// Append a DISCONNECTED marker.
    pub fn stop(&mut self, timestamp: DateTime<Utc>, message: &str) -> Result<()> {
        let marker = self.builder.connection_marker(
            timestamp,
            ConnectionState::Disconnected,
            message,
            self.last_street.clone(),
        );
        self.store
            .append(self.channel, &LogRecord::ConnectionMarker(marker))?;
        self.recording = false;
        crate::log_info!(self.log_ctx, "SESSION_STOPPED", last_street = self.last_street);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::model::{Location, Vector3};
    use crate::storage::log_store::MemoryLogStore;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_session_writes_framed_records() {
        let store = Arc::new(MemoryLogStore::new());
        let mut recorder = ChannelRecorder::new(store.clone(), Channel::Real, 0.4);
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        recorder.start(t0, None).unwrap();
        assert!(recorder.is_recording());

        let road = RoadContext {
            location: Some(Location::new(40.0, -75.0)),
            street_name: Some("Pine St".to_string()),
            speed_limit: Some(25.0),
        };
        recorder
            .record_sample(
                t0 + Duration::seconds(1),
                ObdReading { speed: Some(20.0), ..Default::default() },
                road.clone(),
                None,
            )
            .unwrap();
        let second = recorder
            .record_sample(
                t0 + Duration::seconds(2),
                ObdReading { speed: Some(24.0), ..Default::default() },
                road,
                Some(DeviceMotion {
                    acceleration: Vector3 { x: 0.8, y: 0.0, z: 0.0 },
                    ..Default::default()
                }),
            )
            .unwrap();
        assert_eq!(second.acceleration, Some(4.0));

        recorder.stop(t0 + Duration::seconds(3), "Disconnected").unwrap();
        assert!(!recorder.is_recording());

        let records = store.read_all(Channel::Real).unwrap();
        let kinds: Vec<&str> = records.iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec!["CONNECTION_MARKER", "DATA", "DATA", "UNSAFE_TURNING", "CONNECTION_MARKER"]
        );
        match records.last().unwrap() {
            LogRecord::ConnectionMarker(m) => {
                assert_eq!(m.state, ConnectionState::Disconnected);
                assert_eq!(m.last_street_name.as_deref(), Some("Pine St"));
            }
            other => panic!("unexpected {}", other.kind()),
        }
    }

    #[test]
    fn test_session_log_context_names_the_channel() {
        let recorder = ChannelRecorder::new(Arc::new(MemoryLogStore::new()), Channel::Sim, 0.4);
        let rendered = recorder.log_context().to_string();
        assert!(rendered.starts_with("[run=session-"));
        assert!(rendered.ends_with("[channel=sim]"));
    }
}
