//! Trip sources for the score cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::logging::structured::LogContext;
use crate::storage::log_store::{Channel, LogStore};
use crate::trips::reconstruct::{reconstruct, Trip};

pub trait TripSource: Send + Sync {
    fn load_trips(&self) -> Result<Vec<Trip>>;
}

/// Reads one channel of a log store and reconstructs its trips.
pub struct ChannelTripSource {
    store: Arc<dyn LogStore>,
    channel: Channel,
    ctx: LogContext,
}

impl ChannelTripSource {
    pub fn new(store: Arc<dyn LogStore>, channel: Channel) -> Self {
        Self {
            store,
            channel,
            ctx: LogContext::new("score-cache").with_channel(channel.as_str()),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl TripSource for ChannelTripSource {
    fn load_trips(&self) -> Result<Vec<Trip>> {
        let records = self.store.read_all(self.channel)?;
        Ok(reconstruct(&records, &self.ctx))
    }
}

/// Newest timestamp across all trips.
pub fn latest_trip_timestamp(trips: &[Trip]) -> Option<DateTime<Utc>> {
    trips.iter().map(Trip::latest_timestamp).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::model::{ConnectionMarker, ConnectionState, DataRecord, LogRecord};
    use crate::storage::log_store::MemoryLogStore;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 7, 0, 0).unwrap() + Duration::seconds(secs)
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

    #[test]
    fn test_channel_source_reads_only_its_channel() {
        let store = Arc::new(MemoryLogStore::new());
        for record in [
            marker(0, ConnectionState::Connected),
            LogRecord::Data(DataRecord::at(t(5))),
            marker(10, ConnectionState::Disconnected),
        ] {
            store.append(Channel::Real, &record).unwrap();
        }
        store
            .append(Channel::Sim, &LogRecord::Data(DataRecord::at(t(99))))
            .unwrap();

        let real = ChannelTripSource::new(store.clone(), Channel::Real)
            .load_trips()
            .unwrap();
        assert_eq!(real.len(), 1);
        assert_eq!(real[0].logs.len(), 1);
        assert_eq!(latest_trip_timestamp(&real), Some(t(10)));

        let sim = ChannelTripSource::new(store, Channel::Sim).load_trips().unwrap();
        assert_eq!(latest_trip_timestamp(&sim), Some(t(99)));
    }

    #[test]
    fn test_latest_of_no_trips() {
        assert_eq!(latest_trip_timestamp(&[]), None);
    }
}
