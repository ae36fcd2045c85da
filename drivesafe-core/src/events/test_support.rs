//! Record and trip fixtures for detector tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::records::model::{DataRecord, Location, Severity, TurningAnalysis};
use crate::trips::reconstruct::Trip;

pub fn t(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 17, 0, 0).unwrap() + Duration::seconds(secs)
}

pub fn data_at(secs: i64, lat: f64, speed: Option<f64>, limit: Option<f64>) -> DataRecord {
    DataRecord {
        speed,
        speed_limit: limit,
        location: Some(Location::new(lat, -75.0)),
        ..DataRecord::at(t(secs))
    }
}

pub fn with_accel(secs: i64, lat: f64, acceleration: Option<f64>) -> DataRecord {
    DataRecord {
        acceleration,
        ..data_at(secs, lat, Some(30.0), None)
    }
}

pub fn turning_at(secs: i64, lat: f64, g: f64, unsafe_turning: bool) -> DataRecord {
    DataRecord {
        turning_analysis: Some(TurningAnalysis {
            is_unsafe_turning: unsafe_turning,
            severity: if unsafe_turning { Severity::Medium } else { Severity::Safe },
            max_g_force: g,
            threshold: 0.4,
            exceeds_threshold: unsafe_turning,
        }),
        ..data_at(secs, lat, Some(25.0), None)
    }
}

pub fn trip_of(logs: Vec<DataRecord>) -> Trip {
    Trip {
        id: 1,
        start_time: logs.first().map_or_else(|| t(0), |r| r.timestamp),
        end_time: logs.last().map(|r| r.timestamp),
        road_name: "Test Rd".to_string(),
        start_message: String::new(),
        end_message: None,
        logs,
        unsafe_turning: Vec::new(),
    }
}
