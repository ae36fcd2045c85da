//! Raw driving statistics.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::records::model::DataRecord;
use crate::trips::reconstruct::Trip;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedMetrics {
    /// DATA records carrying both speed and speed limit.
    pub total_data_points: u32,
    pub speeding_events: u32,
    /// Sum of (deviation - threshold) over speeding samples, mph.
    pub total_speed_deviation: f64,
    pub max_speed_deviation: f64,
    pub average_speed_deviation: f64,
    /// 0-100.
    pub speeding_percentage: f64,
    /// Seconds, each sample contributing at most the configured cap.
    pub speeding_duration: f64,
}

impl SpeedMetrics {
    /// `speeding_percentage` as a 0-1 fraction.
    pub fn proportion_speeding(&self) -> f64 {
        self.speeding_percentage / 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccelerationMetrics {
    /// Samples with positive acceleration.
    pub total_acceleration_events: u32,
    pub average_acceleration: f64,
    pub max_acceleration: f64,
    /// Smallest positive acceleration seen; 0 when there were none.
    pub min_acceleration: f64,
    pub harsh_acceleration_events: u32,
    pub harsh_acceleration_percentage: f64,
    /// Samples with any acceleration value.
    pub data_points_with_acceleration: u32,
}

pub fn calculate_speed_metrics(
    trips: &[Trip],
    speeding_threshold: f64,
    config: &ScoringConfig,
) -> SpeedMetrics {
    let mut m = SpeedMetrics::default();

    for trip in trips {
        let mut previous: Option<&DataRecord> = None;
        for record in &trip.logs {
            let prev = previous.replace(record);
            let (Some(speed), Some(limit)) = (record.speed, record.speed_limit) else {
                continue;
            };
            m.total_data_points += 1;

            let deviation = speed - limit;
            if deviation <= speeding_threshold {
                continue;
            }

            m.speeding_events += 1;
            let actual = deviation - speeding_threshold;
            m.total_speed_deviation += actual;
            m.max_speed_deviation = m.max_speed_deviation.max(actual);

            if let Some(prev) = prev {
                let elapsed = (record.timestamp - prev.timestamp).num_milliseconds() as f64 / 1000.0;
                if elapsed > 0.0 {
                    m.speeding_duration += elapsed.min(config.speeding_duration_cap_secs);
                }
            }
        }
    }

    if m.speeding_events > 0 {
        m.average_speed_deviation = m.total_speed_deviation / m.speeding_events as f64;
    }
    if m.total_data_points > 0 {
        m.speeding_percentage = 100.0 * m.speeding_events as f64 / m.total_data_points as f64;
    }
    m
}

pub fn calculate_acceleration_metrics(trips: &[Trip], config: &ScoringConfig) -> AccelerationMetrics {
    let mut m = AccelerationMetrics::default();
    let mut sum = 0.0;
    let mut min: Option<f64> = None;

    for acceleration in trips
        .iter()
        .flat_map(|trip| trip.logs.iter())
        .filter_map(|record| record.acceleration)
    {
        m.data_points_with_acceleration += 1;
        if acceleration <= 0.0 {
            continue;
        }

        m.total_acceleration_events += 1;
        sum += acceleration;
        m.max_acceleration = m.max_acceleration.max(acceleration);
        min = Some(min.map_or(acceleration, |current| current.min(acceleration)));
        if acceleration > config.harsh_acceleration_threshold {
            m.harsh_acceleration_events += 1;
        }
    }

    if m.total_acceleration_events > 0 {
        m.average_acceleration = sum / m.total_acceleration_events as f64;
    }
    if m.data_points_with_acceleration > 0 {
        m.harsh_acceleration_percentage =
            100.0 * m.harsh_acceleration_events as f64 / m.data_points_with_acceleration as f64;
    }
    m.min_acceleration = min.unwrap_or(0.0);
    m
}
