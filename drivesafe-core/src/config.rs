//! Tunable thresholds, tolerances and scoring constants.
//!
//! Every section deserializes with `#[serde(default)]`, so a partial JSON
//! document overrides only the keys it names.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemetryError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub detection: DetectionConfig,
    pub scoring: ScoringConfig,
    pub cache: CacheConfig,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TelemetryError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Reject values that would make clustering or scoring meaningless.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detection;
        let radii = [
            ("speedingDistanceFt", d.speeding_distance_ft),
            ("accelerationDistanceFt", d.acceleration_distance_ft),
            ("brakingDistanceFt", d.braking_distance_ft),
            ("turningDedupDistanceFt", d.turning_dedup_distance_ft),
            ("mergeDistanceFt", d.merge_distance_ft),
        ];
        for (name, value) in radii {
            if !(value >= 0.0) {
                return Err(TelemetryError::Config(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        let s = &self.scoring;
        if !(s.speed_reference_deviation > 0.0) {
            return Err(TelemetryError::Config(
                "speedReferenceDeviation must be positive".to_string(),
            ));
        }
        if !(s.accel_low_limit < s.accel_min_ideal
            && s.accel_min_ideal <= s.accel_max_ideal
            && s.accel_max_ideal < s.accel_high_limit)
        {
            return Err(TelemetryError::Config(format!(
                "acceleration bands must satisfy low < minIdeal <= maxIdeal < high, got {} {} {} {}",
                s.accel_low_limit, s.accel_min_ideal, s.accel_max_ideal, s.accel_high_limit
            )));
        }
        Ok(())
    }
}

/// Event detection thresholds and clustering tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionConfig {
    /// mph over (or under) the posted limit.
    pub speeding_threshold: f64,
    /// mph/s; samples strictly above are harsh acceleration.
    pub acceleration_threshold: f64,
    /// mph/s, conventionally negative; samples strictly below are harsh braking.
    pub braking_threshold: f64,
    /// g.
    pub turning_threshold: f64,

    pub speeding_distance_ft: f64,
    pub speeding_speed_tolerance: f64,
    pub acceleration_distance_ft: f64,
    pub acceleration_tolerance: f64,
    pub braking_distance_ft: f64,
    pub braking_tolerance: f64,
    pub turning_dedup_distance_ft: f64,
    /// Max gap between a standalone turning record and the DATA record it is pinned to.
    pub turning_correlation_secs: f64,
    pub merge_distance_ft: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            speeding_threshold: 5.0,
            acceleration_threshold: 6.0,
            braking_threshold: -8.0,
            turning_threshold: 0.4,
            speeding_distance_ft: 50.0,
            speeding_speed_tolerance: 10.0,
            acceleration_distance_ft: 50.0,
            acceleration_tolerance: 2.0,
            braking_distance_ft: 75.0,
            braking_tolerance: 3.0,
            turning_dedup_distance_ft: 30.0,
            turning_correlation_secs: 2.0,
            merge_distance_ft: 100.0,
        }
    }
}

/// Constants of the speed and acceleration score formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    /// `k` in `exp(-k * avgDeviation / M)`.
    pub speed_decay: f64,
    /// `M`, mph.
    pub speed_reference_deviation: f64,
    /// `c` in `1 - c * proportionSpeeding`.
    pub time_penalty_weight: f64,
    pub speeding_duration_cap_secs: f64,

    pub accel_low_limit: f64,
    pub accel_min_ideal: f64,
    pub accel_max_ideal: f64,
    pub accel_high_limit: f64,
    pub harsh_acceleration_threshold: f64,

    pub braking_score: u8,
    pub steering_score: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            speed_decay: 0.7,
            speed_reference_deviation: 20.0,
            time_penalty_weight: 0.4,
            speeding_duration_cap_secs: 10.0,
            accel_low_limit: 0.0,
            accel_min_ideal: 2.0,
            accel_max_ideal: 6.0,
            accel_high_limit: 12.0,
            harsh_acceleration_threshold: 8.0,
            braking_score: 85,
            steering_score: 90,
        }
    }
}

/// Score cache behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// How long the scanned "latest trip timestamp" stays valid.
    pub timestamp_memo_secs: u64,
}

impl CacheConfig {
    pub fn timestamp_memo_ttl(&self) -> Duration {
        Duration::from_secs(self.timestamp_memo_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timestamp_memo_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = Config::default();
        assert_eq!(config.detection.acceleration_threshold, 6.0);
        assert_eq!(config.detection.braking_threshold, -8.0);
        assert_eq!(config.detection.merge_distance_ft, 100.0);
        assert_eq!(config.scoring.speed_decay, 0.7);
        assert_eq!(config.scoring.braking_score, 85);
        assert_eq!(config.scoring.steering_score, 90);
        assert_eq!(config.cache.timestamp_memo_ttl(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_only_named_keys() {
        let config = Config::from_json_str(
            r#"{"detection": {"speedingThreshold": 10.0}, "cache": {"timestampMemoSecs": 0}}"#,
        )
        .unwrap();
        assert_eq!(config.detection.speeding_threshold, 10.0);
        assert_eq!(config.detection.braking_threshold, -8.0);
        assert_eq!(config.cache.timestamp_memo_secs, 0);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn test_invalid_bands_rejected() {
        let err = Config::from_json_str(r#"{"scoring": {"accelMinIdeal": 7.0}}"#).unwrap_err();
        assert!(matches!(err, TelemetryError::Config(_)));
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = Config::from_json_str(r#"{"detection": {"mergeDistanceFt": -1.0}}"#).unwrap_err();
        assert!(matches!(err, TelemetryError::Config(_)));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            Config::from_json_str("{not json").unwrap_err(),
            TelemetryError::Json(_)
        ));
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = Config::from_file("/definitely/not/here/drivesafe.json").unwrap_err();
        assert!(matches!(err, TelemetryError::Io { .. }));
    }
}
