//! Persisted score document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::formulas::MAX_SCORE;
use super::metrics::{AccelerationMetrics, SpeedMetrics};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub speed_control: u8,
    pub braking: u8,
    pub steering: u8,
    pub aggression: u8,
}

impl ScoreBreakdown {
    pub fn perfect() -> Self {
        Self {
            speed_control: MAX_SCORE,
            braking: MAX_SCORE,
            steering: MAX_SCORE,
            aggression: MAX_SCORE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMetrics {
    pub speed: SpeedMetrics,
    pub acceleration: AccelerationMetrics,
}

/// One computed safety score. Replaced wholesale on recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub overall_score: u8,
    pub speed_score: u8,
    pub breakdown: ScoreBreakdown,
    pub metrics: ScoreMetrics,
    pub last_updated: DateTime<Utc>,
    pub trips_analyzed: usize,
}

impl ScoreSnapshot {
    /// Full-marks snapshot used when there is nothing (or nothing readable) to score.
    pub fn neutral(now: DateTime<Utc>) -> Self {
        Self {
            overall_score: MAX_SCORE,
            speed_score: MAX_SCORE,
            breakdown: ScoreBreakdown::perfect(),
            metrics: ScoreMetrics::default(),
            last_updated: now,
            trips_analyzed: 0,
        }
    }
}
