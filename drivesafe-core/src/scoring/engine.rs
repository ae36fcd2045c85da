//! Composition of metrics and curves into a `ScoreSnapshot`.
//!
//! The overall score is the speed score alone. Braking and steering report
//! configured placeholder values; aggression reports the acceleration score,
//! or full marks when no sample accelerated.

use chrono::{DateTime, Utc};

use crate::config::ScoringConfig;
use crate::trips::reconstruct::Trip;

use super::formulas::{acceleration_score_with, speed_score_with, MAX_SCORE};
use super::metrics::{calculate_acceleration_metrics, calculate_speed_metrics};
use super::snapshot::{ScoreBreakdown, ScoreMetrics, ScoreSnapshot};

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, trips: &[Trip], speeding_threshold: f64) -> ScoreSnapshot {
        self.score_at(trips, speeding_threshold, Utc::now())
    }

    /// Score with an explicit `lastUpdated` instant.
    pub fn score_at(
        &self,
        trips: &[Trip],
        speeding_threshold: f64,
        now: DateTime<Utc>,
    ) -> ScoreSnapshot {
        if trips.is_empty() {
            return ScoreSnapshot::neutral(now);
        }

        let speed = calculate_speed_metrics(trips, speeding_threshold, &self.config);
        let acceleration = calculate_acceleration_metrics(trips, &self.config);

        let speed_score = speed_score_with(
            speed.average_speed_deviation,
            speed.proportion_speeding(),
            &self.config,
        );
        let acceleration_score = if acceleration.total_acceleration_events == 0 {
            MAX_SCORE
        } else {
            acceleration_score_with(acceleration.average_acceleration, &self.config)
        };

        ScoreSnapshot {
            overall_score: speed_score,
            speed_score,
            breakdown: ScoreBreakdown {
                speed_control: speed_score,
                braking: self.config.braking_score,
                steering: self.config.steering_score,
                aggression: acceleration_score,
            },
            metrics: ScoreMetrics {
                speed,
                acceleration,
            },
            last_updated: now,
            trips_analyzed: trips.len(),
        }
    }
}
