//! Score curves.
//!
//! Both curves return an integer in 1..=100. Speed uses exponential decay on
//! the average excess deviation, scaled down by the share of time spent
//! speeding. Acceleration is piecewise-linear around an ideal band.

use crate::config::ScoringConfig;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 100;

/// Round and clamp a raw score into 1..=100.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u8
}

/// Speed score with the default constants.
pub fn calculate_speed_score(average_speed_deviation: f64, proportion_speeding: f64) -> u8 {
    speed_score_with(
        average_speed_deviation,
        proportion_speeding,
        &ScoringConfig::default(),
    )
}

pub fn speed_score_with(
    average_speed_deviation: f64,
    proportion_speeding: f64,
    config: &ScoringConfig,
) -> u8 {
    if average_speed_deviation <= 0.0 && proportion_speeding <= 0.0 {
        return MAX_SCORE;
    }
    clamp_score(raw_speed_score(average_speed_deviation, proportion_speeding, config))
}

fn raw_speed_score(average_speed_deviation: f64, proportion_speeding: f64, config: &ScoringConfig) -> f64 {
    let speed_penalty =
        (-config.speed_decay * average_speed_deviation / config.speed_reference_deviation).exp();
    let time_penalty = 1.0 - config.time_penalty_weight * proportion_speeding;
    100.0 * speed_penalty * time_penalty
}

/// Acceleration score with the default bands.
pub fn calculate_acceleration_score(average_acceleration: f64) -> u8 {
    acceleration_score_with(average_acceleration, &ScoringConfig::default())
}

pub fn acceleration_score_with(average_acceleration: f64, config: &ScoringConfig) -> u8 {
    clamp_score(raw_acceleration_score(average_acceleration, config))
}

/// Unrounded acceleration curve.
pub fn raw_acceleration_score(avg: f64, config: &ScoringConfig) -> f64 {
    let low = config.accel_low_limit;
    let min_ideal = config.accel_min_ideal;
    let max_ideal = config.accel_max_ideal;
    let high = config.accel_high_limit;

    if avg < min_ideal {
        1.0 + (avg - low) / (min_ideal - low) * 99.0
    } else if avg <= max_ideal {
        100.0
    } else {
        100.0 - (avg - max_ideal) / (high - max_ideal) * 99.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_perfect_speed_score() {
        assert_eq!(calculate_speed_score(0.0, 0.0), 100);
    }

    #[test]
    fn test_speed_score_worked_example() {
        // 100 * exp(-0.35) * 0.96 = 67.65
        assert_eq!(calculate_speed_score(10.0, 0.1), 68);
    }

    #[test]
    fn test_speed_score_extremes() {
        assert_eq!(calculate_speed_score(1000.0, 1.0), 1);
        assert!(calculate_speed_score(0.0, 1.0) == 60);
        assert!(calculate_speed_score(0.5, 0.0) < 100);
    }

    #[test]
    fn test_acceleration_score_bands() {
        assert_eq!(calculate_acceleration_score(0.0), 1);
        assert_eq!(calculate_acceleration_score(1.0), 51);
        assert_eq!(calculate_acceleration_score(2.0), 100);
        assert_eq!(calculate_acceleration_score(4.0), 100);
        assert_eq!(calculate_acceleration_score(6.0), 100);
        assert_eq!(calculate_acceleration_score(9.0), 51);
        assert_eq!(calculate_acceleration_score(12.0), 1);
        assert_eq!(calculate_acceleration_score(30.0), 1);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(f64::NAN), 1);
        assert_eq!(clamp_score(-5.0), 1);
        assert_eq!(clamp_score(100.4), 100);
        assert_eq!(clamp_score(250.0), 100);
        assert_eq!(clamp_score(42.5), 43);
    }

    proptest! {
        #[test]
        fn prop_speed_score_bounded(dev in 0.0f64..500.0, prop in 0.0f64..=1.0) {
            let score = calculate_speed_score(dev, prop);
            prop_assert!((1..=100).contains(&score));
        }

        #[test]
        fn prop_speed_score_below_100_when_speeding(dev in 2.0f64..500.0, prop in 0.0f64..=1.0) {
            prop_assert!(calculate_speed_score(dev, prop) < 100);
        }

        #[test]
        fn prop_ideal_band_scores_100(avg in 2.0f64..=6.0) {
            prop_assert_eq!(calculate_acceleration_score(avg), 100);
        }

        #[test]
        fn prop_acceleration_curve_monotone(a in 0.0f64..12.0, b in 0.0f64..12.0) {
            let config = ScoringConfig::default();
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assume!(hi - lo > 1e-9);
            let (s_lo, s_hi) = (raw_acceleration_score(lo, &config), raw_acceleration_score(hi, &config));
            if hi < 2.0 {
                prop_assert!(s_lo < s_hi);
            }
            if lo > 6.0 {
                prop_assert!(s_lo > s_hi);
            }
            prop_assert!((1..=100).contains(&acceleration_score_with(lo, &config)));
        }
    }
}
