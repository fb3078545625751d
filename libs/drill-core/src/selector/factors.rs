//! Weight factors.
//!
//! An item's weight is the product of six independent multipliers:
//! - Accuracy: logistic in the item's hit rate, high for weak items
//! - Recent misses: boost that decays over the miss window
//! - Wrong streak: `1 + c * sqrt(consecutive_wrong)`
//! - Mastery: cooldown once the correct streak reaches the threshold
//! - Freshness: penalty for items shown moments ago
//! - Jitter: uniform noise, narrower for large pools
//!
//! The product is clamped to `[min_weight, max_weight]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::types::{PerformanceRecord, SelectorConfig};

/// Every factor that went into one weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBreakdown {
    pub accuracy: f64,
    pub recent_miss: f64,
    pub consecutive_wrong: f64,
    pub mastery: f64,
    pub freshness: f64,
    pub jitter: f64,
    /// Product before clamping.
    pub raw: f64,
    pub weight: f64,
}

impl WeightBreakdown {
    /// Combine deterministic factors for `record` with the given jitter.
    pub fn compute(record: &PerformanceRecord, now: DateTime<Utc>, jitter: f64, config: &SelectorConfig) -> Self {
        let accuracy = accuracy_factor(record.accuracy(), config);
        let recent_miss = recent_miss_factor(&record.recent_misses, now, config);
        let consecutive_wrong = consecutive_wrong_factor(record.consecutive_wrong, config);
        let mastery = mastery_factor(record.consecutive_correct, config);
        let freshness = freshness_factor(record.last_seen_at, now, config);

        let raw = accuracy * recent_miss * consecutive_wrong * mastery * freshness * jitter;
        let weight = raw.clamp(config.min_weight, config.max_weight);

        Self {
            accuracy,
            recent_miss,
            consecutive_wrong,
            mastery,
            freshness,
            jitter,
            raw,
            weight,
        }
    }

    /// Product of the factors that do not depend on randomness.
    pub fn deterministic(&self) -> f64 {
        self.accuracy * self.recent_miss * self.consecutive_wrong * self.mastery * self.freshness
    }
}

fn logistic(accuracy: f64, config: &SelectorConfig) -> f64 {
    1.0 / (1.0 + (config.accuracy_steepness * (accuracy - config.accuracy_midpoint)).exp())
}

/// Falling logistic in accuracy, shifted so perfect accuracy lands on the floor.
///
/// With defaults: 0% -> ~2.56, 50% -> ~1.43, 100% -> exactly the 0.3 floor.
pub fn accuracy_factor(accuracy: f64, config: &SelectorConfig) -> f64 {
    let accuracy = if accuracy.is_finite() { accuracy.clamp(0.0, 1.0) } else { 0.5 };
    config.accuracy_scale * (logistic(accuracy, config) - logistic(1.0, config)) + config.accuracy_floor
}

/// `1 + sum of per-miss boosts`.
pub fn recent_miss_factor(misses: &[DateTime<Utc>], now: DateTime<Utc>, config: &SelectorConfig) -> f64 {
    let full = config.miss_full_boost();
    let window = config.miss_window();
    let decay_span = (window - full).num_milliseconds() as f64;

    let boost: f64 = misses
        .iter()
        .map(|&at| {
            let age = now - at;
            if age < full {
                config.miss_boost
            } else if age < window && decay_span > 0.0 {
                let into_decay = (age - full).num_milliseconds() as f64;
                config.miss_boost * (1.0 - into_decay / decay_span)
            } else {
                0.0
            }
        })
        .sum();

    1.0 + boost
}

pub fn consecutive_wrong_factor(consecutive_wrong: u32, config: &SelectorConfig) -> f64 {
    1.0 + config.consecutive_wrong_coefficient * (consecutive_wrong as f64).sqrt()
}

/// Cooldown for mastered items, flat once `mastery_max_steps` is reached.
pub fn mastery_factor(consecutive_correct: u32, config: &SelectorConfig) -> f64 {
    if consecutive_correct < config.mastery_threshold {
        return 1.0;
    }
    // Threshold itself counts as the first step.
    let steps = (consecutive_correct + 1 - config.mastery_threshold).min(config.mastery_max_steps);
    (1.0 - config.mastery_step * steps as f64).max(config.mastery_floor)
}

pub fn freshness_factor(last_seen_at: DateTime<Utc>, now: DateTime<Utc>, config: &SelectorConfig) -> f64 {
    if now - last_seen_at < config.freshness() {
        config.freshness_penalty
    } else {
        1.0
    }
}

/// Draw a jitter multiplier for a pool of `pool_len` candidates.
pub fn jitter<R: RandomSource + ?Sized>(pool_len: usize, rng: &mut R, config: &SelectorConfig) -> f64 {
    let (low, high) = if pool_len > config.large_pool_threshold {
        config.large_pool_jitter
    } else {
        config.small_pool_jitter
    };
    low + rng.next_f64() * (high - low)
}
