//! Core types for the adaptive selector.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectorError};

/// Outcome of a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Wrong,
}

impl AnswerOutcome {
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl From<bool> for AnswerOutcome {
    fn from(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Wrong }
    }
}

/// Per-item performance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub correct_count: u32,
    pub wrong_count: u32,
    /// Miss timestamps, oldest first. Pruned to the miss window on every wrong answer.
    pub recent_misses: Vec<DateTime<Utc>>,
    pub last_seen_at: DateTime<Utc>,
    pub consecutive_correct: u32,
    pub consecutive_wrong: u32,
}

impl PerformanceRecord {
    /// Record for an item shown at `now` with no answers yet.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            correct_count: 0,
            wrong_count: 0,
            recent_misses: Vec::new(),
            last_seen_at: now,
            consecutive_correct: 0,
            consecutive_wrong: 0,
        }
    }

    /// Record seeded from a first answer.
    pub fn from_first_answer(outcome: AnswerOutcome, now: DateTime<Utc>, miss_window: Duration) -> Self {
        let mut record = Self::new(now);
        record.apply(outcome, now, miss_window);
        record
    }

    /// Total answers recorded.
    pub fn attempts(&self) -> u32 {
        self.correct_count.saturating_add(self.wrong_count)
    }

    /// Fraction of correct answers, 0.5 when nothing has been answered.
    pub fn accuracy(&self) -> f64 {
        match self.attempts() {
            0 => 0.5,
            total => self.correct_count as f64 / total as f64,
        }
    }

    /// Fold one answer into the record.
    pub fn apply(&mut self, outcome: AnswerOutcome, now: DateTime<Utc>, miss_window: Duration) {
        match outcome {
            AnswerOutcome::Correct => {
                self.correct_count = self.correct_count.saturating_add(1);
                self.consecutive_correct = self.consecutive_correct.saturating_add(1);
                self.consecutive_wrong = 0;
            }
            AnswerOutcome::Wrong => {
                self.wrong_count = self.wrong_count.saturating_add(1);
                self.consecutive_wrong = self.consecutive_wrong.saturating_add(1);
                self.consecutive_correct = 0;
                self.recent_misses.push(now);
                self.prune_misses(now, miss_window);
            }
        }
        self.last_seen_at = now;
    }

    /// Drop misses older than `window` relative to `now`.
    pub fn prune_misses(&mut self, now: DateTime<Utc>, window: Duration) {
        self.recent_misses.retain(|&at| now - at <= window);
    }
}

/// Tunable constants for weight computation.
///
/// Defaults reproduce the stock drill behaviour. Deserialization accepts
/// partial documents; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Accuracy at which the logistic curve is centered.
    pub accuracy_midpoint: f64,
    pub accuracy_steepness: f64,
    pub accuracy_scale: f64,
    /// Accuracy factor at 100% accuracy.
    pub accuracy_floor: f64,

    /// Misses younger than this give the full boost.
    pub miss_full_boost_secs: f64,
    /// Misses older than this are ignored and pruned.
    pub miss_window_secs: f64,
    pub miss_boost: f64,

    pub consecutive_wrong_coefficient: f64,

    pub mastery_threshold: u32,
    pub mastery_step: f64,
    pub mastery_max_steps: u32,
    pub mastery_floor: f64,

    pub freshness_secs: f64,
    pub freshness_penalty: f64,

    /// Pools larger than this use the narrow jitter range.
    pub large_pool_threshold: usize,
    pub large_pool_jitter: (f64, f64),
    pub small_pool_jitter: (f64, f64),

    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            accuracy_midpoint: 0.5,
            accuracy_steepness: 6.0,
            accuracy_scale: 2.5,
            accuracy_floor: 0.3,
            miss_full_boost_secs: 30.0,
            miss_window_secs: 120.0,
            miss_boost: 0.5,
            consecutive_wrong_coefficient: 0.2,
            mastery_threshold: 3,
            mastery_step: 0.15,
            mastery_max_steps: 5,
            mastery_floor: 0.15,
            freshness_secs: 5.0,
            freshness_penalty: 0.3,
            large_pool_threshold: 20,
            large_pool_jitter: (0.9, 1.0),
            small_pool_jitter: (0.8, 1.0),
            min_weight: 0.1,
            max_weight: 5.0,
        }
    }
}

impl SelectorConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every constant is usable.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("accuracy_midpoint", self.accuracy_midpoint),
            ("accuracy_steepness", self.accuracy_steepness),
            ("accuracy_scale", self.accuracy_scale),
            ("accuracy_floor", self.accuracy_floor),
            ("miss_full_boost_secs", self.miss_full_boost_secs),
            ("miss_window_secs", self.miss_window_secs),
            ("miss_boost", self.miss_boost),
            ("consecutive_wrong_coefficient", self.consecutive_wrong_coefficient),
            ("mastery_step", self.mastery_step),
            ("mastery_floor", self.mastery_floor),
            ("freshness_secs", self.freshness_secs),
            ("freshness_penalty", self.freshness_penalty),
            ("min_weight", self.min_weight),
            ("max_weight", self.max_weight),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(SelectorError::invalid(field, "must be finite"));
            }
            if value < 0.0 {
                return Err(SelectorError::invalid(field, "must not be negative"));
            }
        }

        if self.miss_full_boost_secs > self.miss_window_secs {
            return Err(SelectorError::invalid(
                "miss_full_boost_secs",
                "must not exceed miss_window_secs",
            ));
        }
        if self.min_weight <= 0.0 {
            return Err(SelectorError::invalid("min_weight", "must be positive"));
        }
        if self.min_weight > self.max_weight {
            return Err(SelectorError::invalid(
                "min_weight",
                "must not exceed max_weight",
            ));
        }
        check_jitter("large_pool_jitter", self.large_pool_jitter)?;
        check_jitter("small_pool_jitter", self.small_pool_jitter)?;
        Ok(())
    }

    pub fn miss_window(&self) -> Duration {
        secs(self.miss_window_secs)
    }

    pub fn miss_full_boost(&self) -> Duration {
        secs(self.miss_full_boost_secs)
    }

    pub fn freshness(&self) -> Duration {
        secs(self.freshness_secs)
    }
}

fn check_jitter(field: &'static str, (low, high): (f64, f64)) -> Result<()> {
    if !(low.is_finite() && high.is_finite()) {
        return Err(SelectorError::invalid(field, "must be finite"));
    }
    if low <= 0.0 || high > 1.0 || low > high {
        return Err(SelectorError::invalid(field, "expected 0 < low <= high <= 1"));
    }
    Ok(())
}

fn secs(value: f64) -> Duration {
    Duration::milliseconds((value * 1000.0).round() as i64)
}
