//! Adaptive weighted selection.
//!
//! The selector keeps one [`PerformanceRecord`] per item and favours items the
//! learner gets wrong, while cooling down mastered items and avoiding
//! immediate repeats. Items without a record weigh exactly 1.0.

pub mod factors;

use std::collections::HashMap;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, SelectorError};
use crate::random::{self, RandomSource};
use crate::types::{AnswerOutcome, PerformanceRecord, SelectorConfig};
pub use factors::WeightBreakdown;

/// Weight of an item that has never been shown or answered.
pub const NEUTRAL_WEIGHT: f64 = 1.0;

/// Stateful item scheduler.
///
/// Instances are independent; share one explicitly (see
/// [`SharedSelector`](crate::shared::SharedSelector)) when several features
/// need the same history.
#[derive(Debug)]
pub struct AdaptiveSelector<C = SystemClock, R = ChaCha8Rng> {
    records: HashMap<String, PerformanceRecord>,
    config: SelectorConfig,
    clock: C,
    rng: R,
}

impl AdaptiveSelector {
    /// Selector with default config, wall clock and a time-seeded generator.
    pub fn new() -> Self {
        Self::from_parts(SelectorConfig::default(), SystemClock, random::from_time())
    }

    pub fn with_config(config: SelectorConfig) -> Result<Self> {
        Self::with_parts(config, SystemClock, random::from_time())
    }
}

impl Default for AdaptiveSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, R: RandomSource> AdaptiveSelector<C, R> {
    /// Selector with injected clock and randomness.
    pub fn with_parts(config: SelectorConfig, clock: C, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, clock, rng))
    }

    fn from_parts(config: SelectorConfig, clock: C, rng: R) -> Self {
        Self {
            records: HashMap::new(),
            config,
            clock,
            rng,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Priority weight of `item` within `pool`.
    ///
    /// Always in `[min_weight, max_weight]`; exactly [`NEUTRAL_WEIGHT`] for
    /// items with no record.
    pub fn compute_weight<S: AsRef<str>>(&mut self, item: &str, pool: &[S]) -> f64 {
        self.weight_breakdown(item, pool)
            .map_or(NEUTRAL_WEIGHT, |breakdown| breakdown.weight)
    }

    /// Per-factor view of the weight, `None` for items with no record.
    ///
    /// Draws a fresh jitter value, like [`compute_weight`](Self::compute_weight).
    pub fn weight_breakdown<S: AsRef<str>>(&mut self, item: &str, pool: &[S]) -> Option<WeightBreakdown> {
        let record = self.records.get(item)?;
        let jitter = factors::jitter(pool.len(), &mut self.rng, &self.config);
        let breakdown = WeightBreakdown::compute(record, self.clock.now(), jitter, &self.config);
        trace!(item, ?breakdown, "computed weight");
        Some(breakdown)
    }

    /// Weighted-random pick from `pool`, skipping `exclude` when possible.
    ///
    /// If skipping `exclude` would leave nothing, the exclusion is ignored.
    /// An empty `pool` is a caller error.
    pub fn select_weighted<'a, S: AsRef<str>>(&mut self, pool: &'a [S], exclude: Option<&str>) -> Result<&'a str> {
        if pool.is_empty() {
            warn!("select_weighted called with an empty pool");
            return Err(SelectorError::EmptyPool);
        }

        let mut candidates: Vec<&'a str> = pool
            .iter()
            .map(|item| item.as_ref())
            .filter(|item| Some(*item) != exclude)
            .collect();
        if candidates.is_empty() {
            candidates = pool.iter().map(|item| item.as_ref()).collect();
        }

        if let [only] = candidates.as_slice() {
            return Ok(*only);
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|item| self.compute_weight(item, candidates.as_slice()))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut remaining = self.rng.next_f64() * total;
        for (&item, weight) in candidates.iter().zip(&weights) {
            remaining -= weight;
            if remaining <= 0.0 {
                debug!(item, pool = candidates.len(), total, "selected item");
                return Ok(item);
            }
        }

        let fallback = candidates[self.rng.next_index(candidates.len())];
        warn!(item = fallback, total, "weighted walk missed, using uniform pick");
        Ok(fallback)
    }

    /// Record an answer for `item`, creating its record if needed.
    pub fn record_answer(&mut self, item: &str, outcome: impl Into<AnswerOutcome>) {
        let outcome = outcome.into();
        let now = self.clock.now();
        let window = self.config.miss_window();

        match self.records.get_mut(item) {
            Some(record) => record.apply(outcome, now, window),
            None => {
                debug!(item, ?outcome, "creating record from first answer");
                self.records.insert(
                    item.to_string(),
                    PerformanceRecord::from_first_answer(outcome, now, window),
                );
            }
        }
    }

    /// Note that `item` is on screen, without touching answer counters.
    pub fn mark_seen(&mut self, item: &str) {
        let now = self.clock.now();
        self.records
            .entry(item.to_string())
            .and_modify(|record| record.last_seen_at = now)
            .or_insert_with(|| PerformanceRecord::new(now));
    }

    /// Forget every record.
    pub fn reset(&mut self) {
        debug!(records = self.records.len(), "resetting selector");
        self.records.clear();
    }

    /// Copy of the record for `item`.
    pub fn get_record(&self, item: &str) -> Option<PerformanceRecord> {
        self.records.get(item).cloned()
    }

    /// Copies of all records, sorted by item.
    pub fn records(&self) -> Vec<(String, PerformanceRecord)> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .map(|(item, record)| (item.clone(), record.clone()))
            .collect();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
