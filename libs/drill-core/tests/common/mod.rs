//! Common test utilities for integration tests.
//!
//! This module provides:
//! - A selector wired to a manual clock and a seeded generator
//! - Sample item pools

#![allow(dead_code)]

pub mod fixtures;

use chrono::{DateTime, Duration, Utc};
use rand_chacha::ChaCha8Rng;

use drill_core::{random, AdaptiveSelector, Clock, ManualClock, SelectorConfig};

pub type TestSelector = AdaptiveSelector<ManualClock, ChaCha8Rng>;

/// Selector plus a handle on its clock.
pub struct TestContext {
    pub selector: TestSelector,
    pub clock: ManualClock,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    pub fn with_seed(seed: u64) -> Self {
        let clock = ManualClock::new(start());
        let selector = AdaptiveSelector::with_parts(SelectorConfig::default(), clock.clone(), random::seeded(seed))
            .expect("default config is valid");
        Self { selector, clock }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(Duration::seconds(secs));
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Fixed starting instant for every test clock.
pub fn start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_700)
}
