//! Core drill library shared by the kana, kanji and vocabulary games.
//!
//! Provides:
//! - Adaptive weighted selection of the next prompt
//! - Per-item performance records
//! - Injectable clock and randomness for deterministic tests
//! - A lazily initialised shared selector for cross-feature continuity

pub mod clock;
pub mod error;
pub mod random;
pub mod selector;
pub mod shared;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, SelectorError};
pub use random::RandomSource;
pub use selector::{AdaptiveSelector, WeightBreakdown, NEUTRAL_WEIGHT};
pub use shared::SharedSelector;
pub use types::{AnswerOutcome, PerformanceRecord, SelectorConfig};
