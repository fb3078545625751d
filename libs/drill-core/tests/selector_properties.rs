//! Property-based tests for the adaptive selector.
//!
//! Tests the following invariants:
//! - Weight bounds: every weight lies in [min_weight, max_weight]
//! - Accuracy response: lower accuracy never lowers the accuracy factor
//! - Wrong streak: factor is non-decreasing in the streak length
//! - Mastery: factor is non-increasing in the correct streak, flat past the cap
//! - Exclusion: an excluded item is never selected from a pool with others
//! - Counters: correct + wrong only grows, and at most one streak is non-zero

mod common;

use proptest::prelude::*;

use common::fixtures;
use common::TestContext;
use drill_core::selector::factors;
use drill_core::SelectorConfig;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// One step of a drill: which item, whether it was right, and seconds elapsed after.
fn arb_step(items: usize) -> impl Strategy<Value = (usize, bool, i64)> {
    (0..items, any::<bool>(), 0i64..=150)
}

fn arb_session(items: usize) -> impl Strategy<Value = Vec<(usize, bool, i64)>> {
    prop::collection::vec(arb_step(items), 0..60)
}

fn replay(ctx: &mut TestContext, pool: &[String], session: &[(usize, bool, i64)]) {
    for &(index, correct, elapsed) in session {
        ctx.selector.record_answer(&pool[index], correct);
        ctx.advance_secs(elapsed);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_weight_within_bounds(
        pool_len in 1usize..40,
        session in arb_session(8),
        seed in any::<u64>(),
    ) {
        let mut ctx = TestContext::with_seed(seed);
        let items = fixtures::numbered(8);
        replay(&mut ctx, &items, &session);

        let pool = fixtures::numbered(pool_len);
        let config = SelectorConfig::default();
        for item in &items {
            let weight = ctx.selector.compute_weight(item, &pool);
            prop_assert!(weight >= config.min_weight);
            prop_assert!(weight <= config.max_weight);
        }
    }

    #[test]
    fn prop_unseen_items_are_neutral(session in arb_session(4)) {
        let mut ctx = TestContext::new();
        let items = fixtures::numbered(4);
        replay(&mut ctx, &items, &session);

        prop_assert_eq!(ctx.selector.compute_weight("never-seen", &items), 1.0);
    }

    #[test]
    fn prop_accuracy_factor_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let config = SelectorConfig::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(factors::accuracy_factor(low, &config) >= factors::accuracy_factor(high, &config));
    }

    #[test]
    fn prop_consecutive_wrong_non_decreasing(streak in 0u32..1000) {
        let config = SelectorConfig::default();
        prop_assert!(
            factors::consecutive_wrong_factor(streak + 1, &config)
                >= factors::consecutive_wrong_factor(streak, &config)
        );
    }

    #[test]
    fn prop_mastery_non_increasing(streak in 0u32..1000) {
        let config = SelectorConfig::default();
        let here = factors::mastery_factor(streak, &config);
        let next = factors::mastery_factor(streak + 1, &config);
        prop_assert!(here <= 1.0);
        prop_assert!(next <= here);
        if streak >= 7 {
            prop_assert_eq!(next, here);
        }
    }

    #[test]
    fn prop_excluded_item_never_selected(
        pool_len in 2usize..12,
        exclude in 0usize..12,
        session in arb_session(12),
        seed in any::<u64>(),
    ) {
        let mut ctx = TestContext::with_seed(seed);
        let items = fixtures::numbered(12);
        replay(&mut ctx, &items, &session);

        let pool = fixtures::numbered(pool_len);
        let excluded = &pool[exclude % pool_len];
        for _ in 0..20 {
            let picked = ctx.selector.select_weighted(&pool, Some(excluded.as_str())).unwrap();
            prop_assert_ne!(picked, excluded.as_str());
        }
    }

    #[test]
    fn prop_single_candidate_always_returned(session in arb_session(1)) {
        let mut ctx = TestContext::new();
        let pool = fixtures::numbered(1);
        replay(&mut ctx, &pool, &session);

        prop_assert_eq!(ctx.selector.select_weighted(&pool, None).unwrap(), "item-0");
        prop_assert_eq!(ctx.selector.select_weighted(&pool, Some("item-0")).unwrap(), "item-0");
    }

    #[test]
    fn prop_counters_monotonic_and_streaks_exclusive(session in arb_session(3)) {
        let mut ctx = TestContext::new();
        let items = fixtures::numbered(3);
        let mut attempts = [0u32; 3];

        for &(index, correct, elapsed) in &session {
            ctx.selector.record_answer(&items[index], correct);
            ctx.advance_secs(elapsed);

            let record = ctx.selector.get_record(&items[index]).unwrap();
            prop_assert!(record.attempts() > attempts[index]);
            attempts[index] = record.attempts();
            prop_assert!(record.consecutive_correct == 0 || record.consecutive_wrong == 0);
        }
    }
}
