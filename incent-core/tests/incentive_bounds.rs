//! Property tests for the score → incentive mapping.

use ethers_core::types::U256;
use incent_core::{
    calculate_incentive, calculate_incentive_for, HelpfulnessScore, IncentiveAmount,
    MAX_INCENTIVE_WEI, MIN_INCENTIVE_WEI,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn amount_stays_in_bounds(score in 1i64..=100) {
        let amount = calculate_incentive(HelpfulnessScore::from_raw(score));
        prop_assert!(amount.wei() >= U256::from(MIN_INCENTIVE_WEI));
        prop_assert!(amount.wei() <= U256::from(MAX_INCENTIVE_WEI));
    }

    #[test]
    fn any_float_input_stays_in_bounds(score in proptest::num::f64::ANY) {
        let amount = calculate_incentive_for(score);
        prop_assert!(amount >= IncentiveAmount::min());
        prop_assert!(amount <= IncentiveAmount::max());
    }

    #[test]
    fn monotonic_in_score(a in 1i64..=100, b in 1i64..=100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_amount = calculate_incentive(HelpfulnessScore::from_raw(lo));
        let hi_amount = calculate_incentive(HelpfulnessScore::from_raw(hi));
        prop_assert!(lo_amount <= hi_amount);
    }

    #[test]
    fn deterministic(score in 1i64..=100) {
        let s = HelpfulnessScore::from_raw(score);
        prop_assert_eq!(calculate_incentive(s), calculate_incentive(s));
    }

    #[test]
    fn json_round_trip(score in 1i64..=100) {
        let amount = calculate_incentive(HelpfulnessScore::from_raw(score));
        let json = serde_json::to_string(&amount).unwrap();
        let back: IncentiveAmount = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(amount, back);
    }
}

#[test]
fn test_score_one_pays_minimum() {
    let amount = calculate_incentive(HelpfulnessScore::from_raw(1));
    assert_eq!(amount.wei(), U256::from(MIN_INCENTIVE_WEI));
    assert_eq!(amount.to_ether_string(), "0.000001");
}

#[test]
fn test_score_hundred_pays_maximum() {
    let amount = calculate_incentive(HelpfulnessScore::from_raw(100));
    assert_eq!(amount.wei(), U256::from(MAX_INCENTIVE_WEI));
    assert_eq!(amount.to_ether_string(), "0.0001");
}

#[test]
fn test_out_of_range_scores_clamp() {
    assert_eq!(calculate_incentive(HelpfulnessScore::from_raw(0)), IncentiveAmount::min());
    assert_eq!(calculate_incentive(HelpfulnessScore::from_raw(-5)), IncentiveAmount::min());
    assert_eq!(calculate_incentive(HelpfulnessScore::from_raw(101)), IncentiveAmount::max());
}
