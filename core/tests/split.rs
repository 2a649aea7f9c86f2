// Copyright 2026 The Thesis Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Split policy decision table and engine accumulation tests.

use num_bigint::BigUint;
use thesis_core::split::{self, SplitEngineState, SplitPolicy, SplitReason};

fn policy() -> SplitPolicy {
	SplitPolicy::default()
}

#[test]
fn no_price_is_rejected() {
	let d = split::decide(&policy(), 5, None, None);
	assert!(!d.should_split);
	assert_eq!(d.reason, SplitReason::NoPrice);
	assert_eq!(d.reason.code(), "NO_PRICE");

	let d = split::decide(&policy(), 5, Some(f64::NAN), None);
	assert_eq!(d.reason, SplitReason::NoPrice);
}

#[test]
fn non_positive_price_is_rejected() {
	let d = split::decide(&policy(), 5, Some(0.0), None);
	assert_eq!(d.reason, SplitReason::NonPositivePrice);
	let d = split::decide(&policy(), 5, Some(-3.0), None);
	assert_eq!(d.reason, SplitReason::NonPositivePrice);
}

#[test]
fn below_every_threshold_is_rejected() {
	let d = split::decide(&policy(), 5, Some(2.9), None);
	assert_eq!(d.reason, SplitReason::BelowThreshold);
	assert_eq!(d.factor, None);
}

#[test]
fn threshold_selection_picks_largest_factor() {
	// 3.5 only clears the 2x trigger
	let d = split::decide(&policy(), 5, Some(3.5), None);
	assert!(d.should_split);
	assert_eq!(d.factor, Some(2));
	assert_eq!(d.reason, SplitReason::ThresholdMet);

	// 8.0 clears 2x and 3x; the largest factor wins
	let d = split::decide(&policy(), 5, Some(8.0), None);
	assert_eq!(d.factor, Some(3));

	// 15.0 clears all three, exactly on the 5x trigger
	let d = split::decide(&policy(), 5, Some(15.0), None);
	assert_eq!(d.factor, Some(5));
}

#[test]
fn min_interval_throttles_consecutive_splits() {
	let d = split::decide(&policy(), 6, Some(8.0), Some(5));
	assert!(!d.should_split);
	assert_eq!(d.reason, SplitReason::MinIntervalNotMet);

	// exactly the interval later, the throttle releases
	let d = split::decide(&policy(), 5 + 10_080, Some(8.0), Some(5));
	assert!(d.should_split);
}

#[test]
fn price_checks_precede_interval_check() {
	// even inside the throttle window, a missing price reports NO_PRICE
	let d = split::decide(&policy(), 6, None, Some(5));
	assert_eq!(d.reason, SplitReason::NoPrice);
}

#[test]
fn engine_accumulates_cumulative_factor() {
	let s0 = SplitEngineState::default();
	assert_eq!(s0.cumulative_factor, BigUint::from(1u32));

	let step1 = split::step(&policy(), &s0, 5, Some(3.5));
	assert!(step1.decision.should_split);
	assert_eq!(step1.state.cumulative_factor, BigUint::from(2u32));
	assert_eq!(step1.state.last_split_height, Some(5));

	// next block is throttled; state unchanged bit for bit
	let step2 = split::step(&policy(), &step1.state, 6, Some(8.0));
	assert!(!step2.decision.should_split);
	assert_eq!(step2.decision.reason, SplitReason::MinIntervalNotMet);
	assert_eq!(step2.state, step1.state);

	// after the interval a 3x lands: 2 * 3 = 6
	let step3 = split::step(&policy(), &step1.state, 5 + 10_080, Some(8.0));
	assert_eq!(step3.state.cumulative_factor, BigUint::from(6u32));
}

#[test]
fn rejected_step_is_idempotent() {
	let s0 = SplitEngineState::default();
	let a = split::step(&policy(), &s0, 9, Some(1.0));
	let b = split::step(&policy(), &a.state, 10, Some(1.0));
	assert_eq!(a.state, s0);
	assert_eq!(b.state, s0);
}

#[test]
fn custom_policy_tie_breaks_by_largest_factor() {
	let policy = SplitPolicy {
		thresholds: vec![
			split::SplitThreshold {
				factor: 2,
				trigger_eu_per_the: 4.0,
			},
			split::SplitThreshold {
				factor: 5,
				trigger_eu_per_the: 4.0,
			},
		],
		min_blocks_between_splits: 1,
	};
	let d = split::decide(&policy, 1, Some(4.0), None);
	assert_eq!(d.factor, Some(5));
}
