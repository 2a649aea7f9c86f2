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

//! The upward-split policy and engine.
//!
//! A split is a discrete multiplicative rescaling of balances by a factor in
//! {2, 3, 5}, triggered when the EU/THE price crosses a configured
//! threshold and throttled by a minimum inter-split interval. The engine
//! always runs; whether balances are actually scaled is the pipeline's
//! decision (shadow vs. enforced mode). The oracle price is the one
//! sanctioned floating-point input of the consensus core.

use crate::core::amount::Height;
use crate::ser::biguint_decimal;
use num_bigint::BigUint;

/// One price threshold: at or above `trigger_eu_per_the`, split by
/// `factor`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitThreshold {
	pub factor: u32,
	pub trigger_eu_per_the: f64,
}

/// Ordered thresholds plus the inter-split throttle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPolicy {
	pub thresholds: Vec<SplitThreshold>,
	pub min_blocks_between_splits: u64,
}

lazy_static! {
	/// The canonical policy: 2x at 3.0, 3x at 7.0, 5x at 15.0, one split
	/// per epoch at most.
	pub static ref DEFAULT_SPLIT_POLICY: SplitPolicy = SplitPolicy {
		thresholds: vec![
			SplitThreshold { factor: 2, trigger_eu_per_the: 3.0 },
			SplitThreshold { factor: 3, trigger_eu_per_the: 7.0 },
			SplitThreshold { factor: 5, trigger_eu_per_the: 15.0 },
		],
		min_blocks_between_splits: 10_080,
	};
}

impl Default for SplitPolicy {
	fn default() -> SplitPolicy {
		DEFAULT_SPLIT_POLICY.clone()
	}
}

/// Why a split decision came out the way it did. Decision outcomes, not
/// errors: a rejected split is normal operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitReason {
	ThresholdMet,
	BelowThreshold,
	NoPrice,
	NonPositivePrice,
	MinIntervalNotMet,
}

impl SplitReason {
	pub fn code(&self) -> &'static str {
		match self {
			SplitReason::ThresholdMet => "THRESHOLD_MET",
			SplitReason::BelowThreshold => "BELOW_THRESHOLD",
			SplitReason::NoPrice => "NO_PRICE",
			SplitReason::NonPositivePrice => "NON_POSITIVE_PRICE",
			SplitReason::MinIntervalNotMet => "MIN_INTERVAL_NOT_MET",
		}
	}
}

/// Outcome of evaluating the policy at one height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitDecision {
	pub should_split: bool,
	pub factor: Option<u32>,
	pub reason: SplitReason,
}

impl SplitDecision {
	fn rejected(reason: SplitReason) -> SplitDecision {
		SplitDecision {
			should_split: false,
			factor: None,
			reason,
		}
	}
}

/// Evaluate the split policy. Selects, among thresholds whose trigger the
/// price meets, the one with the largest factor.
pub fn decide(
	policy: &SplitPolicy,
	height: Height,
	eu_per_the_price: Option<f64>,
	last_split_height: Option<Height>,
) -> SplitDecision {
	let price = match eu_per_the_price {
		Some(p) if p.is_nan() => return SplitDecision::rejected(SplitReason::NoPrice),
		Some(p) => p,
		None => return SplitDecision::rejected(SplitReason::NoPrice),
	};
	if price <= 0.0 {
		return SplitDecision::rejected(SplitReason::NonPositivePrice);
	}
	if let Some(last) = last_split_height {
		if height.saturating_sub(last) < policy.min_blocks_between_splits {
			return SplitDecision::rejected(SplitReason::MinIntervalNotMet);
		}
	}
	let winner = policy
		.thresholds
		.iter()
		.filter(|t| price >= t.trigger_eu_per_the)
		.max_by_key(|t| t.factor);
	match winner {
		Some(t) => SplitDecision {
			should_split: true,
			factor: Some(t.factor),
			reason: SplitReason::ThresholdMet,
		},
		None => SplitDecision::rejected(SplitReason::BelowThreshold),
	}
}

/// Accumulating engine state. The cumulative factor is the product of all
/// accepted split factors and never decreases.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitEngineState {
	pub last_split_height: Option<Height>,
	#[serde(with = "biguint_decimal")]
	pub cumulative_factor: BigUint,
}

impl Default for SplitEngineState {
	fn default() -> SplitEngineState {
		SplitEngineState {
			last_split_height: None,
			cumulative_factor: BigUint::from(1u32),
		}
	}
}

/// An accepted split, as appended to the chain's event log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitEvent {
	pub height: Height,
	pub factor: u32,
	#[serde(with = "biguint_decimal")]
	pub cumulative_factor: BigUint,
	pub eu_per_the_price: f64,
	pub reason: SplitReason,
}

/// State plus decision of one engine step.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitStep {
	pub state: SplitEngineState,
	pub decision: SplitDecision,
}

/// Advance the engine by one block. Rejected decisions leave the state
/// untouched (bit for bit), so replaying a below-threshold step is a
/// no-op.
pub fn step(
	policy: &SplitPolicy,
	prev: &SplitEngineState,
	height: Height,
	eu_per_the_price: Option<f64>,
) -> SplitStep {
	let decision = decide(policy, height, eu_per_the_price, prev.last_split_height);
	let state = match decision.factor {
		Some(factor) if decision.should_split => {
			debug!(
				"split accepted at height {}: factor {}, cumulative {} -> {}",
				height,
				factor,
				prev.cumulative_factor,
				&prev.cumulative_factor * factor
			);
			SplitEngineState {
				last_split_height: Some(height),
				cumulative_factor: &prev.cumulative_factor * factor,
			}
		}
		_ => prev.clone(),
	};
	SplitStep { state, decision }
}
