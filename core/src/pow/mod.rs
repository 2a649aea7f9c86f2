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

//! Proof-of-work target comparison and the difficulty governor.
//!
//! The governor evolves an integer target from observed block spacing. Two
//! governors exist: the simple ±1/32 step and a windowed average form. A
//! deployment picks exactly one via [`DifficultyParams::governor`]; the
//! simple governor is the canonical default. All decisions are made in
//! integer arithmetic; the float ratio in [`DifficultyStep`] is for
//! observability only.

use crate::consensus::BLOCK_TIME_SECONDS;
use crate::core::hash::Hash;
use crate::ser::biguint_decimal;
use num::{One, Zero};
use num_bigint::BigUint;

lazy_static! {
	/// The easiest possible target: every 256-bit hash passes.
	pub static ref MAX_TARGET: BigUint =
		BigUint::parse_bytes(&[b'f'; 64], 16).expect("static hex literal");
}

/// PoW failures.
#[derive(Debug, Clone, Eq, PartialEq, Fail)]
pub enum Error {
	#[fail(display = "hash {} above target {}", hash, target)]
	Insufficient { hash: String, target: String },
}

impl Error {
	pub fn code(&self) -> &'static str {
		match self {
			Error::Insufficient { .. } => "POW_INSUFFICIENT",
		}
	}
}

/// Check a block hash against the difficulty target. Hashes that do not
/// parse as hex pass through untouched; legacy sims use opaque identifiers
/// and only ever run with PoW enforcement off the hot path.
pub fn ensure_pow_meets_target(hash: &Hash, target: &BigUint) -> Result<(), Error> {
	if let Some(value) = hash.to_biguint() {
		if value > *target {
			return Err(Error::Insufficient {
				hash: hash.as_str().to_owned(),
				target: target.to_str_radix(16),
			});
		}
	}
	Ok(())
}

/// A hash that deterministically satisfies `target` without mining:
/// `target − 1` rendered as hex (zero for the degenerate target).
pub fn make_synthetic_valid_hash(target: &BigUint) -> Hash {
	let value = if target.is_zero() {
		BigUint::zero()
	} else {
		target - BigUint::one()
	};
	Hash::from(value.to_str_radix(16))
}

/// Which governor a deployment runs. Exactly one; mixing forms across nodes
/// forks the chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GovernorKind {
	/// ±1/32 step against a 5% tolerance band.
	Simple,
	/// Integer average spacing over the last `window` blocks.
	Windowed { window: usize },
}

/// Difficulty governor parameters.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyParams {
	/// Desired seconds between blocks.
	pub target_spacing: i64,
	/// Windowed governor: max one-step ease factor.
	pub max_adjust_up: u32,
	/// Windowed governor: max one-step hardening factor.
	pub max_adjust_down: u32,
	/// Spacings above `target_spacing * safe_mode_multiple` freeze the
	/// target instead of adjusting it.
	pub safe_mode_multiple: i64,
	pub governor: GovernorKind,
	/// Target installed at genesis.
	#[serde(with = "biguint_decimal")]
	pub initial_target: BigUint,
}

impl Default for DifficultyParams {
	fn default() -> DifficultyParams {
		DifficultyParams {
			target_spacing: BLOCK_TIME_SECONDS,
			max_adjust_up: 4,
			max_adjust_down: 4,
			safe_mode_multiple: 10,
			governor: GovernorKind::Simple,
			initial_target: MAX_TARGET.clone(),
		}
	}
}

/// Evolving difficulty state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyState {
	#[serde(with = "biguint_decimal")]
	pub target: BigUint,
	/// Timestamp of the last applied block; zero when none seen yet.
	pub last_timestamp_sec: i64,
}

impl DifficultyState {
	pub fn initial(params: &DifficultyParams) -> DifficultyState {
		DifficultyState {
			target: params.initial_target.clone(),
			last_timestamp_sec: 0,
		}
	}
}

/// Observability label of a governor step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpacingLabel {
	TooFast,
	TooSlow,
	OnTarget,
	SafeMode,
}

/// Result of one governor step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStep {
	pub next: DifficultyState,
	pub delta_sec: i64,
	/// Observed spacing over target spacing. Never used in decisions.
	pub adjustment_ratio: f64,
	pub label: SpacingLabel,
}

fn frozen(prev: &DifficultyState, ts_now: i64, delta_sec: i64) -> DifficultyStep {
	trace!("difficulty safe mode: delta {}s, target frozen", delta_sec);
	DifficultyStep {
		next: DifficultyState {
			target: prev.target.clone(),
			last_timestamp_sec: ts_now,
		},
		delta_sec,
		adjustment_ratio: 0.0,
		label: SpacingLabel::SafeMode,
	}
}

fn clamp_min_one(target: BigUint) -> BigUint {
	if target.is_zero() {
		BigUint::one()
	} else {
		target
	}
}

/// One step of the simple governor.
///
/// `prev_ts` is the timestamp of the parent block when the caller knows it;
/// otherwise the spacing falls back to the governor's own last timestamp.
/// Unknown spacing, non-positive spacing, and absurd spacing (beyond
/// `safe_mode_multiple` targets) freeze the target and label the step
/// `SAFE_MODE`.
pub fn step(
	params: &DifficultyParams,
	prev: &DifficultyState,
	ts_now: i64,
	prev_ts: Option<i64>,
) -> DifficultyStep {
	let anchor = match prev_ts {
		Some(ts) => Some(ts),
		None if prev.last_timestamp_sec > 0 => Some(prev.last_timestamp_sec),
		None => None,
	};
	let anchor = match anchor {
		Some(ts) => ts,
		None => return frozen(prev, ts_now, 0),
	};

	let delta = ts_now - anchor;
	if delta <= 0 || delta > params.target_spacing.saturating_mul(params.safe_mode_multiple) {
		return frozen(prev, ts_now, delta);
	}
	let delta = delta.max(1);

	// 5% band, decided in integers: delta/spacing > 1.05 eases, < 0.95
	// hardens.
	let spacing = params.target_spacing;
	let (target, label) = if delta * 100 > spacing * 105 {
		(
			&prev.target + &prev.target / BigUint::from(32u32),
			SpacingLabel::TooSlow,
		)
	} else if delta * 100 < spacing * 95 {
		// target/32 never exceeds target, so this cannot underflow
		(
			&prev.target - &prev.target / BigUint::from(32u32),
			SpacingLabel::TooFast,
		)
	} else {
		(prev.target.clone(), SpacingLabel::OnTarget)
	};

	DifficultyStep {
		next: DifficultyState {
			target: clamp_min_one(target),
			last_timestamp_sec: ts_now,
		},
		delta_sec: delta,
		adjustment_ratio: delta as f64 / spacing as f64,
		label,
	}
}

/// One step of the windowed governor over recent block spacings.
///
/// The integer average spacing clamps into
/// `[target_spacing / max_adjust_up, target_spacing * max_adjust_down]`
/// before scaling the target proportionally.
pub fn step_windowed(
	params: &DifficultyParams,
	prev: &DifficultyState,
	ts_now: i64,
	spacings: &[i64],
) -> DifficultyStep {
	if spacings.is_empty() {
		return frozen(prev, ts_now, 0);
	}
	let sum: i64 = spacings.iter().sum();
	let avg = sum / spacings.len() as i64;
	if avg <= 0 || avg > params.target_spacing.saturating_mul(params.safe_mode_multiple) {
		return frozen(prev, ts_now, avg);
	}

	let spacing = params.target_spacing;
	let floor = (spacing / params.max_adjust_up.max(1) as i64).max(1);
	let ceil = spacing.saturating_mul(params.max_adjust_down.max(1) as i64);
	let clamped = avg.max(floor).min(ceil);

	let target = &prev.target * BigUint::from(clamped as u64) / BigUint::from(spacing as u64);
	let label = if clamped * 100 > spacing * 105 {
		SpacingLabel::TooSlow
	} else if clamped * 100 < spacing * 95 {
		SpacingLabel::TooFast
	} else {
		SpacingLabel::OnTarget
	};

	DifficultyStep {
		next: DifficultyState {
			target: clamp_min_one(target),
			last_timestamp_sec: ts_now,
		},
		delta_sec: avg,
		adjustment_ratio: clamped as f64 / spacing as f64,
		label,
	}
}
