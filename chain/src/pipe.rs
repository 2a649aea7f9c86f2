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

//! The block application pipeline.
//!
//! `process_block` is a pure function of `(env, prev, block, opts)`: it
//! validates linkage, time and proof-of-work, folds the VM over the block
//! body on a working copy of the ledger, applies emissions, steps the
//! difficulty governor and the split engine, and assembles the next chain
//! state together with its consensus delta. A failure at any step leaves
//! the previous state untouched.

use crate::core::core::amount::{Address, Amount};
use crate::core::core::block::Block;
use crate::core::core::ledger::LedgerState;
use crate::core::pow::{self, GovernorKind};
use crate::core::split::{self, SplitEvent, SplitReason};
use crate::error::{Error, ErrorKind};
use crate::shadow::{self, ShadowContext};
use crate::snapshot;
use crate::types::{BlockOpts, BlockOutcome, ChainState, ConsensusDelta, ConsensusEnv};
use crate::vm;

// The miner identity is not part of the header proper: the caller names the
// winner, the header's extra data is the fallback, and an unclaimed block
// pays the node income pool.
fn resolve_miner(env: &ConsensusEnv, block: &Block, opts: &BlockOpts) -> Address {
	if let Some(miner) = &opts.miner {
		return miner.clone();
	}
	if let Some(extra) = &block.header.extra_data {
		if !extra.is_empty() {
			return extra.clone();
		}
	}
	env.nip_address.clone()
}

fn validate_linkage(prev: &ChainState, block: &Block) -> Result<(), Error> {
	let expected = prev.height + 1;
	if block.header.height != expected {
		return Err(ErrorKind::UnexpectedHeight {
			expected,
			got: block.header.height,
		}
		.into());
	}
	if let Some(tip) = &prev.tip_hash {
		let matches = block
			.header
			.parent_hash
			.as_ref()
			.map(|p| p == tip)
			.unwrap_or(false);
		if !matches {
			return Err(ErrorKind::ParentMismatch {
				expected: tip.to_string(),
				got: block
					.header
					.parent_hash
					.as_ref()
					.map(|h| h.to_string())
					.unwrap_or_else(|| "null".to_string()),
			}
			.into());
		}
	}
	Ok(())
}

fn validate_timestamp(
	env: &ConsensusEnv,
	prev: &ChainState,
	block: &Block,
	opts: &BlockOpts,
) -> Result<(), Error> {
	if let Some(tip_block) = &prev.tip_block {
		if block.header.timestamp_sec < tip_block.header.timestamp_sec {
			return Err(ErrorKind::NonMonotonicTimestamp {
				prev: tip_block.header.timestamp_sec,
				got: block.header.timestamp_sec,
			}
			.into());
		}
	}
	if let Some(now) = opts.now_sec {
		if block.header.timestamp_sec > now + env.max_future_drift_sec {
			return Err(ErrorKind::FutureDrift {
				timestamp: block.header.timestamp_sec,
				now,
				max_drift: env.max_future_drift_sec,
			}
			.into());
		}
	}
	Ok(())
}

fn validate_header_hash(block: &Block) -> Result<(), Error> {
	let recomputed = block.header.canonical_hash();
	if recomputed != block.hash {
		return Err(ErrorKind::HashMismatch {
			expected: recomputed.to_string(),
			got: block.hash.to_string(),
		}
		.into());
	}
	Ok(())
}

fn step_difficulty(
	env: &ConsensusEnv,
	prev: &ChainState,
	block: &Block,
	opts: &BlockOpts,
) -> pow::DifficultyStep {
	let ts = block.header.timestamp_sec;
	let prev_ts = prev.tip_block.as_ref().map(|b| b.header.timestamp_sec);
	match env.difficulty.governor {
		GovernorKind::Simple => pow::step(&env.difficulty, &prev.difficulty, ts, prev_ts),
		GovernorKind::Windowed { window } => {
			// Window metadata comes from the caller; with none we fall
			// back to the single observed spacing.
			let mut spacings = opts.recent_spacings.clone();
			if spacings.is_empty() {
				if let Some(pts) = prev_ts {
					spacings.push(ts - pts);
				}
			}
			let start = spacings.len().saturating_sub(window.max(1));
			pow::step_windowed(&env.difficulty, &prev.difficulty, ts, &spacings[start..])
		}
	}
}

// Rescale every account and vault balance. Only called on an accepted
// split in enforced mode; certificate values are issuance-time constants
// and stay put.
fn scale_balances(ledger: &mut LedgerState, factor: u32) {
	for account in ledger.chain.accounts.values_mut() {
		account.balance_the = account.balance_the.scale(factor);
	}
	for vault in ledger.chain.vaults.values_mut() {
		vault.balance_the = vault.balance_the.scale(factor);
	}
}

/// Validate and apply one block on top of `prev`, producing the next chain
/// state, the block's emission, the split step and the consensus delta.
pub fn process_block(
	env: &ConsensusEnv,
	prev: &ChainState,
	block: &Block,
	opts: &BlockOpts,
) -> Result<BlockOutcome, Error> {
	validate_linkage(prev, block)?;
	validate_timestamp(env, prev, block, opts)?;
	validate_header_hash(block)?;
	if env.flags.pow_enforcement {
		pow::ensure_pow_meets_target(&block.hash, &prev.difficulty.target)?;
	}

	let height = block.header.height;

	// Everything below mutates a working copy only.
	let mut ledger = prev.ledger.clone();
	for tx in &block.body.txs {
		vm::apply_block_tx(&mut ledger, tx, env, height)?;
	}

	let emission = env.emission.emission_at_height(height)?;
	let miner = resolve_miner(env, block, opts);
	credit_emission(env, &mut ledger, &miner, &emission.miner_reward_the)?;
	credit_emission(env, &mut ledger, &env.nip_address, &emission.nip_reward_the)?;

	// Cross-layer invariants hold at every block boundary.
	ledger.assert_invariants(&env.policy)?;

	let diff_step = step_difficulty(env, prev, block, opts);

	let split_step = split::step(
		&env.split,
		&prev.split_engine_state,
		height,
		opts.eu_per_the_price,
	);
	let mut split_events = prev.split_events.clone();
	let mut split_event = None;
	if let (true, Some(factor)) = (split_step.decision.should_split, split_step.decision.factor) {
		if env.flags.enable_consensus_splits {
			debug!("enforced split x{} at height {}", factor, height);
			scale_balances(&mut ledger, factor);
		} else if env.flags.enable_split_shadow_mode {
			debug!("shadow split x{} at height {}", factor, height);
		}
		let event = SplitEvent {
			height,
			factor,
			cumulative_factor: split_step.state.cumulative_factor.clone(),
			eu_per_the_price: opts.eu_per_the_price.unwrap_or(0.0),
			reason: SplitReason::ThresholdMet,
		};
		split_events.push(event.clone());
		split_event = Some(event);
	}

	ledger.chain.height = height;
	ledger.chain.last_block_hash = Some(block.hash.clone());

	let next = ChainState {
		height,
		tip_hash: Some(block.hash.clone()),
		tip_block: Some(block.clone()),
		ledger,
		split_engine_state: split_step.state.clone(),
		difficulty: diff_step.next.clone(),
		split_events,
	};

	if opts.run_shadow_checks {
		shadow::run_eu_atomic_shadow_check(
			&next.ledger,
			&env.policy,
			&ShadowContext { height },
		)?;
	}

	let before = snapshot::snapshot(&prev.ledger);
	let after = snapshot::snapshot(&next.ledger);
	let (ledger_delta, eu_registry_delta) = snapshot::compute_delta(&before, &after);
	let delta = ConsensusDelta {
		height,
		hash: block.hash.clone(),
		parent_hash: block.header.parent_hash.clone(),
		timestamp_sec: block.header.timestamp_sec,
		emission: emission.clone(),
		difficulty_before: prev.difficulty.clone(),
		difficulty_after: diff_step.next.clone(),
		difficulty_label: diff_step.label,
		split_before: prev.split_engine_state.clone(),
		split_after: split_step.state.clone(),
		split_event,
		pow_enforced: env.flags.pow_enforcement,
		ledger_delta,
		eu_registry_delta,
	};

	debug!(
		"applied block {} at height {} ({} txs, emission {})",
		block.hash,
		height,
		block.body.txs.len(),
		emission.total_reward_the
	);

	Ok(BlockOutcome {
		state: next,
		emission,
		split_info: split_step,
		delta,
	})
}

// Zero credits are skipped so a disabled pool share never materializes a
// phantom account.
fn credit_emission(
	env: &ConsensusEnv,
	ledger: &mut LedgerState,
	address: &str,
	amount: &Amount,
) -> Result<(), Error> {
	if amount.is_zero() {
		return Ok(());
	}
	if env.policy.max_supply.is_some() {
		let projected = &ledger.total_the() + amount;
		env.policy.check_supply(&projected)?;
	}
	ledger.credit(address, amount);
	Ok(())
}
