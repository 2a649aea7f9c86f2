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

//! Chain state and the per-call consensus environment.
//!
//! Nothing in the engine is global: every parameter, flag and well-known
//! identifier travels in a [`ConsensusEnv`] value. This is the read side of
//! the parameter registry; proposal and approval of new values happen
//! outside the core.

use crate::core::consensus::{self, Emission, EmissionSchedule};
use crate::core::core::amount::{Address, Amount, Height};
use crate::core::core::block::Block;
use crate::core::core::hash::Hash;
use crate::core::core::ledger::LedgerState;
use crate::core::policy::AtomicCoinPolicy;
use crate::core::pow::{DifficultyParams, DifficultyState, SpacingLabel};
use crate::core::split::{SplitEngineState, SplitEvent, SplitPolicy, SplitStep};
use crate::snapshot::{EuRegistryDelta, LedgerDelta};
use chrono::Utc;

/// Feature flags of the deployment. The canonical path today runs splits in
/// shadow and leaves PoW enforcement to mining deployments.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
	pub pow_enforcement: bool,
	/// Enforced splits: accepted splits rescale every account and vault
	/// balance at the accepted height.
	pub enable_consensus_splits: bool,
	/// Shadow splits: accepted splits emit events only.
	pub enable_split_shadow_mode: bool,
}

impl Default for FeatureFlags {
	fn default() -> FeatureFlags {
		FeatureFlags {
			pow_enforcement: false,
			enable_consensus_splits: false,
			enable_split_shadow_mode: true,
		}
	}
}

/// Observational supply floors for the back wall.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackWallGuards {
	#[serde(rename = "softFloorTHE")]
	pub soft_floor_the: Amount,
	#[serde(rename = "hardFloorTHE")]
	pub hard_floor_the: Amount,
}

/// How vault deposits and withdrawals couple to account balances. The
/// account side is deliberately unresolved in the canonical path; a later
/// integration adds a funded variant that moves THE atomically between the
/// owner account and the vault.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VaultFunding {
	/// Vault balance changes stand alone; no account is debited or
	/// credited.
	Unfunded,
}

impl Default for VaultFunding {
	fn default() -> VaultFunding {
		VaultFunding::Unfunded
	}
}

/// The injected parameter registry, read side. One value per call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusEnv {
	pub policy: AtomicCoinPolicy,
	pub emission: EmissionSchedule,
	pub difficulty: DifficultyParams,
	pub split: SplitPolicy,
	pub flags: FeatureFlags,
	/// Well-known pseudo-account receiving the node share of emissions.
	pub nip_address: Address,
	pub max_future_drift_sec: i64,
	pub backwall: BackWallGuards,
	pub vault_funding: VaultFunding,
}

impl Default for ConsensusEnv {
	fn default() -> ConsensusEnv {
		ConsensusEnv {
			policy: AtomicCoinPolicy::default(),
			emission: EmissionSchedule::default(),
			difficulty: DifficultyParams::default(),
			split: SplitPolicy::default(),
			flags: FeatureFlags::default(),
			nip_address: consensus::NIP_ADDRESS.clone(),
			max_future_drift_sec: consensus::MAX_FUTURE_DRIFT_SEC,
			backwall: BackWallGuards::default(),
			vault_funding: VaultFunding::default(),
		}
	}
}

/// Caller-supplied context of one block application.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockOpts {
	/// Local wall-clock seconds; bounds future drift when present.
	pub now_sec: Option<i64>,
	/// Externally observed EU/THE price at this height.
	pub eu_per_the_price: Option<f64>,
	/// Winning miner. Falls back to the header's extra data, then to the
	/// node income pool.
	pub miner: Option<Address>,
	/// Recent block spacings, newest last. Only the windowed governor
	/// reads these.
	pub recent_spacings: Vec<i64>,
	/// Run the EU-atomic shadow check over the post-state and fail the
	/// block on violation. Advisory deployments leave this off.
	pub run_shadow_checks: bool,
}

/// A chain tip and everything needed to extend it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainState {
	pub height: Height,
	pub tip_hash: Option<Hash>,
	#[serde(default)]
	pub tip_block: Option<Block>,
	pub ledger: LedgerState,
	pub split_engine_state: SplitEngineState,
	pub difficulty: DifficultyState,
	pub split_events: Vec<SplitEvent>,
}

impl ChainState {
	/// The empty state before any block: height 0, no tip, empty ledger.
	pub fn genesis(env: &ConsensusEnv) -> ChainState {
		ChainState {
			height: 0,
			tip_hash: None,
			tip_block: None,
			ledger: LedgerState::genesis(),
			split_engine_state: SplitEngineState::default(),
			difficulty: DifficultyState::initial(&env.difficulty),
			split_events: vec![],
		}
	}
}

/// Per-block summary record for auditors.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusDelta {
	pub height: Height,
	pub hash: Hash,
	pub parent_hash: Option<Hash>,
	pub timestamp_sec: i64,
	pub emission: Emission,
	pub difficulty_before: DifficultyState,
	pub difficulty_after: DifficultyState,
	pub difficulty_label: SpacingLabel,
	pub split_before: SplitEngineState,
	pub split_after: SplitEngineState,
	pub split_event: Option<SplitEvent>,
	pub pow_enforced: bool,
	pub ledger_delta: LedgerDelta,
	pub eu_registry_delta: EuRegistryDelta,
}

/// Everything produced by one successful block application.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockOutcome {
	pub state: ChainState,
	pub emission: Emission,
	/// Split engine step, shadow or enforced.
	pub split_info: SplitStep,
	pub delta: ConsensusDelta,
}

/// Wall-clock seconds for callers assembling [`BlockOpts`]. The engine
/// itself never reads the clock.
pub fn now_sec() -> i64 {
	Utc::now().timestamp()
}
