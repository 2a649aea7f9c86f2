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

//! Consensus constants and the emission schedule.
//!
//! Emissions are a pure function of height. The schedule is an ordered
//! sequence of base rewards, one entry per epoch, clamped at the final
//! entry; the node share is expressed in basis points of the base reward.

use crate::core::amount::{Address, Amount, Height};

/// Target block spacing in seconds.
pub const BLOCK_TIME_SECONDS: i64 = 240;

/// Number of blocks per emission epoch.
pub const BLOCKS_PER_EPOCH: u64 = 10_080;

/// Default node-income-pool share of the base reward, in basis points.
/// Zero for now: the pool is fee-funded in later phases.
pub const DEFAULT_NIP_SHARE_BASIS_POINTS: u32 = 0;

/// Upper bound on how far a block timestamp may run ahead of local time.
pub const MAX_FUTURE_DRIFT_SEC: i64 = 3_600;

lazy_static! {
	/// Well-known identifier of the Node Income Pool pseudo-account. The
	/// engine only ever reads this through the per-call environment, so a
	/// deployment can move the pool without touching consensus code.
	pub static ref NIP_ADDRESS: Address = "the1nodeincomepool".to_string();
}

/// Emission schedule failures.
#[derive(Debug, Clone, Eq, PartialEq, Fail)]
pub enum Error {
	/// Emissions are defined for heights ≥ 1 only.
	#[fail(display = "no emission defined at height {}", height)]
	InvalidHeight { height: Height },
	/// A schedule with no epochs cannot emit anything.
	#[fail(display = "emission schedule is empty")]
	EmptySchedule,
}

impl Error {
	pub fn code(&self) -> &'static str {
		match self {
			Error::InvalidHeight { .. } => "INVALID_HEIGHT",
			Error::EmptySchedule => "EMPTY_SCHEDULE",
		}
	}
}

/// Per-epoch base rewards plus the node-pool share.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionSchedule {
	/// Base miner reward per epoch, in atomic THE units.
	pub base_rewards_the: Vec<u64>,
	pub blocks_per_epoch: u64,
	pub nip_share_basis_points: u32,
}

impl Default for EmissionSchedule {
	fn default() -> EmissionSchedule {
		EmissionSchedule {
			base_rewards_the: vec![10, 20, 40],
			blocks_per_epoch: BLOCKS_PER_EPOCH,
			nip_share_basis_points: DEFAULT_NIP_SHARE_BASIS_POINTS,
		}
	}
}

/// The reward breakdown of a single block.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emission {
	#[serde(rename = "minerRewardTHE")]
	pub miner_reward_the: Amount,
	#[serde(rename = "nipRewardTHE")]
	pub nip_reward_the: Amount,
	#[serde(rename = "totalRewardTHE")]
	pub total_reward_the: Amount,
	pub epoch_index: usize,
}

impl EmissionSchedule {
	/// The emission due at `height`. Heights start at 1; the epoch index
	/// clamps at the last configured entry.
	pub fn emission_at_height(&self, height: Height) -> Result<Emission, Error> {
		if height == 0 {
			return Err(Error::InvalidHeight { height });
		}
		if self.base_rewards_the.is_empty() {
			return Err(Error::EmptySchedule);
		}
		let blocks_per_epoch = if self.blocks_per_epoch == 0 {
			BLOCKS_PER_EPOCH
		} else {
			self.blocks_per_epoch
		};
		let raw_epoch = (height - 1) / blocks_per_epoch;
		let epoch_index = (raw_epoch as usize).min(self.base_rewards_the.len() - 1);

		let base = Amount::from_units(self.base_rewards_the[epoch_index]);
		// shares above 100% clamp to the full base reward
		let nip = base.basis_points(self.nip_share_basis_points.min(10_000));
		let miner = base
			.checked_sub(&nip)
			.expect("nip share is bounded by the base reward");
		Ok(Emission {
			total_reward_the: base,
			miner_reward_the: miner,
			nip_reward_the: nip,
			epoch_index,
		})
	}
}
