// Copyright 2025 The Thesis Developers
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

//! The back wall: an observational classification of total supply against
//! configured floors. Never mutates state, never fails, never affects
//! block acceptance.

use crate::core::core::amount::{Amount, Height};
use crate::types::{BackWallGuards, ChainState};

/// How the post-state total sits against the floors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackWallKind {
	Ok,
	SoftFloorWarn,
	HardFloorBreach,
}

/// One observation of the supply floor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackWallEvent {
	pub height: Height,
	#[serde(rename = "totalAccountTHE")]
	pub total_account_the: Amount,
	#[serde(rename = "totalVaultTHE")]
	pub total_vault_the: Amount,
	#[serde(rename = "totalTHE")]
	pub total_the: Amount,
	pub kind: BackWallKind,
}

/// Classify the chain's total supply against the guards.
pub fn check_back_wall(state: &ChainState, guards: &BackWallGuards) -> BackWallEvent {
	let total_account_the = state.ledger.total_account_the();
	let total_vault_the = state.ledger.total_vault_the();
	let total_the = &total_account_the + &total_vault_the;

	let kind = if total_the < guards.hard_floor_the {
		BackWallKind::HardFloorBreach
	} else if total_the < guards.soft_floor_the {
		BackWallKind::SoftFloorWarn
	} else {
		BackWallKind::Ok
	};

	if kind != BackWallKind::Ok {
		warn!(
			"back wall {:?} at height {}: total {} (soft {}, hard {})",
			kind, state.height, total_the, guards.soft_floor_the, guards.hard_floor_the
		);
	}

	BackWallEvent {
		height: state.height,
		total_account_the,
		total_vault_the,
		total_the,
		kind,
	}
}
