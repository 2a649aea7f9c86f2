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

//! The chain facade: owns the tip state and drives the pipeline.
//!
//! A `Chain` value is the unit of concurrency: one chain is owned
//! exclusively while a block applies, and replay tooling runs many chains
//! in parallel over disjoint states. The facade swaps in the returned
//! state only on success, so a rejected block leaves the tip untouched.

use crate::backwall::{self, BackWallEvent};
use crate::core::core::block::Block;
use crate::error::Error;
use crate::pipe;
use crate::shadow::{self, EuShadowReport, ShadowContext};
use crate::types::{BlockOpts, BlockOutcome, ChainState, ConsensusEnv};

/// A chain tip plus its parameter registry.
#[derive(Clone, Debug)]
pub struct Chain {
	env: ConsensusEnv,
	head: ChainState,
}

impl Chain {
	/// A fresh chain at the genesis state.
	pub fn new(env: ConsensusEnv) -> Chain {
		let head = ChainState::genesis(&env);
		Chain { env, head }
	}

	/// Resume a chain from a persisted state.
	pub fn from_state(env: ConsensusEnv, head: ChainState) -> Chain {
		Chain { env, head }
	}

	pub fn env(&self) -> &ConsensusEnv {
		&self.env
	}

	pub fn head(&self) -> &ChainState {
		&self.head
	}

	/// Apply a block on the tip. On success the tip advances; on failure
	/// it is untouched.
	pub fn process_block(&mut self, block: &Block, opts: &BlockOpts) -> Result<BlockOutcome, Error> {
		let outcome = pipe::process_block(&self.env, &self.head, block, opts)?;
		self.head = outcome.state.clone();
		Ok(outcome)
	}

	/// Classify the tip's total supply against the configured floors.
	pub fn check_back_wall(&self) -> BackWallEvent {
		backwall::check_back_wall(&self.head, &self.env.backwall)
	}

	/// Run the EU-atomic shadow check over the tip state.
	pub fn run_eu_shadow_check(&self) -> Result<EuShadowReport, Error> {
		shadow::run_eu_atomic_shadow_check(
			&self.head.ledger,
			&self.env.policy,
			&ShadowContext {
				height: self.head.height,
			},
		)
	}
}
