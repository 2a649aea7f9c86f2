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

//! Shared harness for chain integration tests.

use num_bigint::BigUint;
use thesis_chain::{BlockOpts, BlockOutcome, Chain, ConsensusEnv, Error};
use thesis_core::core::amount::Amount;
use thesis_core::core::block::{Block, BlockHeader};
use thesis_core::core::transaction::TheTx;

pub fn amt(units: u64) -> Amount {
	Amount::from_units(units)
}

pub const GENESIS_TS: i64 = 1_700_000_000;

/// Drives a chain with well-formed blocks at the target spacing.
pub struct Harness {
	pub chain: Chain,
	nonce: u64,
	ts: i64,
}

impl Harness {
	pub fn setup(env: ConsensusEnv) -> Harness {
		let _ = env_logger::try_init();
		Harness {
			chain: Chain::new(env),
			nonce: 0,
			ts: GENESIS_TS,
		}
	}

	pub fn with_default_env() -> Harness {
		Harness::setup(ConsensusEnv::default())
	}

	/// A canonical block extending the tip, one target spacing later.
	pub fn next_block(&mut self, txs: Vec<TheTx>) -> Block {
		self.nonce += 1;
		let header = BlockHeader {
			height: self.chain.head().height + 1,
			parent_hash: self.chain.head().tip_hash.clone(),
			timestamp_sec: self.ts + 240,
			nonce: BigUint::from(self.nonce),
			extra_data: None,
		};
		Block::new(header, txs)
	}

	pub fn apply_with(
		&mut self,
		txs: Vec<TheTx>,
		opts: &BlockOpts,
	) -> Result<BlockOutcome, Error> {
		let block = self.next_block(txs);
		let outcome = self.chain.process_block(&block, opts)?;
		self.ts = block.header.timestamp_sec;
		Ok(outcome)
	}

	pub fn apply(&mut self, txs: Vec<TheTx>) -> Result<BlockOutcome, Error> {
		self.apply_with(txs, &BlockOpts::default())
	}

	/// Credit an account through an internal reward block.
	pub fn fund(&mut self, address: &str, units: u64) -> BlockOutcome {
		self.apply(vec![TheTx::InternalReward {
			miner: address.to_owned(),
			amount_the: amt(units),
		}])
		.expect("funding block should apply")
	}

	pub fn balance(&self, address: &str) -> Amount {
		self.chain.head().ledger.balance_of(address)
	}
}
