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

//! Shared helpers for core integration tests.

use num_bigint::BigUint;
use thesis_core::core::amount::Amount;
use thesis_core::core::block::{Block, BlockHeader};
use thesis_core::core::hash::Hash;
use thesis_core::core::transaction::TheTx;

pub fn amt(units: u64) -> Amount {
	Amount::from_units(units)
}

pub fn header(height: u64, parent: Option<Hash>, ts: i64, nonce: u64) -> BlockHeader {
	BlockHeader {
		height,
		parent_hash: parent,
		timestamp_sec: ts,
		nonce: BigUint::from(nonce),
		extra_data: None,
	}
}

pub fn block(height: u64, parent: Option<Hash>, ts: i64, nonce: u64, txs: Vec<TheTx>) -> Block {
	Block::new(header(height, parent, ts, nonce), txs)
}
