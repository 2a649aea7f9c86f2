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

//! Blocks and block headers.
//!
//! The canonical header hash is SHA-256 over the header fields joined by a
//! single-byte separator. It must be deterministic and unambiguous: every
//! field renders in exactly one way (decimal for numbers, empty string for
//! absent parent hash and extra data).

use crate::core::amount::Height;
use crate::core::hash::{sha256_hex, Hash, HASH_FIELD_SEPARATOR};
use crate::core::transaction::TheTx;
use crate::ser::biguint_decimal;
use num_bigint::BigUint;

/// Block header, deliberately small: linkage, time, and the PoW nonce.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
	/// Height of this block since the genesis state (first block is 1).
	pub height: Height,
	/// Hash of the previous block. `None` only for the first block.
	pub parent_hash: Option<Hash>,
	/// Timestamp at which the block was built, seconds since the epoch.
	pub timestamp_sec: i64,
	/// Mining nonce. Arbitrary precision so sims can roam freely.
	#[serde(with = "biguint_decimal")]
	pub nonce: BigUint,
	/// Free-form miner data. Doubles as the miner identity fallback.
	#[serde(default)]
	pub extra_data: Option<String>,
}

impl BlockHeader {
	/// Recompute the canonical hash of this header:
	/// `sha256(parentHash | height | timestampSec | nonce | extraData)`.
	pub fn canonical_hash(&self) -> Hash {
		let parent = self
			.parent_hash
			.as_ref()
			.map(|h| h.as_str())
			.unwrap_or("");
		let extra = self.extra_data.as_ref().map(|s| s.as_str()).unwrap_or("");
		let sep = HASH_FIELD_SEPARATOR;
		let preimage = format!(
			"{}{sep}{}{sep}{}{sep}{}{sep}{}",
			parent,
			self.height,
			self.timestamp_sec,
			self.nonce.to_str_radix(10),
			extra,
			sep = sep,
		);
		sha256_hex(&preimage)
	}
}

/// Ordered transactions of a block.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlockBody {
	pub txs: Vec<TheTx>,
}

/// A full block: header, body, and the hash the miner claims.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Block {
	pub header: BlockHeader,
	pub body: BlockBody,
	pub hash: Hash,
}

impl Block {
	/// Build a block and stamp it with its canonical header hash.
	pub fn new(header: BlockHeader, txs: Vec<TheTx>) -> Block {
		let hash = header.canonical_hash();
		Block {
			header,
			body: BlockBody { txs },
			hash,
		}
	}

	/// Build a block with an explicitly claimed hash. Sims use this to
	/// exercise the hash-mismatch and PoW paths.
	pub fn with_claimed_hash(header: BlockHeader, txs: Vec<TheTx>, hash: Hash) -> Block {
		Block {
			header,
			body: BlockBody { txs },
			hash,
		}
	}
}
