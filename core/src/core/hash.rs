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

//! Hash type and the canonical header digest.
//!
//! A [`Hash`] is a hex-encoded digest carried as a string. Legacy sims feed
//! non-hex block hashes through the pipeline, so the type does not reject
//! them; consumers that need the numeric value go through
//! [`Hash::to_biguint`] and treat a failed parse as "not comparable".

use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use std::fmt;

/// Single-byte separator between the fields of the canonical header
/// preimage.
pub const HASH_FIELD_SEPARATOR: char = '|';

/// A hex-encoded digest (or a legacy opaque identifier) of a block.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Hash(String);

impl Hash {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Interpret the hash as a big-endian hex integer. `None` when the
	/// string is not valid hex (legacy sim identifiers).
	pub fn to_biguint(&self) -> Option<BigUint> {
		if self.0.is_empty() {
			return None;
		}
		BigUint::parse_bytes(self.0.as_bytes(), 16)
	}
}

impl From<String> for Hash {
	fn from(s: String) -> Hash {
		Hash(s)
	}
}

impl From<&str> for Hash {
	fn from(s: &str) -> Hash {
		Hash(s.to_owned())
	}
}

impl fmt::Display for Hash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Lowercase hex rendering of raw digest bytes.
pub fn to_hex(bytes: &[u8]) -> String {
	let mut hex = String::with_capacity(bytes.len() * 2);
	hex.extend(bytes.iter().map(|b| format!("{:02x}", b)));
	hex
}

/// SHA-256 of a canonical preimage, rendered as lowercase hex.
pub fn sha256_hex(preimage: &str) -> Hash {
	let mut hasher = Sha256::new();
	hasher.update(preimage.as_bytes());
	Hash(to_hex(&hasher.finalize()))
}
