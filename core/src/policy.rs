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

//! The atomic coin policy: every amount stored or moved must be an exact
//! non-negative multiple of a configured atomic unit, optionally capped by a
//! total-supply ceiling. The policy is injected per call and never global.

use crate::core::amount::Amount;
use num_bigint::{BigInt, Sign};

/// Violations of the atomic coin policy. Each variant carries the values
/// needed to reproduce the failure at the boundary.
#[derive(Debug, Clone, Eq, PartialEq, Fail)]
pub enum Error {
	/// Raw value below zero.
	#[fail(display = "negative amount {}", value)]
	Negative {
		/// The offending raw value, base-10.
		value: String,
	},
	/// Value is not a multiple of the atomic unit.
	#[fail(display = "amount {} is not a multiple of atomic unit {}", value, atomic_unit)]
	NonAtomic {
		value: String,
		atomic_unit: String,
	},
	/// A configured supply cap would be exceeded.
	#[fail(display = "amount {} exceeds max supply {}", value, max_supply)]
	OverMaxSupply {
		value: String,
		max_supply: String,
	},
	/// The policy itself is misconfigured: the atomic unit must be positive.
	#[fail(display = "atomic unit must be positive, got {}", atomic_unit)]
	InvalidAtomicUnit { atomic_unit: String },
}

impl Error {
	/// Stable kind string for the boundary error taxonomy.
	pub fn code(&self) -> &'static str {
		match self {
			Error::Negative { .. } => "NEGATIVE",
			Error::NonAtomic { .. } => "NON_ATOMIC",
			Error::OverMaxSupply { .. } => "OVER_MAX_SUPPLY",
			Error::InvalidAtomicUnit { .. } => "INVALID_ATOMIC_UNIT",
		}
	}
}

/// Global constraint on monetary amounts. Default policy: unit 1, no cap.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomicCoinPolicy {
	/// The quantum every amount must divide by. Must be positive.
	pub atomic_unit: Amount,
	/// Optional ceiling on the total THE in circulation.
	#[serde(default)]
	pub max_supply: Option<Amount>,
}

impl Default for AtomicCoinPolicy {
	fn default() -> AtomicCoinPolicy {
		AtomicCoinPolicy {
			atomic_unit: Amount::from_units(1),
			max_supply: None,
		}
	}
}

impl AtomicCoinPolicy {
	pub fn new(atomic_unit: Amount, max_supply: Option<Amount>) -> Result<AtomicCoinPolicy, Error> {
		if atomic_unit.is_zero() {
			return Err(Error::InvalidAtomicUnit {
				atomic_unit: atomic_unit.to_decimal(),
			});
		}
		Ok(AtomicCoinPolicy {
			atomic_unit,
			max_supply,
		})
	}

	fn ensure_unit(&self) -> Result<(), Error> {
		if self.atomic_unit.is_zero() {
			return Err(Error::InvalidAtomicUnit {
				atomic_unit: self.atomic_unit.to_decimal(),
			});
		}
		Ok(())
	}

	/// Validate a raw (possibly signed) value and convert it to an
	/// [`Amount`]. Raw values arrive signed from oracle adapters and sims.
	pub fn validate(&self, raw: &BigInt) -> Result<Amount, Error> {
		self.ensure_unit()?;
		if raw.sign() == Sign::Minus {
			return Err(Error::Negative {
				value: raw.to_str_radix(10),
			});
		}
		// to_biguint cannot fail once the sign is known non-negative
		let amount = Amount::from(raw.to_biguint().ok_or_else(|| Error::Negative {
			value: raw.to_str_radix(10),
		})?);
		self.validate_amount(&amount)?;
		Ok(amount)
	}

	/// Validate an already non-negative amount against the unit and cap.
	pub fn validate_amount(&self, amount: &Amount) -> Result<(), Error> {
		self.ensure_unit()?;
		if !amount.is_multiple_of(&self.atomic_unit) {
			return Err(Error::NonAtomic {
				value: amount.to_decimal(),
				atomic_unit: self.atomic_unit.to_decimal(),
			});
		}
		if let Some(cap) = &self.max_supply {
			if amount > cap {
				return Err(Error::OverMaxSupply {
					value: amount.to_decimal(),
					max_supply: cap.to_decimal(),
				});
			}
		}
		Ok(())
	}

	/// Split a raw value into the largest valid quantized amount and the
	/// remainder: `raw = q + r`, with `q` a multiple of the unit.
	pub fn quantize(&self, raw: &BigInt) -> Result<(Amount, Amount), Error> {
		self.ensure_unit()?;
		if raw.sign() == Sign::Minus {
			return Err(Error::Negative {
				value: raw.to_str_radix(10),
			});
		}
		let value = Amount::from(raw.to_biguint().ok_or_else(|| Error::Negative {
			value: raw.to_str_radix(10),
		})?);
		let r = value.rem(&self.atomic_unit);
		let q = value
			.checked_sub(&r)
			.expect("remainder never exceeds the value");
		Ok((q, r))
	}

	/// Check a projected circulating total against the configured cap.
	pub fn check_supply(&self, total: &Amount) -> Result<(), Error> {
		if let Some(cap) = &self.max_supply {
			if total > cap {
				return Err(Error::OverMaxSupply {
					value: total.to_decimal(),
					max_supply: cap.to_decimal(),
				});
			}
		}
		Ok(())
	}
}
