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

//! Monetary primitives. Every THE amount on the chain is an arbitrary
//! precision non-negative integer denominated in atomic units; all monetary
//! arithmetic goes through [`Amount`] so no floating point can leak in.

use num::Zero;
use num_bigint::BigUint;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// An on-chain address. Opaque to the consensus core.
pub type Address = String;

/// Identifier of a vault.
pub type VaultId = String;

/// Identifier of an EU certificate.
pub type CertId = String;

/// Block height since genesis (genesis itself is height 0).
pub type Height = u64;

/// A quantity of THE in atomic units. Non-negative by construction.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Amount(BigUint);

impl Amount {
	/// The zero amount.
	pub fn zero() -> Amount {
		Amount(BigUint::zero())
	}

	/// Amount from a small number of atomic units.
	pub fn from_units(units: u64) -> Amount {
		Amount(BigUint::from(units))
	}

	/// Parse a base-10 string. Rejects signs, whitespace and empty input,
	/// so a negative wire value can never round into an `Amount`.
	pub fn from_decimal(s: &str) -> Option<Amount> {
		if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}
		BigUint::parse_bytes(s.as_bytes(), 10).map(Amount)
	}

	/// Base-10 rendering, the canonical wire form.
	pub fn to_decimal(&self) -> String {
		self.0.to_str_radix(10)
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	/// Subtraction that refuses to go below zero.
	pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
		if self.0 < other.0 {
			None
		} else {
			Some(Amount(&self.0 - &other.0))
		}
	}

	/// Remainder against a quantization unit. The unit must be non-zero.
	pub fn rem(&self, unit: &Amount) -> Amount {
		Amount(&self.0 % &unit.0)
	}

	/// True when the amount is an exact multiple of `unit`.
	pub fn is_multiple_of(&self, unit: &Amount) -> bool {
		!unit.is_zero() && self.rem(unit).is_zero()
	}

	/// Multiply by a small scalar. Used by the enforced split rescaling.
	pub fn scale(&self, factor: u32) -> Amount {
		Amount(&self.0 * factor)
	}

	/// Share of the amount expressed in basis points, rounded down.
	pub fn basis_points(&self, bps: u32) -> Amount {
		Amount((&self.0 * bps) / BigUint::from(10_000u32))
	}

	pub fn as_biguint(&self) -> &BigUint {
		&self.0
	}

	pub fn into_biguint(self) -> BigUint {
		self.0
	}
}

impl From<BigUint> for Amount {
	fn from(n: BigUint) -> Amount {
		Amount(n)
	}
}

impl From<u64> for Amount {
	fn from(n: u64) -> Amount {
		Amount::from_units(n)
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_decimal())
	}
}

impl<'a, 'b> Add<&'b Amount> for &'a Amount {
	type Output = Amount;

	fn add(self, other: &'b Amount) -> Amount {
		Amount(&self.0 + &other.0)
	}
}

impl Add for Amount {
	type Output = Amount;

	fn add(self, other: Amount) -> Amount {
		Amount(self.0 + other.0)
	}
}

impl<'a> AddAssign<&'a Amount> for Amount {
	fn add_assign(&mut self, other: &'a Amount) {
		self.0 = &self.0 + &other.0;
	}
}

impl<'a> Sum<&'a Amount> for Amount {
	fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
		let mut total = Amount::zero();
		for a in iter {
			total += a;
		}
		total
	}
}

/// Amounts travel as decimal strings on the wire and in persisted state so
/// that arbitrary-precision values survive every JSON implementation.
impl Serialize for Amount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_decimal())
	}
}

impl<'de> Deserialize<'de> for Amount {
	fn deserialize<D>(deserializer: D) -> Result<Amount, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Amount::from_decimal(&s)
			.ok_or_else(|| D::Error::custom(format!("invalid amount string: {:?}", s)))
	}
}
