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

//! Accounts and vaults. Accounts are created on first credit and never
//! destroyed. Vaults are created explicitly and may be emptied, but the
//! engine does not destroy them on its own.

use crate::core::amount::{Address, Amount, VaultId};

/// An owned THE balance. Balance is non-negative by construction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	pub address: Address,
	#[serde(rename = "balanceTHE")]
	pub balance_the: Amount,
}

impl Account {
	/// A fresh account with zero balance.
	pub fn new(address: Address) -> Account {
		Account {
			address,
			balance_the: Amount::zero(),
		}
	}
}

/// Classification of a vault. Purely descriptive metadata today.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VaultKind {
	Standard,
	Treasury,
	Institutional,
}

impl Default for VaultKind {
	fn default() -> VaultKind {
		VaultKind::Standard
	}
}

/// A container of THE owned by an address. At most one ACTIVE EU
/// certificate may be backed by a given vault.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
	pub id: VaultId,
	pub owner: Address,
	#[serde(rename = "balanceTHE")]
	pub balance_the: Amount,
	#[serde(default)]
	pub kind: VaultKind,
	#[serde(default)]
	pub notes: Option<String>,
}

impl Vault {
	/// A fresh, empty vault of the default kind.
	pub fn new(id: VaultId, owner: Address) -> Vault {
		Vault {
			id,
			owner,
			balance_the: Amount::zero(),
			kind: VaultKind::default(),
			notes: None,
		}
	}
}
