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

//! The layered ledger snapshot: chain header, accounts, vaults and the EU
//! certificate registry. All maps are ordered so iteration, serialization
//! and diffing are deterministic across platforms.

use crate::core::account::{Account, Vault};
use crate::core::amount::{Address, Amount, CertId, Height, VaultId};
use crate::core::certificate::{self, EuCertificate, EuRegistry};
use crate::core::hash::Hash;
use crate::policy::{self, AtomicCoinPolicy};
use std::collections::BTreeMap;

/// Ledger-level failures. Stable codes via [`Error::code`].
#[derive(Debug, Clone, Eq, PartialEq, Fail)]
pub enum Error {
	#[fail(
		display = "insufficient funds: {} holds {}, needs {}",
		address, balance, amount
	)]
	InsufficientFunds {
		address: Address,
		balance: String,
		amount: String,
	},
	#[fail(display = "zero amount in {}", context)]
	ZeroAmount { context: &'static str },
	#[fail(display = "vault {} already exists", vault_id)]
	VaultExists { vault_id: VaultId },
	#[fail(display = "unknown vault {}", vault_id)]
	VaultUnknown { vault_id: VaultId },
	#[fail(
		display = "vault {} underflow: holds {}, needs {}",
		vault_id, balance, amount
	)]
	VaultUnderflow {
		vault_id: VaultId,
		balance: String,
		amount: String,
	},
	#[fail(display = "vault {} deleted while holding {}", vault_id, balance)]
	VaultNonemptyDelete { vault_id: VaultId, balance: String },
	/// Certificate registry failure.
	#[fail(display = "{}", _0)]
	Certificate(certificate::Error),
	/// Atomic coin policy failure.
	#[fail(display = "{}", _0)]
	Policy(policy::Error),
}

impl Error {
	pub fn code(&self) -> &'static str {
		match self {
			Error::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
			Error::ZeroAmount { .. } => "ZERO_AMOUNT",
			Error::VaultExists { .. } => "VAULT_EXISTS",
			Error::VaultUnknown { .. } => "VAULT_UNKNOWN",
			Error::VaultUnderflow { .. } => "VAULT_UNDERFLOW",
			Error::VaultNonemptyDelete { .. } => "VAULT_NONEMPTY_DELETE",
			Error::Certificate(e) => e.code(),
			Error::Policy(e) => e.code(),
		}
	}
}

impl From<certificate::Error> for Error {
	fn from(e: certificate::Error) -> Error {
		Error::Certificate(e)
	}
}

impl From<policy::Error> for Error {
	fn from(e: policy::Error) -> Error {
		Error::Policy(e)
	}
}

/// Value copy of the chain linkage fields carried on the ledger.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainHeader {
	pub height: Height,
	pub last_block_hash: Option<Hash>,
}

/// The chain section of the ledger: linkage plus balances.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainLedger {
	pub height: Height,
	pub last_block_hash: Option<Hash>,
	pub accounts: BTreeMap<Address, Account>,
	pub vaults: BTreeMap<VaultId, Vault>,
}

impl ChainLedger {
	pub fn header(&self) -> ChainHeader {
		ChainHeader {
			height: self.height,
			last_block_hash: self.last_block_hash.clone(),
		}
	}
}

/// The composed ledger state mutated by the transaction VM.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
	pub chain: ChainLedger,
	pub eu_registry: EuRegistry,
}

impl LedgerState {
	/// The empty genesis ledger.
	pub fn genesis() -> LedgerState {
		LedgerState::default()
	}

	pub fn balance_of(&self, address: &str) -> Amount {
		self.chain
			.accounts
			.get(address)
			.map(|a| a.balance_the.clone())
			.unwrap_or_else(Amount::zero)
	}

	pub fn vault(&self, id: &str) -> Option<&Vault> {
		self.chain.vaults.get(id)
	}

	/// Credit an account, creating it on first use.
	pub fn credit(&mut self, address: &str, amount: &Amount) {
		let account = self
			.chain
			.accounts
			.entry(address.to_owned())
			.or_insert_with(|| Account::new(address.to_owned()));
		account.balance_the += amount;
	}

	/// Debit an account. Accounts never go below zero.
	pub fn debit(&mut self, address: &str, amount: &Amount) -> Result<(), Error> {
		let balance = self.balance_of(address);
		let next = balance
			.checked_sub(amount)
			.ok_or_else(|| Error::InsufficientFunds {
				address: address.to_owned(),
				balance: balance.to_decimal(),
				amount: amount.to_decimal(),
			})?;
		let account = self
			.chain
			.accounts
			.entry(address.to_owned())
			.or_insert_with(|| Account::new(address.to_owned()));
		account.balance_the = next;
		Ok(())
	}

	/// Create an empty vault under a fresh id.
	pub fn create_vault(&mut self, id: &str, owner: &str) -> Result<(), Error> {
		if self.chain.vaults.contains_key(id) {
			return Err(Error::VaultExists {
				vault_id: id.to_owned(),
			});
		}
		self.chain
			.vaults
			.insert(id.to_owned(), Vault::new(id.to_owned(), owner.to_owned()));
		Ok(())
	}

	/// Increase a vault balance. The account-side debit is not coupled
	/// here; see the VM's funding hook.
	pub fn deposit(&mut self, id: &str, amount: &Amount) -> Result<(), Error> {
		if amount.is_zero() {
			return Err(Error::ZeroAmount {
				context: "vault deposit",
			});
		}
		let vault = self.chain.vaults.get_mut(id).ok_or_else(|| Error::VaultUnknown {
			vault_id: id.to_owned(),
		})?;
		vault.balance_the += amount;
		Ok(())
	}

	/// Decrease a vault balance. Vaults never go below zero.
	pub fn withdraw(&mut self, id: &str, amount: &Amount) -> Result<(), Error> {
		if amount.is_zero() {
			return Err(Error::ZeroAmount {
				context: "vault withdraw",
			});
		}
		let vault = self.chain.vaults.get_mut(id).ok_or_else(|| Error::VaultUnknown {
			vault_id: id.to_owned(),
		})?;
		let next = vault.balance_the.checked_sub(amount).ok_or_else(|| {
			Error::VaultUnderflow {
				vault_id: id.to_owned(),
				balance: vault.balance_the.to_decimal(),
				amount: amount.to_decimal(),
			}
		})?;
		vault.balance_the = next;
		Ok(())
	}

	/// Register a new EU certificate against the current vault set.
	pub fn register_certificate(&mut self, cert: EuCertificate) -> Result<(), Error> {
		self.eu_registry.register(cert, &self.chain.vaults)?;
		Ok(())
	}

	/// Redeem a certificate. Idempotent when already redeemed.
	pub fn mark_redeemed(&mut self, id: &CertId) -> Result<(), Error> {
		self.eu_registry.mark_redeemed(id)?;
		Ok(())
	}

	/// Sum of all account balances.
	pub fn total_account_the(&self) -> Amount {
		self.chain.accounts.values().map(|a| &a.balance_the).sum()
	}

	/// Sum of all vault balances.
	pub fn total_vault_the(&self) -> Amount {
		self.chain.vaults.values().map(|v| &v.balance_the).sum()
	}

	/// Total THE held across accounts and vaults.
	pub fn total_the(&self) -> Amount {
		&self.total_account_the() + &self.total_vault_the()
	}

	/// Enforce the cross-layer invariants that hold at every block
	/// boundary: atomic closure of all stored amounts and the EU claim
	/// invariant. Non-negativity holds by construction.
	pub fn assert_invariants(&self, policy: &AtomicCoinPolicy) -> Result<(), Error> {
		for account in self.chain.accounts.values() {
			if !account.balance_the.is_multiple_of(&policy.atomic_unit) {
				return Err(Error::Policy(policy::Error::NonAtomic {
					value: account.balance_the.to_decimal(),
					atomic_unit: policy.atomic_unit.to_decimal(),
				}));
			}
		}
		for vault in self.chain.vaults.values() {
			if !vault.balance_the.is_multiple_of(&policy.atomic_unit) {
				return Err(Error::Policy(policy::Error::NonAtomic {
					value: vault.balance_the.to_decimal(),
					atomic_unit: policy.atomic_unit.to_decimal(),
				}));
			}
		}
		for (_, cert) in self.eu_registry.iter() {
			if !cert
				.oracle_value_eu_at_issuance
				.is_multiple_of(&policy.atomic_unit)
			{
				return Err(Error::Policy(policy::Error::NonAtomic {
					value: cert.oracle_value_eu_at_issuance.to_decimal(),
					atomic_unit: policy.atomic_unit.to_decimal(),
				}));
			}
		}
		self.eu_registry.assert_invariants(&self.chain.vaults)?;
		Ok(())
	}
}
