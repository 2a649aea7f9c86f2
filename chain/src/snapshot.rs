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

//! Neutral snapshots and structural deltas of the ledger.
//!
//! Snapshots are value copies: nothing aliases the live state. A delta
//! carries per-key before/after pairs for every changed entry; applying a
//! delta is structural and trusts that the producing snapshots respected
//! the VM invariants. The one exception is enforced mode, which refuses to
//! delete a vault that still holds THE.

use crate::core::core::account::{Account, Vault};
use crate::core::core::amount::{Address, CertId, VaultId};
use crate::core::core::certificate::{EuCertificate, EuRegistry};
use crate::core::core::ledger::{ChainHeader, ChainLedger, LedgerState};
use crate::error::Error;
use std::collections::BTreeMap;

/// Value copy of a ledger at one height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
	pub header: ChainHeader,
	pub accounts: BTreeMap<Address, Account>,
	pub vaults: BTreeMap<VaultId, Vault>,
	pub certificates: BTreeMap<CertId, EuCertificate>,
}

impl LedgerSnapshot {
	/// Rehydrate a full ledger from the snapshot. The certificate owner
	/// index is rebuilt, never copied.
	pub fn to_ledger(&self) -> LedgerState {
		LedgerState {
			chain: ChainLedger {
				height: self.header.height,
				last_block_hash: self.header.last_block_hash.clone(),
				accounts: self.accounts.clone(),
				vaults: self.vaults.clone(),
			},
			eu_registry: EuRegistry::from_by_id(self.certificates.clone()),
		}
	}
}

/// Take a neutral value snapshot of a ledger.
pub fn snapshot(ledger: &LedgerState) -> LedgerSnapshot {
	LedgerSnapshot {
		header: ledger.chain.header(),
		accounts: ledger.chain.accounts.clone(),
		vaults: ledger.chain.vaults.clone(),
		certificates: ledger.eu_registry.by_id().clone(),
	}
}

/// One changed entry: `before` is the old value (`None` when created),
/// `after` the new one (`None` when deleted).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeltaEntry<T> {
	pub before: Option<T>,
	pub after: Option<T>,
}

/// Changed accounts, vaults and chain linkage between two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDelta {
	pub header: Option<DeltaEntry<ChainHeader>>,
	pub accounts: BTreeMap<Address, DeltaEntry<Account>>,
	pub vaults: BTreeMap<VaultId, DeltaEntry<Vault>>,
}

impl LedgerDelta {
	pub fn is_empty(&self) -> bool {
		self.header.is_none() && self.accounts.is_empty() && self.vaults.is_empty()
	}
}

/// Changed certificates between two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EuRegistryDelta {
	pub certificates: BTreeMap<CertId, DeltaEntry<EuCertificate>>,
}

impl EuRegistryDelta {
	pub fn is_empty(&self) -> bool {
		self.certificates.is_empty()
	}
}

// Per-key diff of two ordered maps. Unchanged entries are omitted, as are
// keys absent on both sides.
fn diff_maps<T: Clone + PartialEq>(
	before: &BTreeMap<String, T>,
	after: &BTreeMap<String, T>,
) -> BTreeMap<String, DeltaEntry<T>> {
	let mut delta = BTreeMap::new();
	for (key, b) in before {
		match after.get(key) {
			Some(a) if a == b => {}
			a => {
				delta.insert(
					key.clone(),
					DeltaEntry {
						before: Some(b.clone()),
						after: a.cloned(),
					},
				);
			}
		}
	}
	for (key, a) in after {
		if !before.contains_key(key) {
			delta.insert(
				key.clone(),
				DeltaEntry {
					before: None,
					after: Some(a.clone()),
				},
			);
		}
	}
	delta
}

/// Diff two snapshots into a ledger delta and a certificate delta.
pub fn compute_delta(
	before: &LedgerSnapshot,
	after: &LedgerSnapshot,
) -> (LedgerDelta, EuRegistryDelta) {
	let header = if before.header == after.header {
		None
	} else {
		Some(DeltaEntry {
			before: Some(before.header.clone()),
			after: Some(after.header.clone()),
		})
	};
	let ledger_delta = LedgerDelta {
		header,
		accounts: diff_maps(&before.accounts, &after.accounts),
		vaults: diff_maps(&before.vaults, &after.vaults),
	};
	let eu_delta = EuRegistryDelta {
		certificates: diff_maps(&before.certificates, &after.certificates),
	};
	(ledger_delta, eu_delta)
}

/// How strictly delta application treats destructive entries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeltaMode {
	/// Trust the producer entirely.
	Structural,
	/// Refuse to delete a vault that still holds THE.
	Enforced,
}

fn apply_map_delta<T: Clone>(
	base: &mut BTreeMap<String, T>,
	delta: &BTreeMap<String, DeltaEntry<T>>,
) {
	for (key, entry) in delta {
		match &entry.after {
			Some(value) => {
				base.insert(key.clone(), value.clone());
			}
			None => {
				base.remove(key);
			}
		}
	}
}

/// Apply a delta to a base ledger, producing a fresh ledger. The
/// certificate owner index of the result is rebuilt from the updated
/// ground-truth index.
pub fn apply_delta(
	base: &LedgerState,
	ledger_delta: &LedgerDelta,
	eu_delta: &EuRegistryDelta,
	mode: DeltaMode,
) -> Result<LedgerState, Error> {
	if mode == DeltaMode::Enforced {
		for (id, entry) in &ledger_delta.vaults {
			if entry.after.is_none() {
				if let Some(vault) = base.chain.vaults.get(id) {
					if !vault.balance_the.is_zero() {
						return Err(crate::core::core::ledger::Error::VaultNonemptyDelete {
							vault_id: id.clone(),
							balance: vault.balance_the.to_decimal(),
						}
						.into());
					}
				}
			}
		}
	}

	let mut accounts = base.chain.accounts.clone();
	let mut vaults = base.chain.vaults.clone();
	let mut certificates = base.eu_registry.by_id().clone();
	apply_map_delta(&mut accounts, &ledger_delta.accounts);
	apply_map_delta(&mut vaults, &ledger_delta.vaults);
	apply_map_delta(&mut certificates, &eu_delta.certificates);

	let (height, last_block_hash) = match &ledger_delta.header {
		Some(DeltaEntry {
			after: Some(header),
			..
		}) => (header.height, header.last_block_hash.clone()),
		_ => (base.chain.height, base.chain.last_block_hash.clone()),
	};

	Ok(LedgerState {
		chain: ChainLedger {
			height,
			last_block_hash,
			accounts,
			vaults,
		},
		eu_registry: EuRegistry::from_by_id(certificates),
	})
}
