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

//! The EU certificate registry.
//!
//! EU certificates are physically issued bearer instruments whose claim is
//! anchored to a specific on-ledger vault. While a certificate is ACTIVE its
//! backing vault must exist, be owned by the certificate owner, hold a
//! positive balance, and back no other ACTIVE certificate.
//!
//! The registry keeps two indices. `by_id` is ground truth; `by_owner` is a
//! derived projection rebuilt after every mutation and never persisted.

use crate::core::account::Vault;
use crate::core::amount::{Address, Amount, CertId, Height, VaultId};
use crate::core::hash::Hash;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Lifecycle status of an EU certificate. `ACTIVE → REDEEMED` is the one
/// transition the engine performs; the remaining states are reserved for
/// the physical-incident workflow.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EuStatus {
	Active,
	Redeemed,
	Lost,
	Stolen,
	Fraud,
	Reissued,
}

/// A single EU bearer certificate record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EuCertificate {
	pub id: CertId,
	/// Activation owner: the address the certificate was activated for.
	pub owner: Address,
	pub activated_by_institution_id: String,
	pub physical_bearer: bool,
	pub issued_at_height: Height,
	pub chain_hash_proof: Hash,
	#[serde(rename = "oracleValueEUAtIssuance")]
	pub oracle_value_eu_at_issuance: Amount,
	pub backing_vault_id: VaultId,
	pub status: EuStatus,
	#[serde(default)]
	pub damaged_flag: bool,
	#[serde(default)]
	pub reissue_parent_id: Option<CertId>,
	#[serde(default)]
	pub institution_signature: Option<String>,
}

impl EuCertificate {
	pub fn is_active(&self) -> bool {
		self.status == EuStatus::Active
	}
}

/// Registry failures. Stable codes via [`Error::code`].
#[derive(Debug, Clone, Eq, PartialEq, Fail)]
pub enum Error {
	#[fail(display = "backing vault {} for certificate {} does not exist", vault_id, cert_id)]
	BackingVaultMissing { cert_id: CertId, vault_id: VaultId },
	#[fail(display = "certificate {} already registered", cert_id)]
	CertExists { cert_id: CertId },
	#[fail(
		display = "vault {} already backs active certificate {}",
		vault_id, bound_cert_id
	)]
	VaultAlreadyBound {
		vault_id: VaultId,
		bound_cert_id: CertId,
	},
	#[fail(display = "unknown certificate {}", cert_id)]
	Unknown { cert_id: CertId },
	#[fail(display = "EU invariant violated: {}", detail)]
	InvariantViolation { detail: String },
}

impl Error {
	pub fn code(&self) -> &'static str {
		match self {
			Error::BackingVaultMissing { .. } => "EU_BACKING_VAULT_MISSING",
			Error::CertExists { .. } => "EU_CERT_EXISTS",
			Error::VaultAlreadyBound { .. } => "EU_VAULT_ALREADY_BOUND",
			Error::Unknown { .. } => "EU_UNKNOWN",
			Error::InvariantViolation { .. } => "EU_INVARIANT_VIOLATION",
		}
	}
}

/// Certificate registry with the derived per-owner index.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EuRegistry {
	by_id: BTreeMap<CertId, EuCertificate>,
	// Derived. Rebuilt from by_id, never serialized.
	#[serde(skip)]
	by_owner: BTreeMap<Address, Vec<CertId>>,
}

// Deserialization only reads by_id; the owner index is recomputed so a
// tampered or stale persisted index can never become ground truth.
impl<'de> Deserialize<'de> for EuRegistry {
	fn deserialize<D>(deserializer: D) -> Result<EuRegistry, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(rename_all = "camelCase")]
		struct Raw {
			by_id: BTreeMap<CertId, EuCertificate>,
		}
		let raw = Raw::deserialize(deserializer)?;
		Ok(EuRegistry::from_by_id(raw.by_id))
	}
}

impl EuRegistry {
	/// Rebuild a registry from its ground-truth index.
	pub fn from_by_id(by_id: BTreeMap<CertId, EuCertificate>) -> EuRegistry {
		let mut reg = EuRegistry {
			by_id,
			by_owner: BTreeMap::new(),
		};
		reg.rebuild_owner_index();
		reg
	}

	pub fn get(&self, id: &str) -> Option<&EuCertificate> {
		self.by_id.get(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.by_id.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&CertId, &EuCertificate)> {
		self.by_id.iter()
	}

	pub fn by_id(&self) -> &BTreeMap<CertId, EuCertificate> {
		&self.by_id
	}

	/// Certificate ids activated for `owner`. Order within an owner is not
	/// consensus-relevant.
	pub fn certs_for_owner(&self, owner: &str) -> &[CertId] {
		self.by_owner.get(owner).map(|v| &v[..]).unwrap_or(&[])
	}

	/// The ACTIVE certificate backed by `vault_id`, if any.
	pub fn active_cert_for_vault(&self, vault_id: &str) -> Option<&EuCertificate> {
		self.by_id
			.values()
			.find(|c| c.is_active() && c.backing_vault_id == vault_id)
	}

	/// Register a new certificate against the current vault set.
	pub fn register(
		&mut self,
		cert: EuCertificate,
		vaults: &BTreeMap<VaultId, Vault>,
	) -> Result<(), Error> {
		if !vaults.contains_key(&cert.backing_vault_id) {
			return Err(Error::BackingVaultMissing {
				cert_id: cert.id,
				vault_id: cert.backing_vault_id,
			});
		}
		if self.by_id.contains_key(&cert.id) {
			return Err(Error::CertExists { cert_id: cert.id });
		}
		if cert.is_active() {
			if let Some(bound) = self.active_cert_for_vault(&cert.backing_vault_id) {
				return Err(Error::VaultAlreadyBound {
					vault_id: cert.backing_vault_id.clone(),
					bound_cert_id: bound.id.clone(),
				});
			}
		}
		self.by_id.insert(cert.id.clone(), cert);
		self.rebuild_owner_index();
		Ok(())
	}

	/// Flip `ACTIVE → REDEEMED`. Idempotent when already redeemed.
	pub fn mark_redeemed(&mut self, id: &str) -> Result<(), Error> {
		let cert = self.by_id.get_mut(id).ok_or_else(|| Error::Unknown {
			cert_id: id.to_owned(),
		})?;
		match cert.status {
			EuStatus::Active => {
				cert.status = EuStatus::Redeemed;
				self.rebuild_owner_index();
				Ok(())
			}
			EuStatus::Redeemed => Ok(()),
			_ => Err(Error::Unknown {
				cert_id: id.to_owned(),
			}),
		}
	}

	/// Recompute the per-owner projection from `by_id`. Deterministic:
	/// iteration follows the ordered id index.
	pub fn rebuild_owner_index(&mut self) {
		let mut idx: BTreeMap<Address, Vec<CertId>> = BTreeMap::new();
		for (id, cert) in &self.by_id {
			idx.entry(cert.owner.clone()).or_default().push(id.clone());
		}
		self.by_owner = idx;
	}

	/// Enforce the EU claim invariant over every registered certificate:
	/// each ACTIVE certificate has an existing backing vault with matching
	/// owner and positive balance, and no vault backs two ACTIVE
	/// certificates.
	pub fn assert_invariants(&self, vaults: &BTreeMap<VaultId, Vault>) -> Result<(), Error> {
		let mut bound: BTreeMap<&str, &str> = BTreeMap::new();
		for (id, cert) in &self.by_id {
			if !cert.is_active() {
				continue;
			}
			let vault = vaults.get(&cert.backing_vault_id).ok_or_else(|| {
				Error::InvariantViolation {
					detail: format!(
						"active certificate {} backed by missing vault {}",
						id, cert.backing_vault_id
					),
				}
			})?;
			if vault.owner != cert.owner {
				return Err(Error::InvariantViolation {
					detail: format!(
						"active certificate {} owned by {} but vault {} owned by {}",
						id, cert.owner, vault.id, vault.owner
					),
				});
			}
			if vault.balance_the.is_zero() {
				return Err(Error::InvariantViolation {
					detail: format!(
						"active certificate {} backed by empty vault {}",
						id, vault.id
					),
				});
			}
			if let Some(other) = bound.insert(cert.backing_vault_id.as_str(), id.as_str()) {
				return Err(Error::InvariantViolation {
					detail: format!(
						"vault {} backs active certificates {} and {}",
						cert.backing_vault_id, other, id
					),
				});
			}
		}
		Ok(())
	}
}
