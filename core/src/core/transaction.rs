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

//! The typed transaction union. The VM matches this enum exhaustively; any
//! unhandled variant is a compile error, so there is no fallthrough no-op
//! dispatch anywhere in the engine.

use crate::core::amount::{Address, Amount, CertId, VaultId};
use crate::core::hash::Hash;

/// A Thesis chain transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TheTx {
	/// Move THE between accounts.
	#[serde(rename = "TRANSFER_THE")]
	#[serde(rename_all = "camelCase")]
	TransferThe {
		from: Address,
		to: Address,
		#[serde(rename = "amountTHE")]
		amount_the: Amount,
	},
	/// Create an empty vault.
	#[serde(rename = "VAULT_CREATE")]
	#[serde(rename_all = "camelCase")]
	VaultCreate { vault_id: VaultId, owner: Address },
	/// Increase a vault balance.
	#[serde(rename = "VAULT_DEPOSIT")]
	#[serde(rename_all = "camelCase")]
	VaultDeposit {
		vault_id: VaultId,
		#[serde(rename = "amountTHE")]
		amount_the: Amount,
	},
	/// Decrease a vault balance.
	#[serde(rename = "VAULT_WITHDRAW")]
	#[serde(rename_all = "camelCase")]
	VaultWithdraw {
		vault_id: VaultId,
		#[serde(rename = "amountTHE")]
		amount_the: Amount,
	},
	/// Activate an EU certificate against a backing vault.
	#[serde(rename = "MINT_EU")]
	#[serde(rename_all = "camelCase")]
	MintEu {
		owner: Address,
		eu_certificate_id: CertId,
		backing_vault_id: VaultId,
		activated_by_institution_id: String,
		physical_bearer: bool,
		#[serde(rename = "oracleValueEUAtIssuance")]
		oracle_value_eu_at_issuance: Amount,
		chain_hash_proof: Hash,
	},
	/// Redeem an EU certificate. Idempotent when already redeemed.
	#[serde(rename = "REDEEM_EU")]
	#[serde(rename_all = "camelCase")]
	RedeemEu { eu_certificate_id: CertId },
	/// Marker for an accepted split. Structural no-op in the VM; the split
	/// engine owns the semantics.
	#[serde(rename = "SPLIT_AWARD")]
	#[serde(rename_all = "camelCase")]
	SplitAward { factor: u32 },
	/// Credit a miner outside the emission path (sims, governance awards).
	#[serde(rename = "INTERNAL_REWARD")]
	#[serde(rename_all = "camelCase")]
	InternalReward {
		miner: Address,
		#[serde(rename = "amountTHE")]
		amount_the: Amount,
	},
}

impl TheTx {
	/// The wire tag of the transaction, also used in logs.
	pub fn kind(&self) -> &'static str {
		match self {
			TheTx::TransferThe { .. } => "TRANSFER_THE",
			TheTx::VaultCreate { .. } => "VAULT_CREATE",
			TheTx::VaultDeposit { .. } => "VAULT_DEPOSIT",
			TheTx::VaultWithdraw { .. } => "VAULT_WITHDRAW",
			TheTx::MintEu { .. } => "MINT_EU",
			TheTx::RedeemEu { .. } => "REDEEM_EU",
			TheTx::SplitAward { .. } => "SPLIT_AWARD",
			TheTx::InternalReward { .. } => "INTERNAL_REWARD",
		}
	}
}
