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

//! The transaction virtual machine.
//!
//! One exhaustive match over the typed transaction union; the compiler
//! refuses any unhandled variant. Each arm either fully applies its
//! mutation or returns the first error, and the pipeline runs the VM on a
//! working copy, so a failed transaction is never observable.

use crate::core::core::amount::{Amount, Height};
use crate::core::core::certificate::{EuCertificate, EuStatus};
use crate::core::core::ledger::{self, LedgerState};
use crate::core::core::transaction::TheTx;
use crate::error::Error;
use crate::types::{ConsensusEnv, VaultFunding};

fn require_positive(amount: &Amount, context: &'static str) -> Result<(), ledger::Error> {
	if amount.is_zero() {
		return Err(ledger::Error::ZeroAmount { context });
	}
	Ok(())
}

// Supply-growing credits check the projected total against the cap before
// touching the ledger.
fn check_supply_growth(
	ledger: &LedgerState,
	env: &ConsensusEnv,
	amount: &Amount,
) -> Result<(), Error> {
	if env.policy.max_supply.is_some() {
		let projected = &ledger.total_the() + amount;
		env.policy.check_supply(&projected)?;
	}
	Ok(())
}

/// Apply one transaction to the ledger.
pub fn apply_block_tx(
	ledger: &mut LedgerState,
	tx: &TheTx,
	env: &ConsensusEnv,
	height: Height,
) -> Result<(), Error> {
	trace!("vm: applying {} at height {}", tx.kind(), height);
	match tx {
		TheTx::TransferThe {
			from,
			to,
			amount_the,
		} => {
			require_positive(amount_the, "transfer")?;
			env.policy.validate_amount(amount_the)?;
			ledger.debit(from, amount_the)?;
			ledger.credit(to, amount_the);
		}
		TheTx::VaultCreate { vault_id, owner } => {
			ledger.create_vault(vault_id, owner)?;
		}
		TheTx::VaultDeposit {
			vault_id,
			amount_the,
		} => {
			require_positive(amount_the, "vault deposit")?;
			env.policy.validate_amount(amount_the)?;
			match env.vault_funding {
				// Account-side debit intentionally unresolved; a funded
				// variant will debit the vault owner here, atomically.
				VaultFunding::Unfunded => check_supply_growth(ledger, env, amount_the)?,
			}
			ledger.deposit(vault_id, amount_the)?;
		}
		TheTx::VaultWithdraw {
			vault_id,
			amount_the,
		} => {
			require_positive(amount_the, "vault withdraw")?;
			env.policy.validate_amount(amount_the)?;
			match env.vault_funding {
				// Mirror of the deposit hook.
				VaultFunding::Unfunded => {}
			}
			ledger.withdraw(vault_id, amount_the)?;
		}
		TheTx::MintEu {
			owner,
			eu_certificate_id,
			backing_vault_id,
			activated_by_institution_id,
			physical_bearer,
			oracle_value_eu_at_issuance,
			chain_hash_proof,
		} => {
			env.policy.validate_amount(oracle_value_eu_at_issuance)?;
			let cert = EuCertificate {
				id: eu_certificate_id.clone(),
				owner: owner.clone(),
				activated_by_institution_id: activated_by_institution_id.clone(),
				physical_bearer: *physical_bearer,
				issued_at_height: height,
				chain_hash_proof: chain_hash_proof.clone(),
				oracle_value_eu_at_issuance: oracle_value_eu_at_issuance.clone(),
				backing_vault_id: backing_vault_id.clone(),
				status: EuStatus::Active,
				damaged_flag: false,
				reissue_parent_id: None,
				institution_signature: None,
			};
			ledger.register_certificate(cert)?;
		}
		TheTx::RedeemEu { eu_certificate_id } => {
			ledger.mark_redeemed(eu_certificate_id)?;
		}
		TheTx::SplitAward { factor } => {
			// Structural no-op: the split engine owns split semantics.
			trace!("vm: SPLIT_AWARD factor {} acknowledged", factor);
		}
		TheTx::InternalReward { miner, amount_the } => {
			env.policy.validate_amount(amount_the)?;
			check_supply_growth(ledger, env, amount_the)?;
			ledger.credit(miner, amount_the);
		}
	}
	Ok(())
}
