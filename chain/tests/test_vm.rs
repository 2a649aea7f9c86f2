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

//! Transaction VM semantics: transfers, vaults, the EU lifecycle, atomic
//! policy enforcement and conservation.

mod common;
use crate::common::{amt, Harness};
use rand::Rng;
use thesis_chain::ConsensusEnv;
use thesis_core::core::amount::Amount;
use thesis_core::core::certificate::EuStatus;
use thesis_core::core::hash::Hash;
use thesis_core::core::transaction::TheTx;

fn mint_eu(owner: &str, cert: &str, vault: &str, value: u64) -> TheTx {
	TheTx::MintEu {
		owner: owner.into(),
		eu_certificate_id: cert.into(),
		backing_vault_id: vault.into(),
		activated_by_institution_id: "inst-1".into(),
		physical_bearer: true,
		oracle_value_eu_at_issuance: amt(value),
		chain_hash_proof: Hash::from("beef"),
	}
}

#[test]
fn transfer_moves_funds() {
	let mut h = Harness::with_default_env();
	h.fund("alice", 100);

	h.apply(vec![TheTx::TransferThe {
		from: "alice".into(),
		to: "bob".into(),
		amount_the: amt(40),
	}])
	.unwrap();

	assert_eq!(h.balance("alice"), amt(60));
	assert_eq!(h.balance("bob"), amt(40));
}

#[test]
fn transfer_underflow_is_rejected() {
	let mut h = Harness::with_default_env();
	h.fund("alice", 100);

	let err = h
		.apply(vec![TheTx::TransferThe {
			from: "alice".into(),
			to: "bob".into(),
			amount_the: amt(1_000),
		}])
		.unwrap_err();
	assert_eq!(err.code(), "INSUFFICIENT_FUNDS");
	assert_eq!(h.balance("alice"), amt(100));
	assert_eq!(h.balance("bob"), amt(0));
}

#[test]
fn zero_transfer_is_rejected() {
	let mut h = Harness::with_default_env();
	h.fund("alice", 100);
	let err = h
		.apply(vec![TheTx::TransferThe {
			from: "alice".into(),
			to: "bob".into(),
			amount_the: amt(0),
		}])
		.unwrap_err();
	assert_eq!(err.code(), "ZERO_AMOUNT");
}

#[test]
fn transfer_conserves_total_supply() {
	let mut h = Harness::with_default_env();
	h.fund("alice", 1_000);

	let mut rng = rand::thread_rng();
	for i in 0..20 {
		let total_before = h.chain.head().ledger.total_account_the();
		let (from, to) = if i % 2 == 0 {
			("alice", "bob")
		} else {
			("bob", "alice")
		};
		let available = h.balance(from);
		let units: u64 = rng.gen_range(1, 50);
		let amount = amt(units);
		if amount > available {
			continue;
		}
		let outcome = h
			.apply(vec![TheTx::TransferThe {
				from: from.into(),
				to: to.into(),
				amount_the: amount,
			}])
			.unwrap();
		// totals only grow by the block's emission
		let expected = &total_before + &outcome.emission.total_reward_the;
		assert_eq!(h.chain.head().ledger.total_account_the(), expected);
	}
}

#[test]
fn vault_create_deposit_withdraw() {
	let mut h = Harness::with_default_env();
	h.apply(vec![
		TheTx::VaultCreate {
			vault_id: "v1".into(),
			owner: "alice".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "v1".into(),
			amount_the: amt(50),
		},
		TheTx::VaultWithdraw {
			vault_id: "v1".into(),
			amount_the: amt(20),
		},
	])
	.unwrap();

	let vault = h.chain.head().ledger.vault("v1").unwrap();
	assert_eq!(vault.balance_the, amt(30));
	assert_eq!(vault.owner, "alice");
}

#[test]
fn duplicate_vault_is_rejected() {
	let mut h = Harness::with_default_env();
	h.apply(vec![TheTx::VaultCreate {
		vault_id: "v1".into(),
		owner: "alice".into(),
	}])
	.unwrap();
	let err = h
		.apply(vec![TheTx::VaultCreate {
			vault_id: "v1".into(),
			owner: "bob".into(),
		}])
		.unwrap_err();
	assert_eq!(err.code(), "VAULT_EXISTS");
}

#[test]
fn vault_underflow_and_unknown_vault() {
	let mut h = Harness::with_default_env();
	h.apply(vec![
		TheTx::VaultCreate {
			vault_id: "v1".into(),
			owner: "alice".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "v1".into(),
			amount_the: amt(10),
		},
	])
	.unwrap();

	let err = h
		.apply(vec![TheTx::VaultWithdraw {
			vault_id: "v1".into(),
			amount_the: amt(11),
		}])
		.unwrap_err();
	assert_eq!(err.code(), "VAULT_UNDERFLOW");

	let err = h
		.apply(vec![TheTx::VaultDeposit {
			vault_id: "nope".into(),
			amount_the: amt(1),
		}])
		.unwrap_err();
	assert_eq!(err.code(), "VAULT_UNKNOWN");
}

#[test]
fn deposit_withdraw_move_vault_totals_only() {
	// with the unfunded hook, vault totals grow and shrink by exactly the
	// moved amount and account totals see nothing
	let mut h = Harness::with_default_env();
	h.apply(vec![TheTx::VaultCreate {
		vault_id: "v1".into(),
		owner: "alice".into(),
	}])
	.unwrap();

	let accounts_before = h.chain.head().ledger.total_account_the();
	let vaults_before = h.chain.head().ledger.total_vault_the();

	let outcome = h
		.apply(vec![TheTx::VaultDeposit {
			vault_id: "v1".into(),
			amount_the: amt(25),
		}])
		.unwrap();

	let ledger = &h.chain.head().ledger;
	assert_eq!(
		ledger.total_vault_the(),
		&vaults_before + &amt(25)
	);
	assert_eq!(
		ledger.total_account_the(),
		&accounts_before + &outcome.emission.total_reward_the
	);
}

#[test]
fn eu_lifecycle_mint_redeem_remint() {
	let mut h = Harness::with_default_env();
	// vault V owned by A with deposit 10
	h.apply(vec![
		TheTx::VaultCreate {
			vault_id: "v".into(),
			owner: "a".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "v".into(),
			amount_the: amt(10),
		},
	])
	.unwrap();

	// mint C against V
	h.apply(vec![mint_eu("a", "c", "v", 10)]).unwrap();
	let cert = h.chain.head().ledger.eu_registry.get("c").unwrap().clone();
	assert_eq!(cert.status, EuStatus::Active);
	assert_eq!(cert.issued_at_height, h.chain.head().height);

	// a second active certificate on the same vault is rejected
	let err = h.apply(vec![mint_eu("a", "d", "v", 5)]).unwrap_err();
	assert_eq!(err.code(), "EU_VAULT_ALREADY_BOUND");

	// redeem C, then D mints cleanly against the freed vault
	h.apply(vec![TheTx::RedeemEu {
		eu_certificate_id: "c".into(),
	}])
	.unwrap();
	assert_eq!(
		h.chain.head().ledger.eu_registry.get("c").unwrap().status,
		EuStatus::Redeemed
	);

	h.apply(vec![mint_eu("a", "d", "v", 5)]).unwrap();
	assert_eq!(
		h.chain.head().ledger.eu_registry.get("d").unwrap().status,
		EuStatus::Active
	);
}

#[test]
fn redeem_is_idempotent_and_unknown_fails() {
	let mut h = Harness::with_default_env();
	h.apply(vec![
		TheTx::VaultCreate {
			vault_id: "v".into(),
			owner: "a".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "v".into(),
			amount_the: amt(10),
		},
		mint_eu("a", "c", "v", 10),
	])
	.unwrap();

	h.apply(vec![TheTx::RedeemEu {
		eu_certificate_id: "c".into(),
	}])
	.unwrap();
	// a second redemption in a later block is a no-op
	h.apply(vec![TheTx::RedeemEu {
		eu_certificate_id: "c".into(),
	}])
	.unwrap();

	let err = h
		.apply(vec![TheTx::RedeemEu {
			eu_certificate_id: "ghost".into(),
		}])
		.unwrap_err();
	assert_eq!(err.code(), "EU_UNKNOWN");
}

#[test]
fn mint_against_missing_vault_is_rejected() {
	let mut h = Harness::with_default_env();
	let err = h.apply(vec![mint_eu("a", "c", "ghost", 10)]).unwrap_err();
	assert_eq!(err.code(), "EU_BACKING_VAULT_MISSING");
}

#[test]
fn duplicate_certificate_id_is_rejected() {
	let mut h = Harness::with_default_env();
	h.apply(vec![
		TheTx::VaultCreate {
			vault_id: "v".into(),
			owner: "a".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "v".into(),
			amount_the: amt(10),
		},
		TheTx::VaultCreate {
			vault_id: "w".into(),
			owner: "a".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "w".into(),
			amount_the: amt(10),
		},
		mint_eu("a", "c", "v", 10),
	])
	.unwrap();

	let err = h.apply(vec![mint_eu("a", "c", "w", 10)]).unwrap_err();
	assert_eq!(err.code(), "EU_CERT_EXISTS");
}

#[test]
fn mint_with_mismatched_owner_breaks_the_boundary_invariant() {
	let mut h = Harness::with_default_env();
	h.apply(vec![
		TheTx::VaultCreate {
			vault_id: "v".into(),
			owner: "a".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "v".into(),
			amount_the: amt(10),
		},
	])
	.unwrap();

	let err = h.apply(vec![mint_eu("b", "c", "v", 10)]).unwrap_err();
	assert_eq!(err.code(), "EU_INVARIANT_VIOLATION");
}

#[test]
fn non_atomic_transfer_is_rejected() {
	let mut env = ConsensusEnv::default();
	env.policy.atomic_unit = amt(100);
	let mut h = Harness::setup(env);
	h.fund("alice", 1_000);

	let err = h
		.apply(vec![TheTx::TransferThe {
			from: "alice".into(),
			to: "bob".into(),
			amount_the: amt(150),
		}])
		.unwrap_err();
	assert_eq!(err.code(), "NON_ATOMIC");

	h.apply(vec![TheTx::TransferThe {
		from: "alice".into(),
		to: "bob".into(),
		amount_the: amt(200),
	}])
	.unwrap();
	assert_eq!(h.balance("bob"), amt(200));
}

#[test]
fn supply_cap_rejects_overflowing_credit() {
	let mut env = ConsensusEnv::default();
	env.policy.max_supply = Some(amt(1_000));
	// silence block emissions so the cap is exercised by the reward tx
	env.emission.base_rewards_the = vec![0];
	let mut h = Harness::setup(env);

	h.apply(vec![TheTx::InternalReward {
		miner: "alice".into(),
		amount_the: amt(900),
	}])
	.unwrap();

	let err = h
		.apply(vec![TheTx::InternalReward {
			miner: "alice".into(),
			amount_the: amt(200),
		}])
		.unwrap_err();
	assert_eq!(err.code(), "OVER_MAX_SUPPLY");

	// filling up to the cap exactly is fine
	h.apply(vec![TheTx::InternalReward {
		miner: "alice".into(),
		amount_the: amt(100),
	}])
	.unwrap();
	assert_eq!(h.balance("alice"), amt(1_000));
}

#[test]
fn funding_rewards_grow_supply_by_emission() {
	let mut h = Harness::with_default_env();
	let outcome = h.fund("alice", 500);
	let total = h.chain.head().ledger.total_the();
	// 500 from the reward tx plus the block emission
	let expected = &amt(500) + &outcome.emission.total_reward_the;
	assert_eq!(total, expected);
	assert_eq!(outcome.emission.total_reward_the, Amount::from_units(10));
}
