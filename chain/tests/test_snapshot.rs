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

//! Snapshot and delta machinery: the round-trip law, structural apply, and
//! the enforced vault-deletion guard.

mod common;
use crate::common::{amt, Harness};
use thesis_chain::snapshot::{
	self, DeltaEntry, DeltaMode, EuRegistryDelta, LedgerDelta,
};
use thesis_core::core::hash::Hash;
use thesis_core::core::ledger::LedgerState;
use thesis_core::core::transaction::TheTx;

fn two_states() -> (LedgerState, LedgerState) {
	let mut h = Harness::with_default_env();
	h.fund("alice", 100);
	h.apply(vec![
		TheTx::VaultCreate {
			vault_id: "v1".into(),
			owner: "alice".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "v1".into(),
			amount_the: amt(40),
		},
	])
	.unwrap();
	let before = h.chain.head().ledger.clone();

	h.apply(vec![
		TheTx::TransferThe {
			from: "alice".into(),
			to: "bob".into(),
			amount_the: amt(25),
		},
		TheTx::MintEu {
			owner: "alice".into(),
			eu_certificate_id: "c1".into(),
			backing_vault_id: "v1".into(),
			activated_by_institution_id: "inst".into(),
			physical_bearer: true,
			oracle_value_eu_at_issuance: amt(40),
			chain_hash_proof: Hash::from("beef"),
		},
	])
	.unwrap();
	let after = h.chain.head().ledger.clone();
	(before, after)
}

#[test]
fn delta_round_trip_law() {
	let (before, after) = two_states();
	let snap_before = snapshot::snapshot(&before);
	let snap_after = snapshot::snapshot(&after);
	let (ledger_delta, eu_delta) = snapshot::compute_delta(&snap_before, &snap_after);

	let rebuilt = snapshot::apply_delta(
		&snap_before.to_ledger(),
		&ledger_delta,
		&eu_delta,
		DeltaMode::Structural,
	)
	.unwrap();
	assert_eq!(snapshot::snapshot(&rebuilt), snap_after);
	assert_eq!(rebuilt, after);
}

#[test]
fn empty_delta_between_identical_states() {
	let (before, _) = two_states();
	let snap = snapshot::snapshot(&before);
	let (ledger_delta, eu_delta) = snapshot::compute_delta(&snap, &snap);
	assert!(ledger_delta.is_empty());
	assert!(eu_delta.is_empty());

	let rebuilt =
		snapshot::apply_delta(&before, &ledger_delta, &eu_delta, DeltaMode::Enforced).unwrap();
	assert_eq!(rebuilt, before);
}

#[test]
fn delta_reports_created_and_changed_entries() {
	let (before, after) = two_states();
	let (ledger_delta, eu_delta) =
		snapshot::compute_delta(&snapshot::snapshot(&before), &snapshot::snapshot(&after));

	// alice changed, bob appeared
	let alice = &ledger_delta.accounts["alice"];
	assert_eq!(alice.before.as_ref().unwrap().balance_the, amt(100));
	assert_eq!(alice.after.as_ref().unwrap().balance_the, amt(75));
	let bob = &ledger_delta.accounts["bob"];
	assert!(bob.before.is_none());
	assert_eq!(bob.after.as_ref().unwrap().balance_the, amt(25));

	// the certificate is new
	let cert = &eu_delta.certificates["c1"];
	assert!(cert.before.is_none());
	assert!(cert.after.is_some());

	// header linkage advanced
	assert!(ledger_delta.header.is_some());
}

#[test]
fn apply_delta_deletes_on_null_after() {
	let (before, _) = two_states();
	let mut ledger_delta = LedgerDelta::default();
	ledger_delta.accounts.insert(
		"alice".into(),
		DeltaEntry {
			before: Some(before.chain.accounts["alice"].clone()),
			after: None,
		},
	);
	let rebuilt = snapshot::apply_delta(
		&before,
		&ledger_delta,
		&EuRegistryDelta::default(),
		DeltaMode::Structural,
	)
	.unwrap();
	assert!(!rebuilt.chain.accounts.contains_key("alice"));
}

#[test]
fn enforced_mode_refuses_deleting_a_funded_vault() {
	let (before, _) = two_states();
	let mut ledger_delta = LedgerDelta::default();
	ledger_delta.vaults.insert(
		"v1".into(),
		DeltaEntry {
			before: Some(before.chain.vaults["v1"].clone()),
			after: None,
		},
	);

	let err = snapshot::apply_delta(
		&before,
		&ledger_delta,
		&EuRegistryDelta::default(),
		DeltaMode::Enforced,
	)
	.unwrap_err();
	assert_eq!(err.code(), "VAULT_NONEMPTY_DELETE");

	// structural mode trusts the producer
	snapshot::apply_delta(
		&before,
		&ledger_delta,
		&EuRegistryDelta::default(),
		DeltaMode::Structural,
	)
	.unwrap();
}

#[test]
fn owner_index_is_rebuilt_after_delta_apply() {
	let (before, after) = two_states();
	let (ledger_delta, eu_delta) =
		snapshot::compute_delta(&snapshot::snapshot(&before), &snapshot::snapshot(&after));
	let rebuilt =
		snapshot::apply_delta(&before, &ledger_delta, &eu_delta, DeltaMode::Structural).unwrap();
	assert_eq!(
		rebuilt.eu_registry.certs_for_owner("alice"),
		&["c1".to_string()][..]
	);
}

#[test]
fn owner_index_is_rebuilt_after_deserialization() {
	let (_, after) = two_states();
	let json = serde_json::to_string(&after).unwrap();
	// the serialized form carries by_id only
	assert!(json.contains("byId"));
	assert!(!json.contains("byOwner"));

	let restored: LedgerState = serde_json::from_str(&json).unwrap();
	assert_eq!(restored, after);
	assert_eq!(
		restored.eu_registry.certs_for_owner("alice"),
		&["c1".to_string()][..]
	);
}
