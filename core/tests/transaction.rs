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

//! Transaction serde tests: the persisted representation keeps the wire
//! tags, and amounts always travel as decimal strings.

mod common;
use crate::common::amt;
use thesis_core::core::amount::Amount;
use thesis_core::core::hash::Hash;
use thesis_core::core::transaction::TheTx;

#[test]
fn tx_serde_round_trip() {
	let txs = vec![
		TheTx::TransferThe {
			from: "alice".into(),
			to: "bob".into(),
			amount_the: amt(40),
		},
		TheTx::VaultCreate {
			vault_id: "v1".into(),
			owner: "alice".into(),
		},
		TheTx::VaultDeposit {
			vault_id: "v1".into(),
			amount_the: amt(10),
		},
		TheTx::VaultWithdraw {
			vault_id: "v1".into(),
			amount_the: amt(5),
		},
		TheTx::MintEu {
			owner: "alice".into(),
			eu_certificate_id: "c1".into(),
			backing_vault_id: "v1".into(),
			activated_by_institution_id: "inst-9".into(),
			physical_bearer: true,
			oracle_value_eu_at_issuance: amt(10),
			chain_hash_proof: Hash::from("beef"),
		},
		TheTx::RedeemEu {
			eu_certificate_id: "c1".into(),
		},
		TheTx::SplitAward { factor: 2 },
		TheTx::InternalReward {
			miner: "m1".into(),
			amount_the: amt(10),
		},
	];
	for tx in txs {
		let json = serde_json::to_string(&tx).unwrap();
		let back: TheTx = serde_json::from_str(&json).unwrap();
		assert_eq!(tx, back);
	}
}

#[test]
fn tx_serde_uses_wire_tags() {
	let tx = TheTx::TransferThe {
		from: "alice".into(),
		to: "bob".into(),
		amount_the: amt(40),
	};
	let value: serde_json::Value = serde_json::to_value(&tx).unwrap();
	assert_eq!(value["type"], "TRANSFER_THE");
	// amounts are strings, not JSON numbers
	assert_eq!(value["amountTHE"], "40");
}

#[test]
fn tx_serde_big_amount_survives() {
	let big = "123456789012345678901234567890123456789";
	let tx = TheTx::InternalReward {
		miner: "m1".into(),
		amount_the: Amount::from_decimal(big).unwrap(),
	};
	let json = serde_json::to_string(&tx).unwrap();
	let back: TheTx = serde_json::from_str(&json).unwrap();
	match back {
		TheTx::InternalReward { amount_the, .. } => {
			assert_eq!(amount_the.to_decimal(), big);
		}
		other => panic!("unexpected variant {:?}", other),
	}
}
