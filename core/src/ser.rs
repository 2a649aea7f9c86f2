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

//! Canonical block wire codec.
//!
//! Blocks travel as JSON UTF-8. Amounts, heights, timestamps, nonces and
//! factors encode as decimal numeric strings so arbitrary precision
//! survives every peer's JSON stack. Null fields are preserved. Decoding is
//! strict: an unknown transaction tag fails `WIRE_UNKNOWN_TX`, any other
//! shape violation fails `WIRE_MALFORMED`.

use crate::core::amount::Amount;
use crate::core::block::{Block, BlockBody, BlockHeader};
use crate::core::hash::Hash;
use crate::core::transaction::TheTx;
use num_bigint::BigUint;
use serde_json::{json, Map, Value};

/// Wire failures.
#[derive(Debug, Clone, Eq, PartialEq, Fail)]
pub enum Error {
	#[fail(display = "malformed wire block: {}", detail)]
	Malformed { detail: String },
	#[fail(display = "unknown transaction tag {}", tag)]
	UnknownTx { tag: String },
}

impl Error {
	pub fn code(&self) -> &'static str {
		match self {
			Error::Malformed { .. } => "WIRE_MALFORMED",
			Error::UnknownTx { .. } => "WIRE_UNKNOWN_TX",
		}
	}
}

fn malformed<S: Into<String>>(detail: S) -> Error {
	Error::Malformed {
		detail: detail.into(),
	}
}

/// Decimal-string serde for `BigUint` fields (`#[serde(with = ..)]`).
pub mod biguint_decimal {
	use num_bigint::BigUint;
	use serde::de::Error as DeError;
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&value.to_str_radix(10))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
			return Err(D::Error::custom(format!("invalid bigint string: {:?}", s)));
		}
		BigUint::parse_bytes(s.as_bytes(), 10)
			.ok_or_else(|| D::Error::custom(format!("invalid bigint string: {:?}", s)))
	}
}

// ---------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------

fn tx_to_value(tx: &TheTx) -> Value {
	match tx {
		TheTx::TransferThe {
			from,
			to,
			amount_the,
		} => json!({
			"type": "TRANSFER_THE",
			"from": from,
			"to": to,
			"amountTHE": amount_the.to_decimal(),
		}),
		TheTx::VaultCreate { vault_id, owner } => json!({
			"type": "VAULT_CREATE",
			"vaultId": vault_id,
			"owner": owner,
		}),
		TheTx::VaultDeposit {
			vault_id,
			amount_the,
		} => json!({
			"type": "VAULT_DEPOSIT",
			"vaultId": vault_id,
			"amountTHE": amount_the.to_decimal(),
		}),
		TheTx::VaultWithdraw {
			vault_id,
			amount_the,
		} => json!({
			"type": "VAULT_WITHDRAW",
			"vaultId": vault_id,
			"amountTHE": amount_the.to_decimal(),
		}),
		TheTx::MintEu {
			owner,
			eu_certificate_id,
			backing_vault_id,
			activated_by_institution_id,
			physical_bearer,
			oracle_value_eu_at_issuance,
			chain_hash_proof,
		} => json!({
			"type": "MINT_EU",
			"owner": owner,
			"euCertificateId": eu_certificate_id,
			"backingVaultId": backing_vault_id,
			"activatedByInstitutionId": activated_by_institution_id,
			"physicalBearer": physical_bearer,
			"oracleValueEUAtIssuance": oracle_value_eu_at_issuance.to_decimal(),
			"chainHashProof": chain_hash_proof.as_str(),
		}),
		TheTx::RedeemEu { eu_certificate_id } => json!({
			"type": "REDEEM_EU",
			"euCertificateId": eu_certificate_id,
		}),
		TheTx::SplitAward { factor } => json!({
			"type": "SPLIT_AWARD",
			"factor": factor.to_string(),
		}),
		TheTx::InternalReward { miner, amount_the } => json!({
			"type": "INTERNAL_REWARD",
			"miner": miner,
			"amountTHE": amount_the.to_decimal(),
		}),
	}
}

/// Canonical JSON value of a block.
pub fn block_to_value(block: &Block) -> Value {
	json!({
		"header": {
			"height": block.header.height.to_string(),
			"parentHash": block.header.parent_hash.as_ref().map(|h| h.as_str()),
			"timestampSec": block.header.timestamp_sec.to_string(),
			"nonce": block.header.nonce.to_str_radix(10),
			"extraData": block.header.extra_data.as_ref().map(|s| s.as_str()),
		},
		"body": {
			"txs": block.body.txs.iter().map(tx_to_value).collect::<Vec<_>>(),
		},
		"hash": block.hash.as_str(),
	})
}

/// Encode a block to its canonical wire string.
pub fn encode_block(block: &Block) -> String {
	block_to_value(block).to_string()
}

// ---------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------

fn expect_obj<'a>(
	value: &'a Value,
	what: &str,
	allowed: &[&str],
) -> Result<&'a Map<String, Value>, Error> {
	let obj = value
		.as_object()
		.ok_or_else(|| malformed(format!("{} is not an object", what)))?;
	for key in obj.keys() {
		if !allowed.contains(&key.as_str()) {
			return Err(malformed(format!("unknown field {:?} on {}", key, what)));
		}
	}
	Ok(obj)
}

fn req<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value, Error> {
	obj.get(key)
		.ok_or_else(|| malformed(format!("missing field {:?}", key)))
}

fn req_str(obj: &Map<String, Value>, key: &str) -> Result<String, Error> {
	req(obj, key)?
		.as_str()
		.map(|s| s.to_owned())
		.ok_or_else(|| malformed(format!("field {:?} is not a string", key)))
}

fn opt_str(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, Error> {
	match obj.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(s)) => Ok(Some(s.clone())),
		Some(_) => Err(malformed(format!("field {:?} is not a string or null", key))),
	}
}

fn req_bool(obj: &Map<String, Value>, key: &str) -> Result<bool, Error> {
	req(obj, key)?
		.as_bool()
		.ok_or_else(|| malformed(format!("field {:?} is not a bool", key)))
}

fn parse_u64(obj: &Map<String, Value>, key: &str) -> Result<u64, Error> {
	let s = req_str(obj, key)?;
	s.parse::<u64>()
		.map_err(|_| malformed(format!("field {:?} is not a decimal string: {:?}", key, s)))
}

fn parse_u32(obj: &Map<String, Value>, key: &str) -> Result<u32, Error> {
	let s = req_str(obj, key)?;
	s.parse::<u32>()
		.map_err(|_| malformed(format!("field {:?} is not a decimal string: {:?}", key, s)))
}

fn parse_i64(obj: &Map<String, Value>, key: &str) -> Result<i64, Error> {
	let s = req_str(obj, key)?;
	s.parse::<i64>()
		.map_err(|_| malformed(format!("field {:?} is not a decimal string: {:?}", key, s)))
}

fn parse_amount(obj: &Map<String, Value>, key: &str) -> Result<Amount, Error> {
	let s = req_str(obj, key)?;
	Amount::from_decimal(&s)
		.ok_or_else(|| malformed(format!("field {:?} is not an amount string: {:?}", key, s)))
}

fn parse_biguint(obj: &Map<String, Value>, key: &str) -> Result<BigUint, Error> {
	let s = req_str(obj, key)?;
	if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
		return Err(malformed(format!(
			"field {:?} is not a decimal string: {:?}",
			key, s
		)));
	}
	BigUint::parse_bytes(s.as_bytes(), 10)
		.ok_or_else(|| malformed(format!("field {:?} is not a decimal string: {:?}", key, s)))
}

fn tx_from_value(value: &Value) -> Result<TheTx, Error> {
	let probe = value
		.as_object()
		.ok_or_else(|| malformed("transaction is not an object"))?;
	let tag = probe
		.get("type")
		.and_then(|t| t.as_str())
		.ok_or_else(|| malformed("transaction has no type tag"))?
		.to_owned();

	match tag.as_str() {
		"TRANSFER_THE" => {
			let obj = expect_obj(value, "TRANSFER_THE", &["type", "from", "to", "amountTHE"])?;
			Ok(TheTx::TransferThe {
				from: req_str(obj, "from")?,
				to: req_str(obj, "to")?,
				amount_the: parse_amount(obj, "amountTHE")?,
			})
		}
		"VAULT_CREATE" => {
			let obj = expect_obj(value, "VAULT_CREATE", &["type", "vaultId", "owner"])?;
			Ok(TheTx::VaultCreate {
				vault_id: req_str(obj, "vaultId")?,
				owner: req_str(obj, "owner")?,
			})
		}
		"VAULT_DEPOSIT" => {
			let obj = expect_obj(value, "VAULT_DEPOSIT", &["type", "vaultId", "amountTHE"])?;
			Ok(TheTx::VaultDeposit {
				vault_id: req_str(obj, "vaultId")?,
				amount_the: parse_amount(obj, "amountTHE")?,
			})
		}
		"VAULT_WITHDRAW" => {
			let obj = expect_obj(value, "VAULT_WITHDRAW", &["type", "vaultId", "amountTHE"])?;
			Ok(TheTx::VaultWithdraw {
				vault_id: req_str(obj, "vaultId")?,
				amount_the: parse_amount(obj, "amountTHE")?,
			})
		}
		"MINT_EU" => {
			let obj = expect_obj(
				value,
				"MINT_EU",
				&[
					"type",
					"owner",
					"euCertificateId",
					"backingVaultId",
					"activatedByInstitutionId",
					"physicalBearer",
					"oracleValueEUAtIssuance",
					"chainHashProof",
				],
			)?;
			Ok(TheTx::MintEu {
				owner: req_str(obj, "owner")?,
				eu_certificate_id: req_str(obj, "euCertificateId")?,
				backing_vault_id: req_str(obj, "backingVaultId")?,
				activated_by_institution_id: req_str(obj, "activatedByInstitutionId")?,
				physical_bearer: req_bool(obj, "physicalBearer")?,
				oracle_value_eu_at_issuance: parse_amount(obj, "oracleValueEUAtIssuance")?,
				chain_hash_proof: Hash::from(req_str(obj, "chainHashProof")?),
			})
		}
		"REDEEM_EU" => {
			let obj = expect_obj(value, "REDEEM_EU", &["type", "euCertificateId"])?;
			Ok(TheTx::RedeemEu {
				eu_certificate_id: req_str(obj, "euCertificateId")?,
			})
		}
		"SPLIT_AWARD" => {
			let obj = expect_obj(value, "SPLIT_AWARD", &["type", "factor"])?;
			Ok(TheTx::SplitAward {
				factor: parse_u32(obj, "factor")?,
			})
		}
		"INTERNAL_REWARD" => {
			let obj = expect_obj(value, "INTERNAL_REWARD", &["type", "miner", "amountTHE"])?;
			Ok(TheTx::InternalReward {
				miner: req_str(obj, "miner")?,
				amount_the: parse_amount(obj, "amountTHE")?,
			})
		}
		_ => Err(Error::UnknownTx { tag }),
	}
}

/// Decode a block from its canonical wire value.
pub fn block_from_value(value: &Value) -> Result<Block, Error> {
	let obj = expect_obj(value, "block", &["header", "body", "hash"])?;

	let header_obj = expect_obj(
		req(obj, "header")?,
		"header",
		&["height", "parentHash", "timestampSec", "nonce", "extraData"],
	)?;
	let header = BlockHeader {
		height: parse_u64(header_obj, "height")?,
		parent_hash: opt_str(header_obj, "parentHash")?.map(Hash::from),
		timestamp_sec: parse_i64(header_obj, "timestampSec")?,
		nonce: parse_biguint(header_obj, "nonce")?,
		extra_data: opt_str(header_obj, "extraData")?,
	};

	let body_obj = expect_obj(req(obj, "body")?, "body", &["txs"])?;
	let txs = req(body_obj, "txs")?
		.as_array()
		.ok_or_else(|| malformed("field \"txs\" is not an array"))?
		.iter()
		.map(tx_from_value)
		.collect::<Result<Vec<_>, _>>()?;

	let hash = Hash::from(req_str(obj, "hash")?);
	Ok(Block {
		header,
		body: BlockBody { txs },
		hash,
	})
}

/// Decode a block from a wire string.
pub fn decode_block(raw: &str) -> Result<Block, Error> {
	let value: Value =
		serde_json::from_str(raw).map_err(|e| malformed(format!("invalid json: {}", e)))?;
	block_from_value(&value)
}
