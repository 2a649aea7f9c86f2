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

//! Shadow checks: non-consensus-critical audits over a committed state.
//! Advisory by default; an audit harness that wires them into the pipeline
//! treats a violation as fatal.

use crate::core::core::amount::{Amount, Height};
use crate::core::core::certificate;
use crate::core::core::ledger::LedgerState;
use crate::core::policy::AtomicCoinPolicy;
use crate::error::Error;

/// Where a shadow check ran, for reporting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShadowContext {
	pub height: Height,
}

/// Aggregates of one EU-atomic sweep.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EuShadowReport {
	/// Sum of ACTIVE certificate values whose backing vault exists.
	pub total_eu_supply: Amount,
	pub active_certs: usize,
	/// ACTIVE certificates skipped because their vault is gone. Such
	/// certificates are an invariant break in their own right, but this
	/// sweep only measures supply.
	pub skipped_missing_vault: usize,
}

/// Sweep the EU registry and validate every ACTIVE certificate value, and
/// their total, against the atomic policy.
pub fn run_eu_atomic_shadow_check(
	ledger: &LedgerState,
	policy: &AtomicCoinPolicy,
	ctx: &ShadowContext,
) -> Result<EuShadowReport, Error> {
	let mut total = Amount::zero();
	let mut active_certs = 0;
	let mut skipped_missing_vault = 0;

	for (id, cert) in ledger.eu_registry.iter() {
		if !cert.is_active() {
			continue;
		}
		if ledger.vault(&cert.backing_vault_id).is_none() {
			skipped_missing_vault += 1;
			continue;
		}
		if let Err(e) = policy.validate_amount(&cert.oracle_value_eu_at_issuance) {
			return Err(certificate::Error::InvariantViolation {
				detail: format!(
					"certificate {} value fails atomic policy at height {}: {}",
					id, ctx.height, e
				),
			}
			.into());
		}
		active_certs += 1;
		total += &cert.oracle_value_eu_at_issuance;
	}

	if let Err(e) = policy.validate_amount(&total) {
		return Err(certificate::Error::InvariantViolation {
			detail: format!(
				"total EU supply {} fails atomic policy at height {}: {}",
				total, ctx.height, e
			),
		}
		.into());
	}

	trace!(
		"eu shadow check at height {}: {} active, total {}, {} skipped",
		ctx.height,
		active_certs,
		total,
		skipped_missing_vault
	);

	Ok(EuShadowReport {
		total_eu_supply: total,
		active_certs,
		skipped_missing_vault,
	})
}
