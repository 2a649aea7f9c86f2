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

//! Error types for the state-transition engine. Every failure that crosses
//! the crate boundary carries a stable kind string via [`ErrorKind::code`];
//! nothing stringly-typed leaves the engine.

use crate::core::consensus;
use crate::core::core::certificate;
use crate::core::core::ledger;
use crate::core::policy;
use crate::core::pow;
use crate::core::ser;
use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

/// Chain error, bundling an [`ErrorKind`] with its failure context.
#[derive(Debug)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// The enumerated failure taxonomy of block application.
#[derive(Clone, Debug, Eq, PartialEq, Fail)]
pub enum ErrorKind {
	/// Block height does not extend the tip by exactly one.
	#[fail(display = "unexpected height: expected {}, got {}", expected, got)]
	UnexpectedHeight { expected: u64, got: u64 },
	/// Block parent hash does not match the tip hash.
	#[fail(display = "parent mismatch: expected {}, got {}", expected, got)]
	ParentMismatch { expected: String, got: String },
	/// Claimed block hash differs from the recomputed canonical hash.
	#[fail(display = "hash mismatch: expected {}, got {}", expected, got)]
	HashMismatch { expected: String, got: String },
	/// Block timestamp ran backwards relative to the tip.
	#[fail(display = "non-monotonic timestamp: tip at {}, block at {}", prev, got)]
	NonMonotonicTimestamp { prev: i64, got: i64 },
	/// Block timestamp too far ahead of the caller's clock.
	#[fail(
		display = "future drift: block at {}, now {}, max drift {}s",
		timestamp, now, max_drift
	)]
	FutureDrift {
		timestamp: i64,
		now: i64,
		max_drift: i64,
	},
	/// Proof-of-work failure.
	#[fail(display = "{}", _0)]
	Pow(pow::Error),
	/// Atomic coin policy failure.
	#[fail(display = "{}", _0)]
	Policy(policy::Error),
	/// Account, vault or certificate failure from the ledger.
	#[fail(display = "{}", _0)]
	Ledger(ledger::Error),
	/// Emission schedule failure.
	#[fail(display = "{}", _0)]
	Emission(consensus::Error),
	/// Wire codec failure.
	#[fail(display = "{}", _0)]
	Ser(ser::Error),
	/// Anything that does not warrant its own kind.
	#[fail(display = "{}", _0)]
	Other(String),
}

impl ErrorKind {
	/// Stable kind string for the boundary error taxonomy.
	pub fn code(&self) -> &'static str {
		match self {
			ErrorKind::UnexpectedHeight { .. } => "UNEXPECTED_HEIGHT",
			ErrorKind::ParentMismatch { .. } => "PARENT_MISMATCH",
			ErrorKind::HashMismatch { .. } => "HASH_MISMATCH",
			ErrorKind::NonMonotonicTimestamp { .. } => "NON_MONOTONIC_TIMESTAMP",
			ErrorKind::FutureDrift { .. } => "FUTURE_DRIFT",
			ErrorKind::Pow(e) => e.code(),
			ErrorKind::Policy(e) => e.code(),
			ErrorKind::Ledger(e) => e.code(),
			ErrorKind::Emission(e) => e.code(),
			ErrorKind::Ser(e) => e.code(),
			ErrorKind::Other(_) => "OTHER",
		}
	}
}

impl Fail for Error {
	fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl Error {
	/// The kind of this error.
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}

	/// Stable kind string, forwarded from the kind.
	pub fn code(&self) -> &'static str {
		self.inner.get_context().code()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}

impl From<pow::Error> for Error {
	fn from(e: pow::Error) -> Error {
		ErrorKind::Pow(e).into()
	}
}

impl From<policy::Error> for Error {
	fn from(e: policy::Error) -> Error {
		ErrorKind::Policy(e).into()
	}
}

impl From<ledger::Error> for Error {
	fn from(e: ledger::Error) -> Error {
		ErrorKind::Ledger(e).into()
	}
}

impl From<certificate::Error> for Error {
	fn from(e: certificate::Error) -> Error {
		ErrorKind::Ledger(ledger::Error::Certificate(e)).into()
	}
}

impl From<consensus::Error> for Error {
	fn from(e: consensus::Error) -> Error {
		ErrorKind::Emission(e).into()
	}
}

impl From<ser::Error> for Error {
	fn from(e: ser::Error) -> Error {
		ErrorKind::Ser(e).into()
	}
}
