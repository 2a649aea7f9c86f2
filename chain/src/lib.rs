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

//! The state-transition engine of the Thesis chain: the block application
//! pipeline, the transaction VM, snapshot/delta machinery, and the
//! observational back-wall and shadow checks. Single-threaded and
//! deterministic; the only clock read happens in the caller.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use thesis_core as core;

pub mod backwall;
pub mod chain;
pub mod error;
pub mod pipe;
pub mod shadow;
pub mod snapshot;
pub mod types;
pub mod vm;

pub use crate::chain::Chain;
pub use crate::error::{Error, ErrorKind};
pub use crate::types::{
	BackWallGuards, BlockOpts, BlockOutcome, ChainState, ConsensusDelta, ConsensusEnv,
	FeatureFlags, VaultFunding,
};
