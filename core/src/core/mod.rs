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

//! Core datatypes of the Thesis chain.

pub mod account;
pub mod amount;
pub mod block;
pub mod certificate;
pub mod hash;
pub mod ledger;
pub mod transaction;

pub use self::account::{Account, Vault, VaultKind};
pub use self::amount::{Address, Amount, CertId, Height, VaultId};
pub use self::block::{Block, BlockBody, BlockHeader};
pub use self::certificate::{EuCertificate, EuRegistry, EuStatus};
pub use self::hash::Hash;
pub use self::ledger::{ChainHeader, ChainLedger, LedgerState};
pub use self::transaction::TheTx;
