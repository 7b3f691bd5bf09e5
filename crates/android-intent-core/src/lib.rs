// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android intent bridge: core types, errors, and configuration shared by
// the platform bridge and its host glue.

pub mod config;
pub mod error;
pub mod types;

pub use config::BridgeConfig;
pub use error::IntentError;
pub use types::*;
