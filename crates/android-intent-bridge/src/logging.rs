// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tracing subscriber setup for the bridge.

use tracing_subscriber::EnvFilter;

use android_intent_core::BridgeConfig;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_filter`. Safe to call more
/// than once; only the first call installs a subscriber.
pub fn init(config: &BridgeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(filter = %config.log_filter, "intent bridge logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = BridgeConfig::default();
        init(&config);
        init(&config);
    }
}
