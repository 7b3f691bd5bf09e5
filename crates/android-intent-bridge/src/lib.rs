// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Android intent bridge.
//!
//! Turns launch requests from a cross-platform host into native Android
//! Intents and starts them. The decision logic ([`sender`], [`utils`]) is
//! written against the [`traits::IntentPlatform`] seam; the `android`
//! module implements that seam over JNI, and [`stub`] stands in on desktop
//! and CI builds.

pub mod channel;
pub mod logging;
pub mod sender;
pub mod traits;
pub mod utils;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

#[cfg(test)]
pub(crate) mod testing;

pub use sender::{Dispatch, DispatchContext, IntentSender, LaunchSource};

/// Platform implementation selected for the build target.
#[cfg(target_os = "android")]
pub type DefaultPlatform = android::AndroidPlatform;

/// Platform implementation selected for the build target.
#[cfg(not(target_os = "android"))]
pub type DefaultPlatform = stub::StubPlatform;

#[cfg(all(test, not(target_os = "android")))]
mod tests {
    use super::*;
    use crate::traits::IntentPlatform;
    use android_intent_core::types::{ACTION_VIEW, IntentSpec, LaunchRequest};
    use android_intent_core::{BridgeConfig, IntentError};

    #[test]
    fn stub_platform_reports_unavailable() {
        let sender = IntentSender::new(DefaultPlatform::default(), BridgeConfig::default());
        sender.set_application_context(Some(()));

        let result = sender.send(&LaunchRequest::Intent(IntentSpec::new(ACTION_VIEW)));
        assert!(matches!(result, Err(IntentError::PlatformUnavailable)));
        assert_eq!(sender.platform().sdk_version(), 0);
        assert_eq!(sender.platform().platform_name(), "Desktop (stub)");
    }
}
