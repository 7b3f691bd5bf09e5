// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub platform for desktop/CI builds where the Android runtime is absent.
//
// Every OS call returns `PlatformUnavailable`. The real implementation
// lives in the `android` module.

use std::path::Path;

use android_intent_core::error::{IntentError, Result};
use android_intent_core::types::{Intent, ResolvedActivity};

use crate::traits::IntentPlatform;

/// No-op platform returned on non-Android targets.
#[derive(Debug, Default)]
pub struct StubPlatform;

impl IntentPlatform for StubPlatform {
    type Context = ();

    fn platform_name(&self) -> String {
        "Desktop (stub)".into()
    }

    fn sdk_version(&self) -> u32 {
        0
    }

    fn package_name(&self, _context: &()) -> Result<String> {
        Err(IntentError::PlatformUnavailable)
    }

    fn provider_uri(&self, _context: &(), _authority: &str, _path: &Path) -> Result<String> {
        Err(IntentError::PlatformUnavailable)
    }

    fn resolve_activity(
        &self,
        _context: &(),
        _intent: &Intent,
    ) -> Result<Option<ResolvedActivity>> {
        tracing::warn!("IntentPlatform::resolve_activity called on stub platform");
        Err(IntentError::PlatformUnavailable)
    }

    fn query_intent_activities(
        &self,
        _context: &(),
        _intent: &Intent,
    ) -> Result<Vec<ResolvedActivity>> {
        tracing::warn!("IntentPlatform::query_intent_activities called on stub platform");
        Err(IntentError::PlatformUnavailable)
    }

    fn start_activity(&self, _context: &(), intent: &Intent) -> Result<()> {
        tracing::warn!(%intent, "IntentPlatform::start_activity called on stub platform");
        Err(IntentError::PlatformUnavailable)
    }
}
