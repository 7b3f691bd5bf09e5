// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording platform double shared by the bridge's unit tests.

use std::path::Path;
use std::sync::Mutex;

use android_intent_core::error::Result;
use android_intent_core::types::{Intent, ResolvedActivity};

use crate::traits::IntentPlatform;

pub(crate) const HOST_PACKAGE: &str = "com.example.host";

/// Stand-in for an Android `Context` handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ctx {
    Activity,
    Application,
}

/// Records every OS call and answers resolution queries from a fixed switch.
pub(crate) struct RecordingPlatform {
    pub sdk: u32,
    /// Whether `resolve_activity` / `query_intent_activities` find a handler.
    pub resolvable: bool,
    started: Mutex<Vec<(Ctx, Intent)>>,
    resolved: Mutex<Vec<Intent>>,
}

impl RecordingPlatform {
    pub fn new(sdk: u32, resolvable: bool) -> Self {
        Self {
            sdk,
            resolvable,
            started: Mutex::new(Vec::new()),
            resolved: Mutex::new(Vec::new()),
        }
    }

    /// Every `(context, intent)` passed to `start_activity`, in order.
    pub fn started(&self) -> Vec<(Ctx, Intent)> {
        self.started.lock().unwrap().clone()
    }

    /// Every intent handed to a resolution query, in order.
    pub fn resolution_queries(&self) -> Vec<Intent> {
        self.resolved.lock().unwrap().clone()
    }

    fn answer(&self, intent: &Intent) -> Option<ResolvedActivity> {
        self.resolved.lock().unwrap().push(intent.clone());
        self.resolvable.then(|| ResolvedActivity {
            package: intent
                .package
                .clone()
                .unwrap_or_else(|| "com.android.browser".into()),
            class: "com.android.browser.BrowserActivity".into(),
        })
    }
}

impl IntentPlatform for RecordingPlatform {
    type Context = Ctx;

    fn platform_name(&self) -> String {
        format!("Recording API {}", self.sdk)
    }

    fn sdk_version(&self) -> u32 {
        self.sdk
    }

    fn package_name(&self, _context: &Ctx) -> Result<String> {
        Ok(HOST_PACKAGE.into())
    }

    fn provider_uri(&self, _context: &Ctx, authority: &str, path: &Path) -> Result<String> {
        Ok(format!("content://{authority}/root{}", path.display()))
    }

    fn resolve_activity(
        &self,
        _context: &Ctx,
        intent: &Intent,
    ) -> Result<Option<ResolvedActivity>> {
        Ok(self.answer(intent))
    }

    fn query_intent_activities(
        &self,
        _context: &Ctx,
        intent: &Intent,
    ) -> Result<Vec<ResolvedActivity>> {
        Ok(self.answer(intent).into_iter().collect())
    }

    fn start_activity(&self, context: &Ctx, intent: &Intent) -> Result<()> {
        self.started.lock().unwrap().push((*context, intent.clone()));
        Ok(())
    }
}
